//! # Vestibule
//!
//! Client side of an account portal: a session store that wraps the remote
//! account API, route guards over that session, an avatar upload widget,
//! password recovery, and a same-origin proxy that forwards authenticated
//! requests to the backend.
//!
//! ## Session
//!
//! [`session::SessionStore`] is an owned value. Screens subscribe to its
//! state (`user`, `is_loading`, `error`) and receive navigation requests on
//! a channel. Every state-changing call takes a monotonic request token, so
//! a slow response that was overtaken by a newer one is dropped instead of
//! overwriting fresher state.
//!
//! ## Proxy
//!
//! [`proxy`] runs an axum service that forwards profile and avatar requests,
//! including the `auth_token` cookie, to the backend and relays the answer
//! verbatim. Network failures become a fixed `500` body.

pub mod avatar;
pub mod cli;
pub mod client;
pub mod forms;
pub mod guard;
pub mod notice;
pub mod proxy;
pub mod recovery;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
