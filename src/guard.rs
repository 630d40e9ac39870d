//! Route guards over the session. These are UX-only: the backend still
//! enforces access on every call.

use crate::session::{Session, LOGIN_PATH, PROFILE_PATH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirement {
    /// Screen needs a signed-in user.
    Authenticated,
    /// Screen is only for signed-out visitors (login, register).
    Anonymous,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Session still loading; show a placeholder.
    Pending,
    Render,
    Redirect(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteGuard {
    requirement: Requirement,
    redirect_to: String,
}

impl RouteGuard {
    #[must_use]
    pub fn new(requirement: Requirement, redirect_to: impl Into<String>) -> Self {
        Self {
            requirement,
            redirect_to: redirect_to.into(),
        }
    }

    /// Guard for private screens, redirecting to the login screen.
    #[must_use]
    pub fn protected() -> Self {
        Self::new(Requirement::Authenticated, LOGIN_PATH)
    }

    /// Guard for signed-out screens, redirecting to the profile screen.
    #[must_use]
    pub fn public_only() -> Self {
        Self::new(Requirement::Anonymous, PROFILE_PATH)
    }

    #[must_use]
    pub const fn requirement(&self) -> Requirement {
        self.requirement
    }

    #[must_use]
    pub fn redirect_to(&self) -> &str {
        &self.redirect_to
    }

    #[must_use]
    pub fn evaluate(&self, session: &Session) -> Decision {
        if session.is_loading {
            return Decision::Pending;
        }

        let denied = match self.requirement {
            Requirement::Authenticated => !session.is_authenticated(),
            Requirement::Anonymous => session.is_authenticated(),
        };

        if denied {
            Decision::Redirect(self.redirect_to.clone())
        } else {
            Decision::Render
        }
    }
}
