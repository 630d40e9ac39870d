//! Client-held session state. The store owns the current user plus the
//! loading and error flags; screens observe it through
//! [`SessionStore::subscribe`] and drive it through the auth operations.
//! Cookies stay inside the HTTP client and are never copied into the state.

mod navigation;
mod store;

pub use self::navigation::{Navigator, Route, LOGIN_PATH, PROFILE_PATH};
pub use self::store::SessionStore;

use crate::client::User;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Session {
    /// State before the first current-user fetch resolves.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            user: None,
            is_loading: true,
            error: None,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initial()
    }
}
