use tokio::sync::mpsc;
use tracing::debug;
use url::form_urlencoded;

pub const LOGIN_PATH: &str = "/login";
pub const PROFILE_PATH: &str = "/profile";

/// Screens the session flows can send the user to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Profile,
    VerifyEmail { email: String },
    ResetPassword { email: Option<String> },
}

impl Route {
    /// Path including any query string the target screen reads.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Login => LOGIN_PATH.to_string(),
            Route::Register => "/register".to_string(),
            Route::Profile => PROFILE_PATH.to_string(),
            Route::VerifyEmail { email } => with_email("/verify-email", email),
            Route::ResetPassword { email: Some(email) } => with_email("/reset-password", email),
            Route::ResetPassword { email: None } => "/reset-password".to_string(),
        }
    }
}

fn with_email(path: &str, email: &str) -> String {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("email", email)
        .finish();
    format!("{path}?{query}")
}

/// Sending half of the navigation channel. The UI shell owns the receiver
/// and performs the actual screen change.
#[derive(Clone, Debug)]
pub struct Navigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl Navigator {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn go(&self, route: Route) {
        debug!(path = %route.path(), "navigate");
        if self.tx.send(route).is_err() {
            debug!("navigation receiver dropped");
        }
    }
}
