use super::{
    navigation::{Navigator, Route},
    Session,
};
use crate::{
    client::{AuthClient, ClientError, User},
    forms::{self, ProfileForm, RegistrationForm},
};
use secrecy::SecretString;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, instrument, warn};

/// Owned session store. Cloning is cheap and every clone shares the same
/// state, request counter, and navigator.
///
/// Each operation that mutates state takes a request token from a
/// monotonic counter; a result is applied only while its token is still the
/// newest one, so an overtaken request can never overwrite fresher state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: AuthClient,
    state: watch::Sender<Session>,
    generation: AtomicU64,
    navigator: Navigator,
}

impl SessionStore {
    /// Creates a store in the initial loading state together with the
    /// receiving end of its navigation channel.
    #[must_use]
    pub fn new(client: AuthClient) -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (navigator, routes) = Navigator::channel();
        (Self::with_navigator(client, navigator), routes)
    }

    #[must_use]
    pub fn with_navigator(client: AuthClient, navigator: Navigator) -> Self {
        let (state, _) = watch::channel(Session::initial());
        Self {
            inner: Arc::new(Inner {
                client,
                state,
                generation: AtomicU64::new(0),
                navigator,
            }),
        }
    }

    /// Kicks off the initial current-user fetch in the background.
    pub fn hydrate(&self) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            if let Err(err) = store.refresh().await {
                debug!("initial session fetch failed: {err}");
            }
        })
    }

    #[must_use]
    pub fn client(&self) -> &AuthClient {
        &self.inner.client
    }

    #[must_use]
    pub fn navigator(&self) -> Navigator {
        self.inner.navigator.clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    pub fn clear_error(&self) {
        self.inner.state.send_if_modified(|session| session.error.take().is_some());
    }

    /// Re-reads the current user from the backend.
    ///
    /// # Errors
    /// Returns the client error for failures other than "not authenticated";
    /// the same message is recorded in the session.
    #[instrument(skip_all)]
    pub async fn refresh(&self) -> Result<Option<User>, ClientError> {
        let token = self.begin();
        self.load_user(token).await
    }

    /// # Errors
    /// Returns the login or follow-up refresh failure.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), ClientError> {
        let token = self.begin();
        self.apply(token, |session| {
            session.is_loading = true;
            session.error = None;
        });

        if let Err(err) = self.inner.client.login(email, password).await {
            let message = err.user_message();
            self.apply(token, |session| {
                session.user = None;
                session.is_loading = false;
                session.error = Some(message);
            });
            return Err(err);
        }

        let user = self.load_user(token).await?;
        if user.is_some() && self.is_current(token) {
            self.inner.navigator.go(Route::Profile);
        }
        Ok(())
    }

    /// Validates and submits a registration. On success the user is sent to
    /// the verification screen for the submitted address.
    ///
    /// # Errors
    /// Returns [`ClientError::Validation`] without any request when the form
    /// is invalid, or the backend failure otherwise.
    #[instrument(skip_all)]
    pub async fn register(&self, form: &RegistrationForm) -> Result<(), ClientError> {
        form.validate()?;

        let token = self.begin();
        self.apply(token, |session| {
            session.is_loading = true;
            session.error = None;
        });

        let email = form.email.trim();
        let result = self
            .inner
            .client
            .register(
                email,
                form.first_name.trim(),
                form.last_name.trim(),
                &form.password,
            )
            .await;

        match result {
            Ok(()) => {
                if self.apply(token, |session| session.is_loading = false) {
                    self.inner.navigator.go(Route::VerifyEmail {
                        email: email.to_string(),
                    });
                }
                Ok(())
            }
            Err(err) => {
                let message = err.user_message();
                self.apply(token, |session| {
                    session.is_loading = false;
                    session.error = Some(message);
                });
                Err(err)
            }
        }
    }

    /// Ends the session. The backend call is best-effort; local state is
    /// cleared whatever it returns.
    #[instrument(skip_all)]
    pub async fn logout(&self) {
        let token = self.begin();
        self.apply(token, |session| session.error = None);

        if let Err(err) = self.inner.client.logout().await {
            warn!("logout request failed, clearing local session anyway: {err}");
        }

        self.begin();
        self.inner.state.send_modify(|session| {
            session.user = None;
            session.error = None;
            session.is_loading = false;
        });
        self.inner.navigator.go(Route::Login);
    }

    /// Saves profile changes and reloads the user on success.
    ///
    /// # Errors
    /// Returns [`ClientError::Validation`] for an invalid form, or an HTTP
    /// error whose message is suitable for display.
    #[instrument(skip_all)]
    pub async fn update_profile(&self, form: &ProfileForm) -> Result<(), ClientError> {
        form.validate()?;
        let form = form.trimmed();

        self.inner
            .client
            .update_profile(&form.first_name, &form.last_name, &form.email)
            .await
            .map_err(profile_error)?;

        self.refresh().await.map(|_| ())
    }

    /// Confirms the emailed code, then loads the now verified user.
    ///
    /// # Errors
    /// Returns [`ClientError::Validation`] for a blank code, or the backend
    /// failure.
    #[instrument(skip_all)]
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<(), ClientError> {
        forms::validate_email(email)?;
        if code.trim().is_empty() {
            return Err(ClientError::Validation(
                "Verification code is required".to_string(),
            ));
        }

        self.inner
            .client
            .verify_email(email.trim(), code.trim())
            .await?;

        let token = self.begin();
        let user = self.load_user(token).await?;
        if user.is_some() && self.is_current(token) {
            self.inner.navigator.go(Route::Profile);
        }
        Ok(())
    }

    /// # Errors
    /// Returns [`ClientError::Validation`] for an invalid address, or the
    /// backend failure.
    #[instrument(skip_all)]
    pub async fn resend_verification(&self, email: &str) -> Result<(), ClientError> {
        forms::validate_email(email)?;
        self.inner.client.resend_verification(email.trim()).await
    }

    /// Takes the next request token.
    fn begin(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == token
    }

    /// Applies `update` if `token` is still the newest request. Returns
    /// whether the update was applied.
    fn apply(&self, token: u64, update: impl FnOnce(&mut Session)) -> bool {
        self.inner.state.send_if_modified(|session| {
            if self.is_current(token) {
                update(session);
                true
            } else {
                debug!(token, "discarding stale session update");
                false
            }
        })
    }

    async fn load_user(&self, token: u64) -> Result<Option<User>, ClientError> {
        match self.inner.client.current_user().await {
            Ok(user) => {
                let stored = user.clone();
                self.apply(token, |session| {
                    session.user = stored;
                    session.error = None;
                    session.is_loading = false;
                });
                Ok(user)
            }
            Err(err) => {
                let message = err.user_message();
                self.apply(token, |session| {
                    session.user = None;
                    session.error = Some(message);
                    session.is_loading = false;
                });
                Err(err)
            }
        }
    }
}

/// Maps profile update failures onto the messages the profile screen shows.
fn profile_error(err: ClientError) -> ClientError {
    match err {
        ClientError::Http { status: 401, .. } => ClientError::Http {
            status: 401,
            message: "Please log in again to continue".to_string(),
        },
        ClientError::Http { status: 409, .. } => ClientError::Http {
            status: 409,
            message: "This email is already in use by another account".to_string(),
        },
        other => other,
    }
}
