//! Password recovery flow: request a code by email, confirm the code, then
//! choose a new password. Each step validates locally and only advances on
//! a successful backend response.

use crate::{
    client::{AuthClient, ClientError},
    forms,
    notice::Notice,
    session::{Navigator, Route},
};
use secrecy::SecretString;
use tracing::instrument;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Request,
    Validate,
    Reset,
    Success,
}

pub struct PasswordRecovery {
    client: AuthClient,
    navigator: Navigator,
    step: Step,
    email: String,
    code: String,
    error: Option<String>,
}

impl PasswordRecovery {
    /// Starts at code validation when the email is already known (for
    /// example from the link in the reset email), otherwise at the request
    /// step.
    #[must_use]
    pub fn new(client: AuthClient, navigator: Navigator, email: Option<&str>) -> Self {
        let email = email.map(str::trim).unwrap_or_default().to_string();
        let step = if email.is_empty() {
            Step::Request
        } else {
            Step::Validate
        };
        Self {
            client,
            navigator,
            step,
            email,
            code: String::new(),
            error: None,
        }
    }

    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sends a reset code to `email`.
    ///
    /// # Errors
    /// Returns a notice describing the validation or backend failure.
    #[instrument(skip_all)]
    pub async fn request_code(&mut self, email: &str) -> Result<Notice, Notice> {
        let email = email.trim().to_string();
        self.check(forms::validate_email(&email), "Failed to send reset code")?;

        let result = self.client.forgot_password(&email).await;
        self.check(result, "Failed to send reset code")?;

        self.email = email;
        self.step = Step::Validate;
        Ok(Notice::success(
            "Reset code sent",
            "Check your email for the password reset code",
        ))
    }

    /// # Errors
    /// Returns a notice describing the validation or backend failure.
    #[instrument(skip_all)]
    pub async fn validate_code(&mut self, code: &str) -> Result<Notice, Notice> {
        let code = code.trim().to_string();
        self.check(forms::validate_email(&self.email), "Invalid code")?;
        self.check(forms::validate_reset_code(&code), "Invalid code")?;

        let result = self.client.validate_reset_code(&self.email, &code).await;
        self.check(result, "Invalid code")?;

        self.code = code;
        self.step = Step::Reset;
        Ok(Notice::success("Code validated", "Now enter your new password"))
    }

    /// Sets the new password and sends the user back to the login screen.
    ///
    /// # Errors
    /// Returns a notice describing the validation or backend failure.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &mut self,
        new_password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<Notice, Notice> {
        if self.step != Step::Reset {
            return Err(self.fail(
                ClientError::Validation("Validate your reset code first".to_string()),
                "Password reset failed",
            ));
        }
        self.check(
            forms::validate_new_password(new_password, confirm_password),
            "Password reset failed",
        )?;

        let result = self
            .client
            .reset_password(&self.email, &self.code, new_password)
            .await;
        self.check(result, "Password reset failed")?;

        self.step = Step::Success;
        self.navigator.go(Route::Login);
        Ok(Notice::success(
            "Password reset successful",
            "You can now sign in with your new password",
        ))
    }

    fn check(&mut self, result: Result<(), ClientError>, title: &str) -> Result<(), Notice> {
        self.error = None;
        result.map_err(|err| self.fail(err, title))
    }

    fn fail(&mut self, err: ClientError, title: &str) -> Notice {
        let message = err.user_message();
        self.error = Some(message.clone());
        Notice::error(title, message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::client::{
        ClientConfig, FORGOT_PASSWORD_PATH, RESET_PASSWORD_PATH, VALIDATE_CODE_PATH,
    };
    use serde_json::json;
    use tokio::sync::mpsc;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn recovery_for(
        server: &MockServer,
        email: Option<&str>,
    ) -> (PasswordRecovery, mpsc::UnboundedReceiver<Route>) {
        let client = AuthClient::new(&ClientConfig::new(server.uri())).unwrap();
        let (navigator, routes) = Navigator::channel();
        (PasswordRecovery::new(client, navigator, email), routes)
    }

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[tokio::test]
    async fn starts_at_validate_when_email_known() {
        let server = MockServer::start().await;
        let (recovery, _routes) = recovery_for(&server, Some("a@b.com"));
        assert_eq!(recovery.step(), Step::Validate);
        let (recovery, _routes) = recovery_for(&server, None);
        assert_eq!(recovery.step(), Step::Request);
    }

    #[tokio::test]
    async fn full_flow_ends_at_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(FORGOT_PASSWORD_PATH))
            .and(body_json(json!({ "email": "a@b.com" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(VALIDATE_CODE_PATH))
            .and(body_json(json!({ "email": "a@b.com", "code": "482913" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(RESET_PASSWORD_PATH))
            .and(body_json(json!({
                "email": "a@b.com",
                "code": "482913",
                "newPassword": "hunter22"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (mut recovery, mut routes) = recovery_for(&server, None);
        recovery.request_code(" a@b.com ").await.unwrap();
        assert_eq!(recovery.step(), Step::Validate);
        recovery.validate_code("482913").await.unwrap();
        assert_eq!(recovery.step(), Step::Reset);
        recovery
            .reset_password(&secret("hunter22"), &secret("hunter22"))
            .await
            .unwrap();
        assert_eq!(recovery.step(), Step::Success);
        assert_eq!(routes.try_recv().ok(), Some(Route::Login));
    }

    #[tokio::test]
    async fn short_code_is_rejected_locally() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(VALIDATE_CODE_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (mut recovery, _routes) = recovery_for(&server, Some("a@b.com"));
        let notice = recovery.validate_code("12").await.unwrap_err();
        assert_eq!(notice.description, "Reset code must be at least 4 characters");
        assert_eq!(recovery.step(), Step::Validate);
    }

    #[tokio::test]
    async fn backend_rejection_keeps_step() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(VALIDATE_CODE_PATH))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "message": "Code expired" })),
            )
            .mount(&server)
            .await;

        let (mut recovery, _routes) = recovery_for(&server, Some("a@b.com"));
        let notice = recovery.validate_code("123456").await.unwrap_err();
        assert_eq!(notice.title, "Invalid code");
        assert_eq!(recovery.error(), Some("Code expired"));
        assert_eq!(recovery.step(), Step::Validate);
    }

    #[tokio::test]
    async fn mismatched_new_password_never_calls_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(VALIDATE_CODE_PATH))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(RESET_PASSWORD_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (mut recovery, _routes) = recovery_for(&server, Some("a@b.com"));
        recovery.validate_code("123456").await.unwrap();
        let notice = recovery
            .reset_password(&secret("hunter22"), &secret("hunter23"))
            .await
            .unwrap_err();
        assert_eq!(notice.description, "Passwords do not match");
        assert_eq!(recovery.step(), Step::Reset);
    }
}
