//! Client wrappers for the account API endpoints. These helpers centralize
//! paths, payload shapes, and fallback messages so the session store and
//! widgets never build requests by hand. Passwords and codes are never
//! logged.

pub mod api;
pub mod config;
pub mod errors;
pub mod normalize;
pub mod types;

pub use self::api::ApiClient;
pub use self::config::ClientConfig;
pub use self::errors::{ClientError, NETWORK_ERROR_MESSAGE};
pub use self::types::{SelectedFile, User};

use self::types::{
    EmailCodeRequest, EmailRequest, LoginRequest, ProfileUpdateRequest, RegisterRequest,
    ResetPasswordRequest,
};
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

pub const CURRENT_USER_PATH: &str = "/auth/current";
pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const VERIFY_EMAIL_PATH: &str = "/auth/verify-email";
pub const RESEND_VERIFICATION_PATH: &str = "/auth/resend-verification-code";
pub const AVATAR_PATH: &str = "/avatar";
pub const PROFILE_PATH: &str = "/user/profile";
pub const FORGOT_PASSWORD_PATH: &str = "/user/password/forgot";
pub const VALIDATE_CODE_PATH: &str = "/user/password/validate-code";
pub const RESET_PASSWORD_PATH: &str = "/user/password/reset";

/// Multipart field the avatar endpoint reads the image from.
pub const AVATAR_FIELD: &str = "file";

/// Typed access to the account API.
#[derive(Clone, Debug)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    /// # Errors
    /// Returns [`ClientError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            api: ApiClient::new(config)?,
        })
    }

    /// Builds a client from `VESTIBULE_API_URL`.
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(&ClientConfig::load())
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Fetches the current user with the ambient session cookie.
    /// Returns `None` when the session is missing or expired.
    #[instrument(skip_all)]
    pub async fn current_user(&self) -> Result<Option<User>, ClientError> {
        match self.api.get_optional_json(CURRENT_USER_PATH).await? {
            Some(payload) => normalize::normalize_user(&payload).map(Some),
            None => Ok(None),
        }
    }

    /// Posts credentials; the backend answers with a session cookie.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), ClientError> {
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        self.api.post_json(LOGIN_PATH, &body, "Login failed").await
    }

    #[instrument(skip_all)]
    pub async fn register(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        password: &SecretString,
    ) -> Result<(), ClientError> {
        let body = RegisterRequest {
            email,
            first_name,
            last_name,
            password: password.expose_secret(),
        };
        self.api
            .post_json(REGISTER_PATH, &body, "Registration failed")
            .await
    }

    /// Clears the session on the server.
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.api.post_empty(LOGOUT_PATH, "Logout failed").await
    }

    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<(), ClientError> {
        let body = ProfileUpdateRequest {
            first_name,
            last_name,
            email,
        };
        self.api.put_json(PROFILE_PATH, &body, "Update failed").await
    }

    #[instrument(skip_all, fields(file.size = file.size()))]
    pub async fn upload_avatar(&self, file: &SelectedFile) -> Result<(), ClientError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|err| ClientError::Serialization(format!("Invalid file type: {err}")))?;
        let form = Form::new().part(AVATAR_FIELD, part);
        self.api
            .post_multipart(AVATAR_PATH, form, "Upload failed")
            .await
    }

    #[instrument(skip_all)]
    pub async fn delete_avatar(&self) -> Result<(), ClientError> {
        self.api.delete(AVATAR_PATH, "Delete failed").await
    }

    #[instrument(skip_all)]
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<(), ClientError> {
        let body = EmailCodeRequest { email, code };
        self.api
            .post_json(VERIFY_EMAIL_PATH, &body, "Verification failed")
            .await
    }

    /// Requests a new verification code; does not reveal account existence.
    #[instrument(skip_all)]
    pub async fn resend_verification(&self, email: &str) -> Result<(), ClientError> {
        let body = EmailRequest { email };
        self.api
            .post_json(RESEND_VERIFICATION_PATH, &body, "Failed to resend code")
            .await
    }

    #[instrument(skip_all)]
    pub async fn forgot_password(&self, email: &str) -> Result<(), ClientError> {
        let body = EmailRequest { email };
        self.api
            .post_json(FORGOT_PASSWORD_PATH, &body, "Failed to send reset code")
            .await
    }

    #[instrument(skip_all)]
    pub async fn validate_reset_code(&self, email: &str, code: &str) -> Result<(), ClientError> {
        let body = EmailCodeRequest { email, code };
        self.api
            .post_json(VALIDATE_CODE_PATH, &body, "Invalid or expired reset code")
            .await
    }

    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &SecretString,
    ) -> Result<(), ClientError> {
        let body = ResetPasswordRequest {
            email,
            code,
            new_password: new_password.expose_secret(),
        };
        self.api
            .post_json(RESET_PASSWORD_PATH, &body, "Failed to reset password")
            .await
    }
}
