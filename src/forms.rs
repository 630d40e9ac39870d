//! Client-side form validation. Every check here runs before a request is
//! built, so a rejected form never reaches the backend.

use crate::client::ClientError;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_RESET_CODE_LEN: usize = 4;

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

fn invalid(message: &str) -> ClientError {
    ClientError::Validation(message.to_string())
}

#[derive(Clone, Debug)]
pub struct RegistrationForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl RegistrationForm {
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: SecretString::from(password.into()),
            confirm_password: SecretString::from(confirm_password.into()),
        }
    }

    /// # Errors
    /// Returns [`ClientError::Validation`] describing the first failed check.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(invalid("First name and last name are required"));
        }
        validate_email(&self.email)?;
        if self.password.expose_secret() != self.confirm_password.expose_secret() {
            return Err(invalid("Passwords do not match"));
        }
        if self.password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
            return Err(invalid("Password must be at least 6 characters"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl ProfileForm {
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Copy with surrounding whitespace removed, as sent to the backend.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self::new(
            self.first_name.trim(),
            self.last_name.trim(),
            self.email.trim(),
        )
    }

    /// # Errors
    /// Returns [`ClientError::Validation`] describing the first failed check.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(invalid("First name and last name are required"));
        }
        validate_email(&self.email)
    }
}

/// # Errors
/// Returns [`ClientError::Validation`] for a blank or malformed address.
pub fn validate_email(email: &str) -> Result<(), ClientError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(invalid("Email is required"));
    }
    if !valid_email(email) {
        return Err(invalid("Please enter a valid email address"));
    }
    Ok(())
}

/// # Errors
/// Returns [`ClientError::Validation`] for a blank or too short code.
pub fn validate_reset_code(code: &str) -> Result<(), ClientError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(invalid("Reset code is required"));
    }
    if code.chars().count() < MIN_RESET_CODE_LEN {
        return Err(invalid("Reset code must be at least 4 characters"));
    }
    Ok(())
}

/// # Errors
/// Returns [`ClientError::Validation`] describing the first failed check.
pub fn validate_new_password(
    password: &SecretString,
    confirm_password: &SecretString,
) -> Result<(), ClientError> {
    let password = password.expose_secret();
    let confirm_password = confirm_password.expose_secret();
    if password.is_empty() {
        return Err(invalid("New password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid("Password must be at least 6 characters"));
    }
    if confirm_password.is_empty() {
        return Err(invalid("Please confirm your new password"));
    }
    if password != confirm_password {
        return Err(invalid("Passwords do not match"));
    }
    Ok(())
}
