use std::fmt;

pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";
pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientError {
    /// Rejected locally before any request was sent.
    Validation(String),
    Config(String),
    Network(String),
    Timeout(String),
    Http { status: u16, message: String },
    Parse(String),
    Serialization(String),
}

impl ClientError {
    /// Message suitable for an inline alert or toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(message) | ClientError::Http { message, .. } => {
                message.clone()
            }
            // An unreadable body is shown the same way as an unreachable server.
            ClientError::Network(_) | ClientError::Parse(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ClientError::Timeout(_) => TIMEOUT_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Validation(message) => write!(formatter, "{message}"),
            ClientError::Config(message) => write!(formatter, "Config error: {message}"),
            ClientError::Network(message) => write!(formatter, "Network error: {message}"),
            ClientError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            ClientError::Http { status, message } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            ClientError::Parse(message) => write!(formatter, "Response error: {message}"),
            ClientError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
        }
    }
}

impl std::error::Error for ClientError {}

#[cfg(test)]
mod tests {
    use super::{ClientError, NETWORK_ERROR_MESSAGE};

    #[test]
    fn user_message_prefers_raw_backend_text() {
        let err = ClientError::Http {
            status: 409,
            message: "Email already in use".to_string(),
        };
        assert_eq!(err.user_message(), "Email already in use");
        assert_eq!(err.to_string(), "Request failed (409): Email already in use");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn network_errors_hide_transport_detail() {
        let err = ClientError::Network("dns error: no such host".to_string());
        assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
        assert!(err.to_string().contains("no such host"));
    }

    #[test]
    fn parse_errors_show_generic_message() {
        let err = ClientError::Parse("missing email".to_string());
        assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
        assert_eq!(err.to_string(), "Response error: missing email");
        assert_eq!(err.status(), None);
        assert!(!err.is_validation());
    }
}
