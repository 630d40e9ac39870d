//! Client configuration. The API base URL comes from `VESTIBULE_API_URL` at
//! runtime so one build can talk to different backends. Values here are
//! public; secrets never belong in this struct.

use std::time::Duration;

pub const API_URL_ENV: &str = "VESTIBULE_API_URL";
/// Default request timeout applied to every backend call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    /// Loads defaults and applies the environment override when set.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();
        if let Some(value) = std::env::var(API_URL_ENV)
            .ok()
            .and_then(|value| normalize_value(&value))
        {
            config.api_base_url = value;
        }
        config
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_value_trims_and_rejects_empty() {
        assert_eq!(normalize_value(""), None);
        assert_eq!(normalize_value("   "), None);
        assert_eq!(
            normalize_value("  https://api.example.com "),
            Some("https://api.example.com".to_string())
        );
    }

    #[test]
    fn load_reads_env_override() {
        temp_env::with_var(API_URL_ENV, Some(" https://accounts.example/api "), || {
            let config = ClientConfig::load();
            assert_eq!(config.api_base_url, "https://accounts.example/api");
            assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        });
    }

    #[test]
    fn load_ignores_blank_env() {
        temp_env::with_var(API_URL_ENV, Some("  "), || {
            assert_eq!(ClientConfig::load().api_base_url, DEFAULT_API_BASE_URL);
        });
    }
}
