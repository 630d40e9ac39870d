//! Avatar upload widget model. Files are checked locally against size and
//! MIME type rules before anything is sent; successful changes reload the
//! session so the displayed avatar matches what the backend stored.

use crate::{client::SelectedFile, notice::Notice, session::SessionStore};
use tracing::{debug, instrument};

pub const DEFAULT_MAX_SIZE_MB: u64 = 5;
pub const DEFAULT_ALLOWED_TYPE: &str = "image/*";

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRules {
    pub max_size_mb: u64,
    /// Exact MIME types or `type/*` wildcards.
    pub allowed_types: Vec<String>,
}

impl Default for FileRules {
    fn default() -> Self {
        Self {
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            allowed_types: vec![DEFAULT_ALLOWED_TYPE.to_string()],
        }
    }
}

impl FileRules {
    /// Checks a selected file, returning the message to show on rejection.
    ///
    /// # Errors
    /// Returns a deterministic message naming the size limit or the allowed
    /// types.
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self, file: &SelectedFile) -> Result<(), String> {
        let max_bytes = self.max_size_mb.saturating_mul(BYTES_PER_MB);
        let size = file.size() as u64;
        if size > max_bytes {
            return Err(format!(
                "File size exceeds {}MB limit ({:.2}MB)",
                self.max_size_mb,
                size as f64 / BYTES_PER_MB as f64
            ));
        }

        if !self
            .allowed_types
            .iter()
            .any(|pattern| mime_matches(pattern, &file.mime_type))
        {
            return Err(format!(
                "Invalid file type. Allowed types: {}",
                self.allowed_types.join(", ")
            ));
        }

        Ok(())
    }
}

fn mime_matches(pattern: &str, mime_type: &str) -> bool {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    let pattern = pattern.trim().to_ascii_lowercase();
    match pattern.strip_suffix("/*") {
        Some(prefix) => mime_type
            .strip_prefix(prefix)
            .map_or(false, |rest| rest.starts_with('/') && rest.len() > 1),
        None => mime_type == pattern,
    }
}

pub struct AvatarWidget {
    store: SessionStore,
    rules: FileRules,
    is_uploading: bool,
    is_deleting: bool,
    error: Option<String>,
}

impl AvatarWidget {
    #[must_use]
    pub fn new(store: SessionStore) -> Self {
        Self::with_rules(store, FileRules::default())
    }

    #[must_use]
    pub fn with_rules(store: SessionStore, rules: FileRules) -> Self {
        Self {
            store,
            rules,
            is_uploading: false,
            is_deleting: false,
            error: None,
        }
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.is_uploading || self.is_deleting
    }

    #[must_use]
    pub const fn is_uploading(&self) -> bool {
        self.is_uploading
    }

    #[must_use]
    pub const fn is_deleting(&self) -> bool {
        self.is_deleting
    }

    /// Inline error shown above the avatar.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn rules(&self) -> &FileRules {
        &self.rules
    }

    /// Validates and uploads a newly picked image.
    #[instrument(skip_all, fields(file.size = file.size()))]
    pub async fn upload(&mut self, file: &SelectedFile) -> Notice {
        self.error = None;

        if let Err(message) = self.rules.validate(file) {
            self.error = Some(message.clone());
            return Notice::error("Invalid file", message);
        }

        self.is_uploading = true;
        let result = self.store.client().upload_avatar(file).await;
        self.is_uploading = false;

        match result {
            Ok(()) => {
                self.reload().await;
                Notice::success(
                    "Avatar updated",
                    "Your profile picture has been updated successfully",
                )
            }
            Err(err) => {
                let message = err.user_message();
                self.error = Some(message.clone());
                Notice::error("Upload failed", message)
            }
        }
    }

    /// Removes the current avatar. Does nothing when there is none.
    #[instrument(skip_all)]
    pub async fn delete(&mut self, current_avatar_url: Option<&str>) -> Option<Notice> {
        current_avatar_url.filter(|url| !url.trim().is_empty())?;

        self.error = None;
        self.is_deleting = true;
        let result = self.store.client().delete_avatar().await;
        self.is_deleting = false;

        let notice = match result {
            Ok(()) => {
                self.reload().await;
                Notice::success("Avatar removed", "Your profile picture has been removed")
            }
            Err(err) => {
                let message = err.user_message();
                self.error = Some(message.clone());
                Notice::error("Delete failed", message)
            }
        };
        Some(notice)
    }

    async fn reload(&self) {
        // The store records refresh failures itself.
        if let Err(err) = self.store.refresh().await {
            debug!("session refresh after avatar change failed: {err}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::client::{
        AuthClient, ClientConfig, AVATAR_PATH, CURRENT_USER_PATH, NETWORK_ERROR_MESSAGE,
    };
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn widget_for(uri: &str) -> AvatarWidget {
        let client = AuthClient::new(&ClientConfig::new(uri)).unwrap();
        let (store, _routes) = SessionStore::new(client);
        AvatarWidget::new(store)
    }

    fn png(size: usize) -> SelectedFile {
        SelectedFile::new("me.png", "image/png", vec![0; size])
    }

    #[test]
    fn mime_patterns() {
        assert!(mime_matches("image/*", "image/png"));
        assert!(mime_matches("image/*", "IMAGE/JPEG"));
        assert!(!mime_matches("image/*", "image/"));
        assert!(!mime_matches("image/*", "imagex/png"));
        assert!(!mime_matches("image/*", "application/pdf"));
        assert!(mime_matches("image/png", "image/png"));
        assert!(!mime_matches("image/png", "image/gif"));
    }

    #[test]
    fn oversized_file_names_the_limit() {
        let rules = FileRules::default();
        let file = png(6 * 1024 * 1024);
        assert_eq!(
            rules.validate(&file),
            Err("File size exceeds 5MB limit (6.00MB)".to_string())
        );
        assert!(rules.validate(&png(5 * 1024 * 1024)).is_ok());
    }

    #[test]
    fn disallowed_type_lists_allowed_types() {
        let rules = FileRules {
            max_size_mb: 2,
            allowed_types: vec!["image/png".to_string(), "image/jpeg".to_string()],
        };
        let file = SelectedFile::new("doc.pdf", "application/pdf", vec![1, 2, 3]);
        assert_eq!(
            rules.validate(&file),
            Err("Invalid file type. Allowed types: image/png, image/jpeg".to_string())
        );
    }

    #[tokio::test]
    async fn invalid_file_never_reaches_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(AVATAR_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut widget = widget_for(&server.uri());
        let notice = widget.upload(&png(6 * 1024 * 1024)).await;
        assert!(notice.is_error());
        assert_eq!(notice.title, "Invalid file");
        assert_eq!(
            widget.error(),
            Some("File size exceeds 5MB limit (6.00MB)")
        );
    }

    #[tokio::test]
    async fn upload_success_refreshes_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(AVATAR_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(CURRENT_USER_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "id": 1, "email": "a@b.com", "avatarUrl": "https://cdn/a.png" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut widget = widget_for(&server.uri());
        let notice = widget.upload(&png(1024)).await;
        assert!(!notice.is_error());
        assert_eq!(widget.error(), None);
        assert!(!widget.is_busy());
        assert_eq!(
            widget.store.user().and_then(|u| u.avatar_url),
            Some("https://cdn/a.png".to_string())
        );
    }

    #[tokio::test]
    async fn upload_failure_shows_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(AVATAR_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "message": "Unsupported image format"
            })))
            .mount(&server)
            .await;

        let mut widget = widget_for(&server.uri());
        let notice = widget.upload(&png(10)).await;
        assert_eq!(notice.title, "Upload failed");
        assert_eq!(notice.description, "Unsupported image format");
        assert_eq!(widget.error(), Some("Unsupported image format"));
    }

    #[tokio::test]
    async fn upload_network_failure_uses_generic_message() {
        let mut widget = widget_for("http://127.0.0.1:1");
        let notice = widget.upload(&png(10)).await;
        assert_eq!(notice.description, NETWORK_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn delete_without_avatar_is_noop() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(AVATAR_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut widget = widget_for(&server.uri());
        assert_eq!(widget.delete(None).await, None);
        assert_eq!(widget.delete(Some("")).await, None);
    }

    #[tokio::test]
    async fn delete_success_refreshes_session() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(AVATAR_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(CURRENT_USER_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1, "email": "a@b.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut widget = widget_for(&server.uri());
        let notice = widget.delete(Some("https://cdn/a.png")).await.unwrap();
        assert_eq!(notice.title, "Avatar removed");
        assert_eq!(widget.store.user().and_then(|u| u.avatar_url), None);
    }
}
