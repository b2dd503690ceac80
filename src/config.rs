//! Client configuration.
//!
//! [`RenderConfig`] and [`UploadConfig`] are explicit settings structs,
//! passed to the clients at construction. The `from_env` constructors read
//! the variable names existing deployments already use, so a service can
//! keep its environment unchanged while wiring the clients explicitly.

use crate::transport::BackoffConfig;
use std::time::Duration;

/// Default per-request timeout for render calls.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Default storage content-upload endpoint.
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://content.dropboxapi.com/2/files/upload";

/// Default folder prefix for uploaded documents.
pub const DEFAULT_BASE_PATH: &str = "/Apps/LegalFormApp";

/// Settings for [`RenderClient`](crate::render::RenderClient).
///
/// # Example
///
/// ```
/// use doc_pipeline::config::RenderConfig;
/// use std::time::Duration;
///
/// let config = RenderConfig::new("https://render.example.com/api/render")
///     .with_access_key("key-123")
///     .with_timeout(Duration::from_secs(90));
/// ```
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Render service URL. Empty means not configured; render attempts
    /// fail before any network call.
    pub endpoint: String,

    /// Access key sent in the request body. Optional: open-access servers
    /// run without one.
    pub access_key: Option<String>,

    /// Per-request timeout. Default: 60 seconds.
    pub timeout: Duration,

    /// Retry policy for transient failures. Default:
    /// [`BackoffConfig::standard()`].
    pub backoff: BackoffConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_key: None,
            timeout: DEFAULT_RENDER_TIMEOUT,
            backoff: BackoffConfig::standard(),
        }
    }
}

impl RenderConfig {
    /// Create a config pointing at the given endpoint, with defaults for
    /// everything else.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_access_key(mut self, key: impl Into<String>) -> Self {
        self.access_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// Read configuration from the environment.
    ///
    /// Variables: `DOCMOSIS_API_URL`, `DOCMOSIS_ACCESS_KEY`,
    /// `DOCMOSIS_TIMEOUT` (seconds), `DOCMOSIS_RETRY_ATTEMPTS`.
    /// Unset or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let timeout = std::env::var("DOCMOSIS_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RENDER_TIMEOUT);

        let mut backoff = BackoffConfig::standard();
        if let Some(retries) = std::env::var("DOCMOSIS_RETRY_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
        {
            backoff.max_retries = retries;
        }

        Self {
            endpoint: std::env::var("DOCMOSIS_API_URL").unwrap_or_default(),
            access_key: std::env::var("DOCMOSIS_ACCESS_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            timeout,
            backoff,
        }
    }
}

/// Settings for [`StorageClient`](crate::storage::StorageClient).
///
/// # Example
///
/// ```
/// use doc_pipeline::config::UploadConfig;
///
/// let config = UploadConfig::new("token-abc").with_base_path("/Team/Cases");
/// assert!(config.enabled);
/// ```
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Content-upload URL. Default: the Dropbox content endpoint.
    pub endpoint: String,

    /// Bearer token for the storage API. Uploads fail without one.
    pub access_token: Option<String>,

    /// Folder prefix prepended to every destination path.
    /// Default: `/Apps/LegalFormApp`.
    pub base_path: String,

    /// Master switch. When false the client refuses uploads without making
    /// network calls.
    pub enabled: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_UPLOAD_ENDPOINT.to_string(),
            access_token: None,
            base_path: DEFAULT_BASE_PATH.to_string(),
            enabled: false,
        }
    }
}

impl UploadConfig {
    /// Create an enabled config with the given access token and defaults
    /// for everything else.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            enabled: true,
            ..Self::default()
        }
    }

    /// Create a disabled config. Every upload fails with
    /// [`UploadDisabled`](crate::PipelineError::UploadDisabled).
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Read configuration from the environment.
    ///
    /// Variables: `DROPBOX_ACCESS_TOKEN`, `DROPBOX_BASE_PATH`,
    /// `DROPBOX_ENABLED` (`"true"` enables, anything else disables).
    pub fn from_env() -> Self {
        Self {
            endpoint: DEFAULT_UPLOAD_ENDPOINT.to_string(),
            access_token: std::env::var("DROPBOX_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            base_path: std::env::var("DROPBOX_BASE_PATH")
                .unwrap_or_else(|_| DEFAULT_BASE_PATH.to_string()),
            enabled: std::env::var("DROPBOX_ENABLED")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}
