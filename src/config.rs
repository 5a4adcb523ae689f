//! Configuration for paper analysis.
//!
//! All behaviour is controlled through [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config across calls, log it, and diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on well-documented
//! defaults for the rest; `build()` validates the combination once so the
//! client never has to re-check.

use crate::api::ArkBackend;
use crate::error::AnalysisError;
use crate::progress::ProgressHook;
use std::fmt;
use std::sync::Arc;

/// Default ARK API endpoint (Beijing region).
pub const DEFAULT_BASE_URL: &str = "https://ark.cn-beijing.volces.com/api/v3";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "doubao-seed-1-6-251015";

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "ARK_API_KEY";

/// Credential used when neither the config nor the environment provides
/// one. Requests sent with it fail authentication, which surfaces through
/// the normal error path rather than a separate "unconfigured" state.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_ARK_API_KEY_HERE";

/// Upload size ceiling enforced before any network call: 512 MB, the
/// Files API limit.
pub const MAX_FILE_BYTES: u64 = 512 * 1024 * 1024;

/// Configuration for an [`AnalysisClient`](crate::client::AnalysisClient).
///
/// Built via [`AnalysisConfig::builder()`] or using
/// [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use paper2script::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .api_key("ak-...")
///     .model("doubao-seed-1-6-251015")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Base URL of the ARK API. Default: [`DEFAULT_BASE_URL`].
    ///
    /// Point this at a regional endpoint or a proxy; the three request
    /// paths (`/files`, `/files/{id}`, `/responses`) are appended to it.
    pub base_url: String,

    /// Bearer token for all three endpoints. Default: `None`.
    ///
    /// `None` means: read [`API_KEY_ENV`] at client construction, falling
    /// back to [`PLACEHOLDER_API_KEY`] (which fails authentication through
    /// the normal error path). Set explicitly to avoid any environment
    /// coupling, e.g. in tests.
    pub api_key: Option<String>,

    /// Model identifier sent with every inference request. Default:
    /// [`DEFAULT_MODEL`].
    pub model: String,

    /// Upload size ceiling in bytes. Default: [`MAX_FILE_BYTES`] (512 MB).
    ///
    /// Checked before any network call; for path input only filesystem
    /// metadata is read. The default matches the server-side Files API
    /// limit, so raising it only moves the failure from a local error to
    /// an HTTP 413.
    pub max_file_bytes: u64,

    /// Delay between file-status polls, in milliseconds. Default: 2000.
    pub poll_interval_ms: u64,

    /// Status-poll attempt ceiling. Default: 30.
    ///
    /// With the default interval that bounds the processing wait at about
    /// a minute; afterwards the call fails with a processing timeout.
    pub max_poll_attempts: u32,

    /// Timeout for the multipart upload request, in seconds. Default: 600.
    ///
    /// Uploads can be two orders of magnitude larger than any other
    /// request in the pipeline, so they get their own budget.
    pub upload_timeout_secs: u64,

    /// Timeout for status polls and the inference request, in seconds.
    /// Default: 300. The inference call dominates: generating a 25-round
    /// script from a dense paper routinely takes minutes.
    pub api_timeout_secs: u64,

    /// Pre-constructed backend. Takes precedence over `base_url`/`api_key`.
    ///
    /// This is the test seam: inject a scripted [`ArkBackend`] and no real
    /// network is touched.
    pub backend: Option<Arc<dyn ArkBackend>>,

    /// Progress hook observing the phases of each call. Default: `None`.
    pub progress: Option<ProgressHook>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_file_bytes: MAX_FILE_BYTES,
            poll_interval_ms: 2000,
            max_poll_attempts: 30,
            upload_timeout_secs: 600,
            api_timeout_secs: 300,
            backend: None,
            progress: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_file_bytes", &self.max_file_bytes)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn ArkBackend>"))
            .field("progress", &self.progress.as_ref().map(|_| "<dyn AnalysisProgress>"))
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_bytes = bytes.max(1);
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms.max(1);
        self
    }

    pub fn max_poll_attempts(mut self, n: u32) -> Self {
        self.config.max_poll_attempts = n.max(1);
        self
    }

    pub fn upload_timeout_secs(mut self, secs: u64) -> Self {
        self.config.upload_timeout_secs = secs.max(1);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn backend(mut self, backend: Arc<dyn ArkBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn progress(mut self, hook: ProgressHook) -> Self {
        self.config.progress = Some(hook);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, AnalysisError> {
        let c = &self.config;
        if c.base_url.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig("base_url must not be empty".into()));
        }
        if c.model.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig("model must not be empty".into()));
        }
        Ok(self.config)
    }
}
