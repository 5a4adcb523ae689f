//! Analysis entry points.
//!
//! ## The contract edge
//!
//! [`AnalysisClient::analyze`] never fails: whatever goes wrong — a local
//! guard, any of the three network phases, reply decoding — the caller
//! receives the themed fallback script with the error message embedded as
//! a dialogue line. UI layers can therefore render every result the same
//! way and never need an error state.
//!
//! The `try_analyze*` variants expose the typed [`AnalysisError`] instead,
//! for callers that want to branch on failure kinds (retry queues, CLI
//! exit codes, tests).

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ArkBackend, ArkClient};
use crate::config::{AnalysisConfig, API_KEY_ENV, PLACEHOLDER_API_KEY};
use crate::error::AnalysisError;
use crate::pipeline::{decode, inference, upload};
use crate::prompts;
use crate::script::DialogueScript;
use crate::settings::AnalysisSettings;

/// Client for turning paper PDFs into dialogue scripts.
///
/// Construction resolves the backend and credential once; the client is
/// then cheap to share and every call is an independent request/response
/// cycle, so concurrent `analyze` calls do not interfere.
///
/// # Example
/// ```rust,no_run
/// use paper2script::{AnalysisClient, AnalysisConfig, AnalysisSettings};
///
/// # #[tokio::main]
/// # async fn main() {
/// let client = AnalysisClient::new(AnalysisConfig::default()).unwrap();
/// let script = client.analyze("paper.pdf", &AnalysisSettings::default()).await;
/// for line in &script.lines {
///     println!("{}: {}", line.speaker, line.text);
/// }
/// # }
/// ```
pub struct AnalysisClient {
    backend: Arc<dyn ArkBackend>,
    config: AnalysisConfig,
}

impl AnalysisClient {
    /// Build a client from a configuration.
    ///
    /// Uses the injected backend when one is configured, otherwise
    /// constructs an [`ArkClient`] with the resolved credential.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidConfig`] when the HTTP client
    /// cannot be constructed.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let backend: Arc<dyn ArkBackend> = match &config.backend {
            Some(backend) => Arc::clone(backend),
            None => {
                let api_key = resolve_api_key(&config);
                Arc::new(ArkClient::new(&config, api_key)?)
            }
        };
        Ok(AnalysisClient { backend, config })
    }

    /// Analyze a paper PDF on disk. Never fails: errors become the themed
    /// fallback script.
    pub async fn analyze(
        &self,
        pdf: impl AsRef<Path>,
        settings: &AnalysisSettings,
    ) -> DialogueScript {
        match self.try_analyze(pdf, settings).await {
            Ok(script) => script,
            Err(e) => {
                warn!("Analysis failed: {e}");
                DialogueScript::fallback(&e.to_string())
            }
        }
    }

    /// Analyze in-memory PDF bytes. Never fails: errors become the themed
    /// fallback script.
    pub async fn analyze_bytes(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        settings: &AnalysisSettings,
    ) -> DialogueScript {
        match self.try_analyze_bytes(filename, bytes, settings).await {
            Ok(script) => script,
            Err(e) => {
                warn!("Analysis failed: {e}");
                DialogueScript::fallback(&e.to_string())
            }
        }
    }

    /// Analyze a paper PDF on disk, surfacing the typed error.
    ///
    /// # Arguments
    /// * `pdf`      — path to the PDF file
    /// * `settings` — detail level and narrator personality
    ///
    /// # Errors
    /// Any [`AnalysisError`]: local guards (size, readability, magic
    /// bytes), upload/processing failures, inference failures, or a
    /// malformed reply.
    pub async fn try_analyze(
        &self,
        pdf: impl AsRef<Path>,
        settings: &AnalysisSettings,
    ) -> Result<DialogueScript, AnalysisError> {
        let path = pdf.as_ref();
        info!("Starting analysis: {}", path.display());

        // Metadata first: an oversized file is rejected without reading
        // its body, let alone touching the network.
        let metadata =
            tokio::fs::metadata(path)
                .await
                .map_err(|e| AnalysisError::FileUnreadable {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        if metadata.len() > self.config.max_file_bytes {
            return Err(AnalysisError::FileTooLarge {
                size: metadata.len(),
                limit: self.config.max_file_bytes,
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AnalysisError::FileUnreadable {
                path: path.to_path_buf(),
                source: e,
            })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "paper.pdf".to_string());

        self.try_analyze_bytes(&filename, bytes, settings).await
    }

    /// Analyze in-memory PDF bytes, surfacing the typed error.
    ///
    /// `filename` is forwarded to the upload endpoint; it does not need to
    /// exist on disk.
    pub async fn try_analyze_bytes(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        settings: &AnalysisSettings,
    ) -> Result<DialogueScript, AnalysisError> {
        // ── Step 1: Local guards, before any network ─────────────────────
        let size = bytes.len() as u64;
        if size > self.config.max_file_bytes {
            return Err(AnalysisError::FileTooLarge {
                size,
                limit: self.config.max_file_bytes,
            });
        }
        check_pdf_magic(&bytes)?;
        debug!(filename, size, "Input passed local guards");

        // ── Step 2: Upload and wait for server-side processing ───────────
        let file_id = upload::upload_and_wait(
            self.backend.as_ref(),
            filename.to_string(),
            bytes,
            &self.config,
        )
        .await?;

        // ── Step 3: Assemble the prompt and run inference ────────────────
        let prompt = prompts::build_prompt(settings);
        let text =
            inference::request_script(self.backend.as_ref(), &file_id, prompt, &self.config)
                .await?;

        // ── Step 4: Decode and validate the script ───────────────────────
        let script = decode::decode_script(&text)?;
        info!(
            title = %script.title,
            lines = script.lines.len(),
            "Script decoded"
        );
        if let Some(hook) = &self.config.progress {
            hook.on_script_ready(script.lines.len());
        }
        Ok(script)
    }

    /// Synchronous wrapper around [`AnalysisClient::analyze`].
    ///
    /// Creates a temporary tokio runtime internally; a runtime that cannot
    /// be created is reported through the fallback script like any other
    /// failure.
    pub fn analyze_sync(
        &self,
        pdf: impl AsRef<Path>,
        settings: &AnalysisSettings,
    ) -> DialogueScript {
        match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime.block_on(self.analyze(pdf, settings)),
            Err(e) => DialogueScript::fallback(&format!("failed to create async runtime: {e}")),
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

/// Resolve the bearer credential, from most-specific to least-specific:
///
/// 1. **Explicit key** (`config.api_key`) — no environment coupling;
///    what tests and embedding applications should use.
/// 2. **Environment** (`ARK_API_KEY`) — the conventional deployment path.
/// 3. **Placeholder** — requests carry an obviously-invalid token and
///    fail authentication through the normal error path, so an
///    unconfigured setup produces the fallback script, not a panic.
fn resolve_api_key(config: &AnalysisConfig) -> String {
    if let Some(key) = &config.api_key {
        return key.clone();
    }
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.is_empty() => key,
        _ => {
            warn!("No API key configured and {API_KEY_ENV} is unset; requests will fail authentication");
            PLACEHOLDER_API_KEY.to_string()
        }
    }
}

/// Reject bytes that cannot be a PDF before spending bandwidth on them.
///
/// Inputs shorter than the magic itself are let through; the server
/// rejects them with a proper diagnostic.
fn check_pdf_magic(bytes: &[u8]) -> Result<(), AnalysisError> {
    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(AnalysisError::NotAPdf { magic });
    }
    Ok(())
}
