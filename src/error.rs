//! Error types for the paper2script library.
//!
//! Every failure a call can hit — local guards, the three network phases,
//! reply decoding — is a variant of [`AnalysisError`]. The typed error is
//! what `try_analyze*` returns; the never-failing `analyze*` entry points
//! catch it at the contract edge and fold it into the themed fallback
//! script instead (see [`crate::script::DialogueScript::fallback`]).
//!
//! Display strings are embedded verbatim into a dialogue line of that
//! fallback script, so every variant must render as a single line.

use std::path::PathBuf;
use thiserror::Error;

/// All errors raised by the paper2script library.
///
/// Callers of the `analyze*` entry points never see these; callers of
/// `try_analyze*` match on them.
#[derive(Debug, Error)]
pub enum AnalysisError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input exceeds the upload size ceiling. Checked before any network
    /// call; for path input the check reads filesystem metadata only.
    #[error("file is {size} bytes, over the {limit}-byte upload ceiling (512 MB)")]
    FileTooLarge { size: u64, limit: u64 },

    /// The input path could not be read.
    #[error("failed to read PDF '{}': {source}", .path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes do not start with the `%PDF` magic.
    #[error("input is not a PDF (leading bytes {magic:?})")]
    NotAPdf { magic: [u8; 4] },

    // ── Upload and processing errors ──────────────────────────────────────
    /// The multipart upload was rejected or never completed.
    #[error("file upload failed: {detail}")]
    UploadFailed { detail: String },

    /// A status poll request itself failed (transport or non-2xx).
    #[error("status check for file '{file_id}' failed: {detail}")]
    StatusCheckFailed { file_id: String, detail: String },

    /// The server reported `failed` for the uploaded file.
    #[error("server-side processing failed for file '{file_id}'")]
    ProcessingFailed { file_id: String },

    /// The file never reached `processed` within the attempt ceiling.
    #[error("file '{file_id}' was still processing after {attempts} status checks")]
    ProcessingTimeout { file_id: String, attempts: u32 },

    // ── Inference and decoding errors ─────────────────────────────────────
    /// The inference request was rejected or never completed.
    #[error("inference request failed: {detail}")]
    InferenceFailed { detail: String },

    /// The inference reply contained no text-typed content at all.
    #[error("inference reply contained no text output")]
    EmptyReply,

    /// The reply text was not the expected JSON script.
    #[error("could not decode dialogue script: {detail}")]
    MalformedReply { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
