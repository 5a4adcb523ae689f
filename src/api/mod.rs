//! Wire contract for the ARK multimodal API, and the backend seam.
//!
//! Three endpoints are involved in one analysis:
//!
//! 1. `POST /files` — multipart upload (`purpose=user_data` + the PDF),
//!    answered with a [`StoredFile`] carrying the opaque file id.
//! 2. `GET /files/{id}` — processing status, polled until ready.
//! 3. `POST /responses` — the inference call: a [`ResponsesRequest`]
//!    referencing the file id plus the assembled prompt, answered with a
//!    [`ResponsesReply`] of output blocks.
//!
//! The serde types here mirror those bodies field-for-field. Everything
//! network-shaped goes through the [`ArkBackend`] trait so tests can swap
//! in a scripted double; [`ArkClient`] is the real implementation.

mod ark;

pub use ark::ArkClient;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

// ── Upload and status replies ─────────────────────────────────────────────

/// Reply from the upload endpoint and from status polls.
///
/// Only the fields this crate consumes are modelled; unknown fields are
/// ignored on decode.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredFile {
    /// Opaque handle referenced by the later inference request.
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
    /// Server-side processing state, when the server reports one.
    #[serde(default)]
    pub status: Option<String>,
}

impl StoredFile {
    /// Whether the file can be referenced by an inference request.
    ///
    /// Some API versions omit `status` entirely; an absent field is read
    /// as ready. That matches observed server behaviour but is not
    /// documented upstream.
    pub fn is_ready(&self) -> bool {
        matches!(self.status.as_deref(), None | Some("processed"))
    }

    /// Whether the server reported a hard processing failure.
    pub fn is_failed(&self) -> bool {
        self.status.as_deref() == Some("failed")
    }
}

// ── Inference request ─────────────────────────────────────────────────────

/// Body of the inference call.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputMessage>,
}

/// One message of the inference input.
#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: String,
    pub content: Vec<InputPart>,
}

/// A typed part of an input message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputPart {
    InputFile { file_id: String },
    InputText { text: String },
}

impl ResponsesRequest {
    /// The request shape every analysis sends: one user message holding
    /// the uploaded file reference followed by the prompt text.
    pub fn for_file(model: &str, file_id: &str, prompt: String) -> Self {
        ResponsesRequest {
            model: model.to_string(),
            input: vec![InputMessage {
                role: "user".to_string(),
                content: vec![
                    InputPart::InputFile {
                        file_id: file_id.to_string(),
                    },
                    InputPart::InputText { text: prompt },
                ],
            }],
        }
    }
}

// ── Inference reply ───────────────────────────────────────────────────────

/// Reply from the inference endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesReply {
    /// Output blocks, each holding zero or more content fragments.
    #[serde(default)]
    pub output: Vec<OutputBlock>,
    /// Token accounting, when the server reports it. Logged, never
    /// returned to callers.
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// A unit of the inference reply.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputBlock {
    #[serde(default)]
    pub content: Vec<ContentFragment>,
}

/// A typed piece of reply content. Only `text`-typed fragments contribute
/// to the extracted reply string.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentFragment {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Token usage reported by the inference endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

impl ResponsesReply {
    /// Concatenate every `text`-typed fragment across all output blocks,
    /// in the order received.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for block in &self.output {
            for fragment in &block.content {
                if fragment.kind == "text" {
                    if let Some(text) = &fragment.text {
                        out.push_str(text);
                    }
                }
            }
        }
        out
    }
}

// ── Backend seam ──────────────────────────────────────────────────────────

/// The three network operations an analysis performs.
///
/// [`ArkClient`] implements this against the real API; tests implement it
/// with scripted replies. Injected via
/// [`crate::config::AnalysisConfigBuilder::backend`]. Methods take owned
/// arguments and return [`BoxFuture`] so the trait stays object-safe.
pub trait ArkBackend: Send + Sync {
    /// Upload a PDF; the reply carries the file id and an optional
    /// initial processing status.
    fn upload_file(
        &self,
        filename: String,
        bytes: Vec<u8>,
    ) -> BoxFuture<'_, Result<StoredFile, AnalysisError>>;

    /// Fetch the current processing status of an uploaded file.
    fn file_status(&self, file_id: String) -> BoxFuture<'_, Result<StoredFile, AnalysisError>>;

    /// Run the inference request and return the raw reply.
    fn create_response(
        &self,
        request: ResponsesRequest,
    ) -> BoxFuture<'_, Result<ResponsesReply, AnalysisError>>;
}
