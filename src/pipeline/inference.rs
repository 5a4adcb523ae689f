//! Inference stage: ask the model for the dialogue script.
//!
//! Intentionally thin — all prompt engineering lives in [`crate::prompts`]
//! and all reply decoding in [`super::decode`]. This stage moves the
//! request over the wire, accounts for tokens, and pulls the text
//! fragments out of the reply.

use tracing::{debug, info};

use crate::api::{ArkBackend, ResponsesRequest};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

/// Run the inference call for an uploaded file and return the extracted
/// reply text.
///
/// The emptiness check catches replies with no `text`-typed fragments at
/// all. A whitespace-only reply passes through and fails in the decode
/// stage instead, as a malformed reply.
pub async fn request_script(
    backend: &dyn ArkBackend,
    file_id: &str,
    prompt: String,
    config: &AnalysisConfig,
) -> Result<String, AnalysisError> {
    if let Some(hook) = &config.progress {
        hook.on_inference_start();
    }

    let request = ResponsesRequest::for_file(&config.model, file_id, prompt);
    let reply = backend.create_response(request).await?;

    if let Some(usage) = reply.usage {
        debug!(
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            total_tokens = usage.total_tokens,
            "Inference token usage"
        );
    }

    let text = reply.text();
    if text.is_empty() {
        return Err(AnalysisError::EmptyReply);
    }
    info!(reply_bytes = text.len(), "Inference reply received");
    Ok(text)
}
