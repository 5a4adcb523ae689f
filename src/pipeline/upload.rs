//! Upload stage: put the PDF on the server and wait until it is ready.
//!
//! The upload reply itself may already carry a terminal status. Only when
//! it reports an in-progress state does the poll loop run; an absent
//! status means the server skipped the processing stage entirely and the
//! file can be referenced immediately.

use std::time::Duration;

use tracing::{debug, warn};

use crate::api::ArkBackend;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

/// Upload `bytes` and return the file id once the server reports the file
/// ready for inference.
pub async fn upload_and_wait(
    backend: &dyn ArkBackend,
    filename: String,
    bytes: Vec<u8>,
    config: &AnalysisConfig,
) -> Result<String, AnalysisError> {
    if let Some(hook) = &config.progress {
        hook.on_upload_start(bytes.len() as u64);
    }

    let file = backend.upload_file(filename, bytes).await?;
    debug!(file_id = %file.id, status = ?file.status, "Upload accepted");

    if file.is_failed() {
        warn!(file_id = %file.id, "Server rejected the file at upload");
        return Err(AnalysisError::ProcessingFailed { file_id: file.id });
    }
    if !file.is_ready() {
        wait_until_ready(backend, &file.id, config).await?;
    }

    if let Some(hook) = &config.progress {
        hook.on_file_ready();
    }
    Ok(file.id)
}

/// Poll the status endpoint until the file is processed.
///
/// Plain bounded retry with a fixed cadence, no backoff: 2 s and 30
/// attempts by default, bounding the wait at about a minute. The sleep
/// runs after every non-terminal reply, the final attempt included.
async fn wait_until_ready(
    backend: &dyn ArkBackend,
    file_id: &str,
    config: &AnalysisConfig,
) -> Result<(), AnalysisError> {
    let interval = Duration::from_millis(config.poll_interval_ms);

    for attempt in 1..=config.max_poll_attempts {
        if let Some(hook) = &config.progress {
            hook.on_poll(attempt, config.max_poll_attempts);
        }

        let file = backend.file_status(file_id.to_string()).await?;

        if file.is_ready() {
            debug!(file_id, attempt, "File processed");
            return Ok(());
        }
        if file.is_failed() {
            warn!(file_id, attempt, "Server-side processing failed");
            return Err(AnalysisError::ProcessingFailed {
                file_id: file_id.to_string(),
            });
        }

        debug!(file_id, attempt, status = ?file.status, "File still processing");
        tokio::time::sleep(interval).await;
    }

    Err(AnalysisError::ProcessingTimeout {
        file_id: file_id.to_string(),
        attempts: config.max_poll_attempts,
    })
}
