//! The reqwest-backed [`ArkBackend`] implementation.
//!
//! One `reqwest::Client` serves all three endpoints; timeouts are set per
//! request because the multipart upload needs a much larger budget than a
//! status poll. Non-2xx replies from the upload and inference endpoints
//! carry the response body in the error detail (the body is where ARK
//! puts its diagnostic message); status polls report only the HTTP code.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::multipart;
use tracing::debug;

use crate::api::{ArkBackend, ResponsesReply, ResponsesRequest, StoredFile};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

/// Real-network client for the ARK API.
///
/// Construct via [`ArkClient::new`]; normally done for you by
/// [`crate::client::AnalysisClient::new`] when no backend override is
/// configured.
pub struct ArkClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    upload_timeout: Duration,
    api_timeout: Duration,
}

impl ArkClient {
    /// Build a client from a config and an already-resolved credential.
    pub fn new(config: &AnalysisConfig, api_key: String) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AnalysisError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(ArkClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            upload_timeout: Duration::from_secs(config.upload_timeout_secs),
            api_timeout: Duration::from_secs(config.api_timeout_secs),
        })
    }

    fn files_url(&self) -> String {
        format!("{}/files", self.base_url)
    }

    fn file_url(&self, file_id: &str) -> String {
        format!("{}/files/{}", self.base_url, file_id)
    }

    fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

/// Describe a send-phase failure, distinguishing timeouts.
fn send_detail(e: &reqwest::Error, timeout: Duration) -> String {
    if e.is_timeout() {
        format!("timed out after {}s", timeout.as_secs())
    } else {
        e.to_string()
    }
}

/// Describe a non-2xx reply, including the body the server sent.
async fn http_detail(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    format!("HTTP {status}: {}", body.trim())
}

impl ArkBackend for ArkClient {
    fn upload_file(
        &self,
        filename: String,
        bytes: Vec<u8>,
    ) -> BoxFuture<'_, Result<StoredFile, AnalysisError>> {
        async move {
            let size = bytes.len();
            let part = multipart::Part::bytes(bytes)
                .file_name(filename)
                .mime_str("application/pdf")
                .map_err(|e| AnalysisError::UploadFailed {
                    detail: e.to_string(),
                })?;
            let form = multipart::Form::new()
                .text("purpose", "user_data")
                .part("file", part);

            debug!(size, url = %self.files_url(), "Uploading PDF");
            let response = self
                .http
                .post(self.files_url())
                .bearer_auth(&self.api_key)
                .multipart(form)
                .timeout(self.upload_timeout)
                .send()
                .await
                .map_err(|e| AnalysisError::UploadFailed {
                    detail: send_detail(&e, self.upload_timeout),
                })?;

            if !response.status().is_success() {
                return Err(AnalysisError::UploadFailed {
                    detail: http_detail(response).await,
                });
            }

            response
                .json::<StoredFile>()
                .await
                .map_err(|e| AnalysisError::UploadFailed {
                    detail: format!("unexpected reply body: {e}"),
                })
        }
        .boxed()
    }

    fn file_status(&self, file_id: String) -> BoxFuture<'_, Result<StoredFile, AnalysisError>> {
        async move {
            let response = self
                .http
                .get(self.file_url(&file_id))
                .bearer_auth(&self.api_key)
                .timeout(self.api_timeout)
                .send()
                .await
                .map_err(|e| AnalysisError::StatusCheckFailed {
                    file_id: file_id.clone(),
                    detail: send_detail(&e, self.api_timeout),
                })?;

            if !response.status().is_success() {
                return Err(AnalysisError::StatusCheckFailed {
                    file_id,
                    detail: format!("HTTP {}", response.status()),
                });
            }

            response
                .json::<StoredFile>()
                .await
                .map_err(|e| AnalysisError::StatusCheckFailed {
                    file_id,
                    detail: format!("unexpected reply body: {e}"),
                })
        }
        .boxed()
    }

    fn create_response(
        &self,
        request: ResponsesRequest,
    ) -> BoxFuture<'_, Result<ResponsesReply, AnalysisError>> {
        async move {
            debug!(model = %request.model, url = %self.responses_url(), "Sending inference request");
            let response = self
                .http
                .post(self.responses_url())
                .bearer_auth(&self.api_key)
                .json(&request)
                .timeout(self.api_timeout)
                .send()
                .await
                .map_err(|e| AnalysisError::InferenceFailed {
                    detail: send_detail(&e, self.api_timeout),
                })?;

            if !response.status().is_success() {
                return Err(AnalysisError::InferenceFailed {
                    detail: http_detail(response).await,
                });
            }

            response
                .json::<ResponsesReply>()
                .await
                .map_err(|e| AnalysisError::InferenceFailed {
                    detail: format!("unexpected reply body: {e}"),
                })
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_join_cleanly() {
        let config = AnalysisConfig::builder()
            .base_url("https://ark.example.com/api/v3/")
            .build()
            .unwrap();
        let client = ArkClient::new(&config, "k".into()).unwrap();
        assert_eq!(client.files_url(), "https://ark.example.com/api/v3/files");
        assert_eq!(
            client.file_url("file-1"),
            "https://ark.example.com/api/v3/files/file-1"
        );
        assert_eq!(
            client.responses_url(),
            "https://ark.example.com/api/v3/responses"
        );
    }

    #[test]
    fn timeouts_come_from_the_config() {
        let config = AnalysisConfig::builder()
            .upload_timeout_secs(10)
            .api_timeout_secs(5)
            .build()
            .unwrap();
        let client = ArkClient::new(&config, "k".into()).unwrap();
        assert_eq!(client.upload_timeout, Duration::from_secs(10));
        assert_eq!(client.api_timeout, Duration::from_secs(5));
    }
}
