//! Read API client

use std::time::Duration;

use reqwest::header;
use tokio::time::Instant;

use crate::config::OcrConfig;
use crate::error::{AppError, Result};

use super::types::{ReadOperationResult, ReadStatus};

const READ_ANALYZE_PATH: &str = "/vision/v3.2/read/analyze";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const INITIAL_POLL_DELAY: Duration = Duration::from_millis(500);
const MAX_POLL_DELAY: Duration = Duration::from_secs(4);

/// Client for the Azure Computer Vision Read API.
pub struct ReadClient {
    http: reqwest::Client,
    config: OcrConfig,
}

impl ReadClient {
    pub fn new(config: OcrConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        match (&self.config.endpoint, &self.config.key) {
            (Some(endpoint), Some(key)) => Ok((endpoint, key)),
            _ => Err(AppError::Config(
                "Azure Computer Vision endpoint/key not set. Check .env or env vars.".to_string(),
            )),
        }
    }

    /// Extract the printed text from an image.
    ///
    /// Submits the bytes, polls the returned operation URL until it leaves
    /// the pending states, then joins every recognized line with `\n`.
    /// Transient vendor failures are not retried; the first error propagates.
    pub async fn extract_text(&self, image: &[u8]) -> Result<String> {
        let (endpoint, key) = self.credentials()?;

        let submit_url = format!("{}{}", endpoint.trim_end_matches('/'), READ_ANALYZE_PATH);
        let response = self
            .http
            .post(&submit_url)
            .header(SUBSCRIPTION_KEY_HEADER, key)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?
            .error_for_status()?;

        let operation_url = response
            .headers()
            .get("Operation-Location")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::Vendor(
                    "Read API response is missing the Operation-Location header".to_string(),
                )
            })?;

        let result = self.poll_operation(&operation_url, key).await?;
        if result.status != ReadStatus::Succeeded {
            return Err(AppError::Vendor(format!(
                "Read operation ended with status {:?}",
                result.status
            )));
        }

        Ok(result.joined_text())
    }

    /// Poll the operation URL with exponential backoff until it completes
    /// or the configured deadline passes.
    async fn poll_operation(&self, operation_url: &str, key: &str) -> Result<ReadOperationResult> {
        let deadline = Instant::now() + self.config.poll_timeout;
        let mut delay = INITIAL_POLL_DELAY;

        loop {
            tokio::time::sleep(delay).await;

            let result: ReadOperationResult = self
                .http
                .get(operation_url)
                .header(SUBSCRIPTION_KEY_HEADER, key)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if !result.status.is_pending() {
                return Ok(result);
            }
            if Instant::now() >= deadline {
                return Err(AppError::Vendor(format!(
                    "Read operation still pending after {}s",
                    self.config.poll_timeout.as_secs()
                )));
            }

            delay = (delay * 2).min(MAX_POLL_DELAY);
        }
    }
}
