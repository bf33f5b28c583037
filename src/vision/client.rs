//! Custom Vision prediction client

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header;

use crate::config::VisionConfig;
use crate::error::{AppError, Result};

use super::types::{Detection, PredictionResponse};

const PREDICTION_KEY_HEADER: &str = "Prediction-Key";
const PREDICTION_TIMEOUT: Duration = Duration::from_secs(30);
const STATIC_URL_PREFIX: &str = "/static/";

/// Client for a published Custom Vision object-detection model.
pub struct PredictionClient {
    http: reqwest::Client,
    config: VisionConfig,
    /// Root of the statically served directory, for URL resolution.
    static_dir: PathBuf,
}

impl PredictionClient {
    pub fn new(config: VisionConfig, static_dir: PathBuf, http: reqwest::Client) -> Self {
        Self {
            http,
            config,
            static_dir,
        }
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        match (&self.config.prediction_url, &self.config.prediction_key) {
            (Some(url), Some(key)) => Ok((url, key)),
            _ => Err(AppError::Config(
                "AZURE_CV_PREDICTION_URL or AZURE_CV_PREDICTION_KEY is not set".to_string(),
            )),
        }
    }

    /// Detect objects in a local image file.
    pub async fn detect_from_path(&self, path: &Path) -> Result<Vec<Detection>> {
        let (url, key) = self.credentials()?;

        let image = std::fs::read(path).map_err(|err| {
            AppError::Storage(format!("failed to read {}: {err}", path.display()))
        })?;

        let response: PredictionResponse = self
            .http
            .post(url)
            .header(PREDICTION_KEY_HEADER, key)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .timeout(PREDICTION_TIMEOUT)
            .body(image)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .predictions
            .into_iter()
            .map(Detection::from)
            .collect())
    }

    /// Detect objects in an image referenced by its server-relative static
    /// URL. Fails with a not-found error if the resolved file is missing.
    pub async fn detect_from_url(&self, url: &str) -> Result<Vec<Detection>> {
        let path = self.resolve_static_url(url)?;
        if !path.exists() {
            return Err(AppError::InvalidInput(format!(
                "no image file at {}",
                path.display()
            )));
        }
        self.detect_from_path(&path).await
    }

    /// Map a `/static/...` URL onto the static directory.
    pub fn resolve_static_url(&self, url: &str) -> Result<PathBuf> {
        let relative = url.strip_prefix(STATIC_URL_PREFIX).ok_or_else(|| {
            AppError::InvalidInput(format!("not a static image URL: {url}"))
        })?;
        Ok(self.static_dir.join(relative))
    }
}
