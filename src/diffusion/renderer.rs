//! Illustration renderer

use std::path::PathBuf;

use base64::Engine;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::DiffusionConfig;
use crate::error::{AppError, Result};

use super::types::{
    LoadModelRequest, LoadModelResponse, PipelineOptionsRequest, RenderRequest, RenderedImage,
    Txt2ImgRequest, Txt2ImgResponse,
};

const GENERATED_URL_PREFIX: &str = "/static/generated";

/// State of the sidecar pipeline once it has been loaded.
#[derive(Debug)]
struct PipelineInfo {
    device: String,
    dtype: String,
}

/// Owns the process-wide diffusion pipeline handle.
///
/// The handle is initialized lazily on first render and lives for the rest
/// of the process. The mutex is held across sampling, so concurrent requests
/// queue for the single in-memory model instead of racing it. A failed
/// initialization leaves the handle empty; a later call retries.
pub struct Renderer {
    http: reqwest::Client,
    config: DiffusionConfig,
    generated_dir: PathBuf,
    pipeline: Mutex<Option<PipelineInfo>>,
}

impl Renderer {
    pub fn new(config: DiffusionConfig, generated_dir: PathBuf, http: reqwest::Client) -> Self {
        Self {
            http,
            config,
            generated_dir,
            pipeline: Mutex::new(None),
        }
    }

    /// Render one illustration and persist it as a PNG under the generated
    /// images directory with a fresh UUID filename.
    pub async fn generate(&self, request: &RenderRequest) -> Result<RenderedImage> {
        let png = {
            let mut pipeline = self.pipeline.lock().await;
            if pipeline.is_none() {
                *pipeline = Some(self.load_pipeline().await?);
            }
            if let Some(info) = pipeline.as_ref() {
                tracing::debug!(device = %info.device, dtype = %info.dtype, "sampling");
            }
            self.txt2img(request).await?
            // Lock released here; decoding and disk I/O don't need the model.
        };

        self.save_png(&png)
    }

    async fn load_pipeline(&self) -> Result<PipelineInfo> {
        let model_id = self
            .config
            .model_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Config("SD_MODEL_ID is not set or empty".to_string()))?;

        tracing::info!(model_id, "loading diffusion pipeline");
        let load_url = format!("{}/v1/load", self.config.api_url.trim_end_matches('/'));
        let loaded: LoadModelResponse = self
            .http
            .post(&load_url)
            .json(&LoadModelRequest { model_id })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        tracing::info!(device = %loaded.device, dtype = %loaded.dtype, "diffusion pipeline ready");

        // Best-effort memory savers. A failure is logged and swallowed; the
        // pipeline renders fine without them.
        let options_url = format!("{}/v1/options", self.config.api_url.trim_end_matches('/'));
        let options = PipelineOptionsRequest {
            attention_slicing: true,
            vae_tiling: true,
        };
        let enabled = self
            .http
            .post(&options_url)
            .json(&options)
            .send()
            .await
            .and_then(|response| response.error_for_status());
        if let Err(err) = enabled {
            tracing::warn!(error = %err, "failed to enable pipeline memory options");
        }

        Ok(PipelineInfo {
            device: loaded.device,
            dtype: loaded.dtype,
        })
    }

    async fn txt2img(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        let url = format!("{}/v1/txt2img", self.config.api_url.trim_end_matches('/'));
        let response: Txt2ImgResponse = self
            .http
            .post(&url)
            .json(&Txt2ImgRequest::from_render(request))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        base64::engine::general_purpose::STANDARD
            .decode(&response.image)
            .map_err(|err| AppError::Vendor(format!("sidecar returned invalid base64 image: {err}")))
    }

    fn save_png(&self, png: &[u8]) -> Result<RenderedImage> {
        let image = image::load_from_memory(png)
            .map_err(|err| AppError::Vendor(format!("sidecar returned an undecodable image: {err}")))?;

        // Idempotent; safe under concurrent equal invocation.
        std::fs::create_dir_all(&self.generated_dir).map_err(|err| {
            AppError::Storage(format!(
                "failed to create {}: {err}",
                self.generated_dir.display()
            ))
        })?;

        let filename = format!("{}.png", Uuid::new_v4().simple());
        let path = self.generated_dir.join(&filename);
        image
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|err| AppError::Storage(format!("failed to write {}: {err}", path.display())))?;

        tracing::debug!(path = %path.display(), "illustration written");
        Ok(RenderedImage {
            url: format!("{GENERATED_URL_PREFIX}/{filename}"),
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn renderer(model_id: Option<&str>, generated_dir: PathBuf) -> Renderer {
        let config = DiffusionConfig {
            api_url: "http://localhost:1".to_string(),
            model_id: model_id.map(str::to_string),
        };
        Renderer::new(config, generated_dir, reqwest::Client::new())
    }

    #[tokio::test]
    async fn test_missing_model_id_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer(None, dir.path().to_path_buf());
        let err = renderer
            .generate(&RenderRequest::new("a fox"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.to_string(), "SD_MODEL_ID is not set or empty");
    }

    #[tokio::test]
    async fn test_empty_model_id_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer(Some(""), dir.path().to_path_buf());
        let err = renderer
            .generate(&RenderRequest::new("a fox"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_saved_filenames_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer(Some("sdxl"), dir.path().to_path_buf());

        let mut png = std::io::Cursor::new(Vec::new());
        image::DynamicImage::new_rgb8(4, 4)
            .write_to(&mut png, image::ImageFormat::Png)
            .unwrap();
        let png = png.into_inner();

        let mut seen = HashSet::new();
        for _ in 0..64 {
            let rendered = renderer.save_png(&png).unwrap();
            assert!(rendered.url.starts_with("/static/generated/"));
            assert!(rendered.path.exists());
            assert!(seen.insert(rendered.path), "filename collision");
        }
    }

    #[test]
    fn test_undecodable_bytes_are_a_vendor_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer(Some("sdxl"), dir.path().to_path_buf());
        let err = renderer.save_png(b"not a png").unwrap_err();
        assert!(matches!(err, AppError::Vendor(_)));
    }
}
