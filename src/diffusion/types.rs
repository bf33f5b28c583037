//! Render parameters and sidecar wire types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Fixed negative prompt sent with every render, discouraging anatomical
/// artifacts and photographic realism.
pub const NEGATIVE_PROMPT: &str = "deformed face, distorted face, asymmetrical face, extra eyes, \
    extra limbs, extra fingers, long neck, disfigured, mutated, low quality, blurry, distorted, \
    text, cropped, ugly, disfigured, poor anatomy, missing limbs, malformed hands, \
    poorly drawn eyes, unsettling, monochrome, grayscale, realistic, photography, photo";

const DEFAULT_STEPS: u32 = 30;
const DEFAULT_GUIDANCE_SCALE: f64 = 10.0;
const DEFAULT_SIZE: u32 = 1024;

/// Caller-facing sampling parameters for one render.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub prompt: String,
    pub steps: u32,
    pub guidance_scale: f64,
    pub width: u32,
    pub height: u32,
    /// When set, sampling is deterministic for this seed (the sidecar scopes
    /// its generator to the compute device). When unset, sampling is random.
    pub seed: Option<u64>,
}

impl RenderRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            steps: DEFAULT_STEPS,
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            seed: None,
        }
    }
}

/// A rendered illustration, referenced two ways: the URL the frontend loads
/// it from, and the filesystem path backend components read it from.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub url: String,
    pub path: PathBuf,
}

// --- sidecar wire types ---

#[derive(Debug, Serialize)]
pub struct LoadModelRequest<'a> {
    pub model_id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoadModelResponse {
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub dtype: String,
}

#[derive(Debug, Serialize)]
pub struct PipelineOptionsRequest {
    pub attention_slicing: bool,
    pub vae_tiling: bool,
}

#[derive(Debug, Serialize)]
pub struct Txt2ImgRequest<'a> {
    pub prompt: &'a str,
    pub negative_prompt: &'a str,
    pub steps: u32,
    pub guidance_scale: f64,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl<'a> Txt2ImgRequest<'a> {
    pub fn from_render(request: &'a RenderRequest) -> Self {
        Self {
            prompt: &request.prompt,
            negative_prompt: NEGATIVE_PROMPT,
            steps: request.steps,
            guidance_scale: request.guidance_scale,
            width: request.width,
            height: request.height,
            seed: request.seed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Txt2ImgResponse {
    /// Base64-encoded PNG.
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt2img_always_carries_negative_prompt() {
        let request = RenderRequest::new("a fox in a forest");
        let payload = serde_json::to_value(Txt2ImgRequest::from_render(&request)).unwrap();
        assert_eq!(payload["negative_prompt"], NEGATIVE_PROMPT);
        assert_eq!(payload["prompt"], "a fox in a forest");
        assert_eq!(payload["steps"], 30);
        assert_eq!(payload["width"], 1024);
        assert_eq!(payload["height"], 1024);
        // No seed supplied: the field is omitted, not null.
        assert!(payload.get("seed").is_none());
    }

    #[test]
    fn test_seed_passes_through_unchanged() {
        let mut request = RenderRequest::new("a fox");
        request.seed = Some(424242);
        let payload = serde_json::to_value(Txt2ImgRequest::from_render(&request)).unwrap();
        assert_eq!(payload["seed"], 424242);
    }
}
