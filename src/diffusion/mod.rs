//! Diffusion Module
//!
//! Renders illustrations through a diffusers sidecar service, a small HTTP
//! wrapper around a pretrained SDXL pipeline. Sidecar contract:
//!
//! - `POST /v1/load` `{"model_id"}` — load weights; replies with the chosen
//!   `{"device", "dtype"}`.
//! - `POST /v1/options` `{"attention_slicing", "vae_tiling"}` — best-effort
//!   memory savers; the render works without them.
//! - `POST /v1/txt2img` — sampling parameters in, base64 PNG out.
//!
//! The pipeline is loaded once per process, on first use, and a mutex is
//! held across sampling: the sidecar hosts a single in-memory model, so
//! concurrent requests must serialize.

mod renderer;
mod types;

pub use renderer::Renderer;
pub use types::{RenderRequest, RenderedImage, NEGATIVE_PROMPT};
