//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::diffusion::Renderer;
use crate::llm::GeminiClient;
use crate::ocr::ReadClient;
use crate::vision::PredictionClient;

/// Shared application state: the configuration and one client per vendor,
/// all behind a single `Arc` so handlers clone cheaply.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    ocr: ReadClient,
    llm: GeminiClient,
    renderer: Renderer,
    vision: PredictionClient,
}

impl AppState {
    /// Build the state from configuration.
    ///
    /// One `reqwest::Client` is shared by every vendor client. Nothing
    /// touches the network here: vendor credentials are validated lazily,
    /// at the first call that needs them.
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();

        let ocr = ReadClient::new(config.ocr.clone(), http.clone());
        let llm = GeminiClient::new(config.llm.clone(), http.clone());
        let renderer = Renderer::new(config.diffusion.clone(), config.generated_dir(), http.clone());
        let vision = PredictionClient::new(config.vision.clone(), config.static_dir.clone(), http);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                ocr,
                llm,
                renderer,
                vision,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn ocr(&self) -> &ReadClient {
        &self.inner.ocr
    }

    pub fn llm(&self) -> &GeminiClient {
        &self.inner.llm
    }

    pub fn renderer(&self) -> &Renderer {
        &self.inner.renderer
    }

    pub fn vision(&self) -> &PredictionClient {
        &self.inner.vision
    }
}
