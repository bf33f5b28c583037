//! Configuration
//!
//! All settings come from environment variables (plus `.env` via dotenvy).
//! Vendor credentials are optional at startup: a missing key only becomes an
//! error when the component that needs it is first used, so a deployment
//! without, say, object detection configured can still serve chat.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_STATIC_DIR: &str = "app/static";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_SD_API_URL: &str = "http://localhost:7860";
const DEFAULT_OCR_POLL_TIMEOUT: Duration = Duration::from_secs(60);

/// Complete application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Root of the statically served directory; generated images live in
    /// its `generated/` subdirectory.
    pub static_dir: PathBuf,
    pub ocr: OcrConfig,
    pub llm: LlmConfig,
    pub diffusion: DiffusionConfig,
    pub vision: VisionConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Azure Computer Vision Read API settings.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub endpoint: Option<String>,
    pub key: Option<String>,
    /// Overall deadline for the submit-then-poll Read operation.
    pub poll_timeout: Duration,
}

/// Gemini settings. The API base is overridable so tests can point the
/// client at a local mock.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
}

/// Diffusers sidecar settings.
#[derive(Debug, Clone)]
pub struct DiffusionConfig {
    pub api_url: String,
    pub model_id: Option<String>,
}

/// Azure Custom Vision prediction settings.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub prediction_url: Option<String>,
    pub prediction_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig { port: DEFAULT_PORT },
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            ocr: OcrConfig {
                endpoint: None,
                key: None,
                poll_timeout: DEFAULT_OCR_POLL_TIMEOUT,
            },
            llm: LlmConfig {
                api_base: DEFAULT_GEMINI_API_BASE.to_string(),
                api_key: None,
                model: DEFAULT_GEMINI_MODEL.to_string(),
            },
            diffusion: DiffusionConfig {
                api_url: DEFAULT_SD_API_URL.to_string(),
                model_id: None,
            },
            vision: VisionConfig {
                prediction_url: None,
                prediction_key: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Only malformed values (unparseable port or timeout) are errors here;
    /// missing vendor credentials stay `None` and fail lazily at first use.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(port) = env_opt("PORT") {
            config.server.port = port.parse().context("PORT must be a valid port number")?;
        }
        if let Some(dir) = env_opt("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        config.ocr.endpoint = env_opt("AZURE_CV_ENDPOINT");
        config.ocr.key = env_opt("AZURE_CV_KEY");
        if let Some(secs) = env_opt("OCR_POLL_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .context("OCR_POLL_TIMEOUT_SECS must be a number of seconds")?;
            config.ocr.poll_timeout = Duration::from_secs(secs);
        }

        config.llm.api_key = env_opt("GEMINI_API_KEY");
        if let Some(model) = env_opt("GEMINI_MODEL") {
            config.llm.model = model;
        }
        if let Some(base) = env_opt("GEMINI_API_BASE") {
            config.llm.api_base = base;
        }

        if let Some(url) = env_opt("SD_API_URL") {
            config.diffusion.api_url = url;
        }
        config.diffusion.model_id = env_opt("SD_MODEL_ID");

        config.vision.prediction_url = env_opt("AZURE_CV_PREDICTION_URL");
        config.vision.prediction_key = env_opt("AZURE_CV_PREDICTION_KEY");

        Ok(config)
    }

    /// Directory generated images are written to.
    pub fn generated_dir(&self) -> PathBuf {
        self.static_dir.join("generated")
    }
}

/// Read an environment variable, treating empty/whitespace values as unset.
fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.static_dir, PathBuf::from("app/static"));
        assert_eq!(config.generated_dir(), PathBuf::from("app/static/generated"));
        assert_eq!(config.llm.model, "gemini-2.0-flash");
        assert!(config.ocr.endpoint.is_none());
        assert!(config.diffusion.model_id.is_none());
    }

    #[test]
    fn test_env_opt_filters_empty() {
        // Use a name no other test touches.
        env::set_var("STORYBOOK_TEST_EMPTY_VAR", "   ");
        assert_eq!(env_opt("STORYBOOK_TEST_EMPTY_VAR"), None);
        env::set_var("STORYBOOK_TEST_EMPTY_VAR", " value ");
        assert_eq!(
            env_opt("STORYBOOK_TEST_EMPTY_VAR"),
            Some("value".to_string())
        );
        env::remove_var("STORYBOOK_TEST_EMPTY_VAR");
    }
}
