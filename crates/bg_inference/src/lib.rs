use std::env;

use bg_core::{Error, Result};
use url::Url;

pub mod models;

pub const DEFAULT_ENDPOINT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL_NAME: &str = "openai/gpt-4o-mini";
pub const DEFAULT_APP_TITLE: &str = "AI Blog Generator";

/// Which text generation backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Any OpenAI-compatible chat completion endpoint (OpenRouter, OpenAI, ...).
    OpenAi,
    Dummy,
}

impl std::str::FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" | "openrouter" | "chat" => Ok(Backend::OpenAi),
            "dummy" => Ok(Backend::Dummy),
            other => Err(Error::Config(format!(
                "Unknown model backend '{}'. Available backends: openai, dummy",
                other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct InferenceConfig {
    pub backend: Backend,
    pub endpoint_url: Url,
    pub model_name: String,
    pub api_key: Option<String>,
    pub referer: Option<String>,
    pub app_title: String,
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("backend", &self.backend)
            .field("endpoint_url", &self.endpoint_url.as_str())
            .field("model_name", &self.model_name)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("referer", &self.referer)
            .field("app_title", &self.app_title)
            .finish()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            backend: Backend::OpenAi,
            endpoint_url: Url::parse(DEFAULT_ENDPOINT_URL)
                .expect("default endpoint is a valid URL"),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            api_key: None,
            referer: None,
            app_title: DEFAULT_APP_TITLE.to_string(),
        }
    }
}

impl InferenceConfig {
    /// Reads `LLM_ENDPOINT_URL`, `LLM_MODEL`, `LLM_API_KEY`, `LLM_REFERER` and
    /// `LLM_APP_TITLE`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url) = env::var("LLM_ENDPOINT_URL") {
            config = config.with_endpoint(&url)?;
        }
        if let Ok(model) = env::var("LLM_MODEL") {
            config.model_name = model;
        }
        config.api_key = env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty());
        config.referer = env::var("LLM_REFERER").ok();
        if let Ok(title) = env::var("LLM_APP_TITLE") {
            config.app_title = title;
        }
        Ok(config)
    }

    pub fn with_endpoint(mut self, url: &str) -> Result<Self> {
        self.endpoint_url = Url::parse(url)
            .map_err(|e| Error::Config(format!("Invalid LLM endpoint URL '{}': {}", url, e)))?;
        Ok(self)
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
}

pub mod prelude {
    pub use super::models::create_model;
    pub use super::{Backend, InferenceConfig};
    pub use bg_core::{Error, Prompt, Result, TextGenerator};
}

pub use models::create_model;
