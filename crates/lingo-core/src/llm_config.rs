use async_openai::config::OpenAIConfig;
use lingo_model::status::ModelInfo;
use lingo_utils::args::llm::LlmArgs;
use std::time::Duration;
use url::Url;

/// Immutable connection settings for the OpenAI-compatible inference
/// endpoint (a local Ollama in the default deployment).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    base_url: Url,
    model: String,
    timeout: Duration,
    temperature: f32,
    max_tokens: u32,
    available_models: Vec<String>,
}

impl From<LlmArgs> for LlmConfig {
    fn from(args: LlmArgs) -> Self {
        Self {
            base_url: args.llm_base_url,
            model: args.llm_model,
            timeout: Duration::from_secs(args.llm_timeout_seconds),
            temperature: args.llm_temperature,
            max_tokens: args.llm_max_tokens,
            available_models: args.llm_available_models,
        }
    }
}

impl LlmConfig {
    #[must_use]
    pub fn new(base_url: Url, model: String, timeout: Duration, temperature: f32, max_tokens: u32) -> Self {
        Self {
            base_url,
            model,
            timeout,
            temperature,
            max_tokens,
            available_models: Vec::new(),
        }
    }

    #[must_use]
    pub fn openai_config(&self) -> OpenAIConfig {
        OpenAIConfig::default().with_api_base(self.base_url.as_str().trim_end_matches('/'))
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Model-info projection; `live_models` replaces the static catalogue
    /// when the endpoint answered a model listing.
    #[must_use]
    pub fn model_info(&self, live_models: Option<Vec<String>>) -> ModelInfo {
        ModelInfo {
            current_model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: self.timeout.as_secs(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            available_models: live_models.unwrap_or_else(|| self.available_models.clone()),
        }
    }
}
