use clap::Args;
use url::Url;

/// Connection settings for the OpenAI-compatible inference endpoint.
#[derive(Debug, Clone, Args)]
pub struct LlmArgs {
    #[arg(long, env = "LLM_BASE_URL", default_value = "http://127.0.0.1:11434/v1")]
    pub llm_base_url: Url,

    #[arg(long, env = "LLM_MODEL", default_value = "gemma2:2b")]
    pub llm_model: String,

    #[arg(long, env = "LLM_TIMEOUT_SECONDS", default_value_t = 180)]
    pub llm_timeout_seconds: u64,

    #[arg(long, env = "LLM_TEMPERATURE", default_value_t = 0.7)]
    pub llm_temperature: f32,

    #[arg(long, env = "LLM_MAX_TOKENS", default_value_t = 2000)]
    pub llm_max_tokens: u32,

    #[arg(long, value_delimiter = ',', default_values_t = default_models())]
    pub llm_available_models: Vec<String>,
}

fn default_models() -> Vec<String> {
    [
        "llama3.1:8b",
        "llama3.2:3b",
        "gemma2:2b",
        "llama3.2:1b",
        "mistral:7b",
        "codellama:7b",
        "qwen2:7b",
        "phi3:mini",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}
