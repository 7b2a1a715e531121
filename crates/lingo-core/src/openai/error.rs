use async_openai::error::OpenAIError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("empty response from model")]
    EmptyResponse,

    #[error("api error: {0}")]
    Api(#[from] OpenAIError),

    #[error("failed to build http client: {0}")]
    HttpClientBuild(#[from] reqwest::Error),
}
