use crate::llm_config::LlmConfig;
use crate::openai::error::OpenAiError;
use async_openai::Client;
use async_openai::types::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessage, ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs,
};
use backoff::ExponentialBackoffBuilder;
use std::error::Error;
use std::time::Duration;
use tracing::instrument;
use typed_builder::TypedBuilder;

pub mod error;

#[derive(TypedBuilder, Debug, Clone)]
pub struct CallConfig {
    total_timeout: Duration,
    #[builder(default = Duration::from_millis(100))]
    min_retry_interval: Duration,
    #[builder(default = Duration::from_secs(2))]
    max_retry_interval: Duration,
    #[builder(default = None)]
    max_tokens: Option<u32>,
}

#[must_use]
pub fn system_message<S: Into<String>>(content: S) -> ChatCompletionRequestMessage {
    ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
        content: ChatCompletionRequestSystemMessageContent::Text(content.into()),
        name: None,
    })
}

#[must_use]
pub fn user_message<S: Into<String>>(content: S) -> ChatCompletionRequestMessage {
    ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
        content: ChatCompletionRequestUserMessageContent::Text(content.into()),
        name: None,
    })
}

#[must_use]
pub fn assistant_message<S: Into<String>>(content: S) -> ChatCompletionRequestMessage {
    ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
        content: Some(ChatCompletionRequestAssistantMessageContent::Text(content.into())),
        refusal: None,
        audio: None,
        tool_calls: None,
        #[allow(deprecated)]
        function_call: None,
        name: None,
    })
}

/// Single-shot completion: sends the messages once (with transport-level
/// backoff bounded by the total timeout) and returns the raw text of the
/// first choice. The model's output is NOT trusted here; callers parse and
/// validate it themselves.
#[instrument(skip_all, fields(model = llm_config.model()))]
pub async fn complete(
    llm_config: &LlmConfig,
    config: CallConfig,
    messages: Vec<ChatCompletionRequestMessage>,
) -> Result<String, OpenAiError> {
    let request = CreateChatCompletionRequestArgs::default()
        .model(llm_config.model())
        .messages(messages)
        .temperature(llm_config.temperature())
        .max_tokens(config.max_tokens.unwrap_or_else(|| llm_config.max_tokens()))
        .build()?;

    let http_client = reqwest::Client::builder()
        .timeout(config.total_timeout)
        .build()
        .map_err(|error| {
            tracing::error!(error = &error as &dyn Error, "failed to build http client for llm");
            OpenAiError::HttpClientBuild(error)
        })?;

    let mut backoff_builder = ExponentialBackoffBuilder::default();
    backoff_builder
        .with_initial_interval(config.min_retry_interval)
        .with_max_interval(config.max_retry_interval)
        .with_max_elapsed_time(Some(config.total_timeout));
    let backoff = backoff_builder.build();

    let client = Client::with_config(llm_config.openai_config())
        .with_http_client(http_client)
        .with_backoff(backoff);

    tracing::debug!("sending completion request");
    let chat_completion = client.chat().create(request).await.map_err(|error| {
        tracing::warn!(error = &error as &dyn Error, "llm call failed");
        OpenAiError::Api(error)
    })?;

    let first = chat_completion
        .choices
        .into_iter()
        .next()
        .ok_or(OpenAiError::EmptyResponse)?;
    first.message.content.ok_or(OpenAiError::EmptyResponse)
}

/// Model catalogue of the endpoint, for the model-info route.
#[instrument(skip_all)]
pub async fn list_models(llm_config: &LlmConfig) -> Result<Vec<String>, OpenAiError> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(OpenAiError::HttpClientBuild)?;

    let client = Client::with_config(llm_config.openai_config()).with_http_client(http_client);

    let models = client.models().list().await.map_err(OpenAiError::Api)?;
    Ok(models.data.into_iter().map(|m| m.id).collect())
}

/// Cheap liveness probe: a tiny completion with a short deadline.
#[instrument(skip_all)]
pub async fn ping(llm_config: &LlmConfig) -> Result<(), OpenAiError> {
    let config = CallConfig::builder()
        .total_timeout(Duration::from_secs(10))
        .max_tokens(Some(5))
        .build();
    complete(llm_config, config, vec![user_message("Test")]).await.map(|_| ())
}
