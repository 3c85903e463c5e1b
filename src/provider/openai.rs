//! OpenAI-compatible chat completion backend (Groq, OpenAI, local proxies).

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout as tokio_timeout;
use tracing::debug;

use super::Backend;
use crate::config::OpenAiConfig;
use crate::error::ProviderError;

pub struct OpenAiBackend {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl OpenAiBackend {
    pub fn new(base_url: &str, api_key: &str, model: &str, temperature: f32, timeout: Duration) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(base_url)
            .with_api_key(api_key);

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
            temperature,
            timeout,
        }
    }

    /// Build from config, reading the API key from the configured environment variable
    pub fn from_config(config: &OpenAiConfig, timeout: Duration) -> Result<Self, ProviderError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey(config.api_key_env.clone()))?;

        Ok(Self::new(
            &config.base_url,
            &api_key,
            &config.model,
            config.temperature,
            timeout,
        ))
    }
}

#[async_trait]
impl Backend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.to_string())
            .build()
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .messages(vec![ChatCompletionRequestMessage::User(message)])
            .build()
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        let response = tokio_timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))?
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        if let Some(usage) = &response.usage {
            debug!(
                "{} usage: {} prompt + {} completion tokens",
                self.model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        message_content(response)
    }
}

/// Text of the first choice; a completion without one is a failed call
fn message_content(response: CreateChatCompletionResponse) -> Result<String, ProviderError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ProviderError::Api("completion contained no message content".to_string()))
}
