//! Request client for chat-completion models using an OpenAI-compatible API

use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{QaError, Result};

/// Default OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";

/// Configuration for the AI model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model_name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model_name: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ModelConfig {
    /// Create a new ModelConfig with custom settings
    pub fn new(base_url: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model_name: model_name.into(),
            ..Default::default()
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The credential, if one is set and non-blank
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}

/// A single system + user exchange with a chat model.
///
/// Implementations issue exactly one request per call and return the text of
/// the first choice, or [`QaError::EmptyResponse`] when it has none.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String>;
}

/// Backend talking to an OpenAI-compatible HTTP endpoint
pub struct OpenAiBackend {
    model_name: String,
    client: Client<OpenAIConfig>,
}

impl OpenAiBackend {
    /// Create a new backend; fails when the config carries no credential
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let api_key = config.credential().ok_or(QaError::MissingCredential)?;

        let openai_config = OpenAIConfig::new()
            .with_api_base(&config.base_url)
            .with_api_key(api_key);

        Ok(Self {
            model_name: config.model_name.clone(),
            client: Client::with_config(openai_config),
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .stream(false)
            .build()?;

        debug!(
            model = %self.model_name,
            message_len = user_message.len(),
            "Sending chat completion request"
        );
        let response = self.client.chat().create(request).await?;

        let Some(choice) = response.choices.into_iter().next() else {
            return Err(QaError::EmptyResponse { refusal: None });
        };

        match choice.message.content {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err(QaError::EmptyResponse {
                refusal: choice.message.refusal,
            }),
        }
    }
}

/// Client pairing a fixed system prompt with caller-supplied messages
///
/// The credential and system prompt are fixed at construction; a different
/// prompt needs a new client.
pub struct RequestClient {
    backend: Arc<dyn ChatBackend>,
    system_prompt: String,
}

impl RequestClient {
    /// Create a client backed by the OpenAI-compatible endpoint in `config`
    pub fn new(config: &ModelConfig, system_prompt: impl Into<String>) -> Result<Self> {
        let backend = OpenAiBackend::new(config)?;
        Ok(Self::with_backend(Arc::new(backend), system_prompt))
    }

    /// Create a client over an existing backend
    pub fn with_backend(backend: Arc<dyn ChatBackend>, system_prompt: impl Into<String>) -> Self {
        Self {
            backend,
            system_prompt: system_prompt.into(),
        }
    }

    /// The system prompt sent with every message
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Send a message and return the model's reply text
    pub async fn send(&self, user_message: &str) -> Result<String> {
        self.backend.complete(&self.system_prompt, user_message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_default() {
        let config = ModelConfig::default();
        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.model_name, "deepseek/deepseek-r1:free");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_model_config_builder() {
        let config = ModelConfig::new("http://custom:8080", "custom-model").with_api_key("test-key");

        assert_eq!(config.base_url, "http://custom:8080");
        assert_eq!(config.model_name, "custom-model");
        assert_eq!(config.credential(), Some("test-key"));
    }

    #[test]
    fn test_blank_api_key_is_not_a_credential() {
        let config = ModelConfig::default().with_api_key("   ");
        assert_eq!(config.credential(), None);
    }

    #[test]
    fn test_client_requires_credential() {
        let result = RequestClient::new(&ModelConfig::default(), "setup");
        assert!(matches!(result, Err(QaError::MissingCredential)));
    }
}
