//! Remote text service abstraction and its `llm`-backed implementation.

use super::error::AiError;
use crate::config::{AiBackend, AiConfig};
use futures::FutureExt;
use futures::future::BoxFuture;
use llm::LLMProvider;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;

/// One prompt for the remote service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRequest {
    /// Optional system instruction.
    pub system: Option<String>,
    pub prompt: String,
}

/// An opaque text-completion backend.
pub trait TextService: Send + Sync {
    /// Send one prompt and return the raw reply text.
    fn generate(&self, request: TextRequest) -> BoxFuture<'_, Result<String, AiError>>;
}

impl From<AiBackend> for LLMBackend {
    fn from(backend: AiBackend) -> Self {
        match backend {
            AiBackend::Google => LLMBackend::Google,
            AiBackend::OpenAi => LLMBackend::OpenAI,
            AiBackend::Anthropic => LLMBackend::Anthropic,
            AiBackend::Ollama => LLMBackend::Ollama,
        }
    }
}

/// Text service backed by the `llm` crate.
pub struct LlmTextService {
    config: AiConfig,
    api_key: Option<String>,
}

impl LlmTextService {
    /// Create a service from configuration, reading the API key from the
    /// configured environment variable.
    pub fn new(config: AiConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        if config.enabled && api_key.is_none() && config.backend.requires_api_key() {
            tracing::warn!(
                env = %config.api_key_env,
                "no API key set, AI explanations will be unavailable"
            );
        }

        Self { config, api_key }
    }

    fn provider(&self, system: Option<&str>) -> Result<Box<dyn LLMProvider>, AiError> {
        if !self.config.enabled {
            return Err(AiError::Disabled);
        }

        let mut builder = LLMBuilder::new()
            .backend(self.config.backend.into())
            .model(self.config.model.clone());

        match &self.api_key {
            Some(key) => builder = builder.api_key(key.clone()),
            None if self.config.backend.requires_api_key() => {
                return Err(AiError::MissingApiKey(self.config.api_key_env.clone()));
            }
            None => {}
        }
        if let Some(url) = &self.config.base_url {
            builder = builder.base_url(url.clone());
        }
        if let Some(temperature) = self.config.temperature {
            builder = builder.temperature(temperature);
        }
        if let Some(max_tokens) = self.config.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        if let Some(system) = system {
            builder = builder.system(system.to_string());
        }

        builder.build().map_err(|e| AiError::Setup(e.to_string()))
    }
}

impl TextService for LlmTextService {
    fn generate(&self, request: TextRequest) -> BoxFuture<'_, Result<String, AiError>> {
        async move {
            let provider = self.provider(request.system.as_deref())?;
            let messages = vec![ChatMessage::user().content(request.prompt).build()];

            tracing::debug!(model = %self.config.model, "sending AI request");
            let response = provider
                .chat(&messages)
                .await
                .map_err(|e| AiError::Request(e.to_string()))?;

            response
                .text()
                .filter(|text| !text.trim().is_empty())
                .ok_or(AiError::EmptyResponse)
        }
        .boxed()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn config(enabled: bool, backend: AiBackend) -> AiConfig {
        AiConfig {
            enabled,
            backend,
            api_key_env: "SUMWISE_TEST_UNSET_KEY".to_string(),
            ..AiConfig::default()
        }
    }

    #[tokio::test]
    async fn test_disabled_service_fails_fast() {
        let service = LlmTextService::new(config(false, AiBackend::Google));
        let result = service
            .generate(TextRequest {
                system: None,
                prompt: "hi".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AiError::Disabled)));
    }

    #[tokio::test]
    async fn test_missing_key_is_reported() {
        let service = LlmTextService::new(config(true, AiBackend::Google));
        let result = service
            .generate(TextRequest {
                system: None,
                prompt: "hi".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AiError::MissingApiKey(env)) if env == "SUMWISE_TEST_UNSET_KEY"));
    }
}
