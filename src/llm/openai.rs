//! OpenAI-compatible chat-completions client built on `async-openai`.
//!
//! Works with OpenAI, OpenRouter, vLLM, LM Studio and any other endpoint that
//! exposes `POST {api_base}/chat/completions`.

use crate::llm::client::{GenerationParams, LLMClient, LLMResponse};
use crate::types::{AppError, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use tracing::{debug, warn};

pub struct OpenAIClient {
    client: Client<OpenAIConfig>,
    has_api_key: bool,
    model: String,
    params: GenerationParams,
}

impl OpenAIClient {
    pub fn new(
        api_key: Option<String>,
        api_base: String,
        model: String,
        params: GenerationParams,
    ) -> Self {
        let has_api_key = api_key.is_some();
        let config = OpenAIConfig::new()
            .with_api_key(api_key.unwrap_or_default())
            .with_api_base(api_base.trim_end_matches('/'));

        Self {
            client: Client::with_config(config),
            has_api_key,
            model,
            params,
        }
    }

    #[allow(deprecated)]
    fn build_request(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<CreateChatCompletionRequest> {
        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_tokens(self.params.max_tokens)
            .temperature(self.params.temperature)
            .build()
            .map_err(|e| AppError::LLM(format!("Failed to build request: {}", e)))
    }

    async fn complete(&self, messages: Vec<ChatCompletionRequestMessage>) -> Result<LLMResponse> {
        if !self.has_api_key {
            return Err(AppError::LLM(
                "OpenAI API key is not configured".to_string(),
            ));
        }

        let request = self.build_request(messages)?;
        debug!(model = %self.model, "Sending chat completion request");

        // The timeout also bounds the client's own retries on rate limits and 5xx
        let response = tokio::time::timeout(self.params.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| {
                AppError::LLM(format!(
                    "OpenAI request timed out after {:?}",
                    self.params.timeout
                ))
            })?
            .map_err(|e| {
                warn!(error = %e, "Provider returned error");
                AppError::LLM(format!("OpenAI API error: {}", e))
            })?;

        let tokens_used = response
            .usage
            .as_ref()
            .map(|usage| u64::from(usage.total_tokens))
            .unwrap_or(0);

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))?;

        let finish_reason = choice
            .finish_reason
            .and_then(|reason| serde_json::to_value(reason).ok())
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string());

        let content = choice
            .message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AppError::LLM("OpenAI returned an empty completion".to_string()))?;

        Ok(LLMResponse {
            content,
            tokens_used,
            finish_reason,
        })
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate(&self, prompt: &str) -> Result<LLMResponse> {
        self.complete(vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(prompt.to_string()),
        )])
        .await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<LLMResponse> {
        self.complete(vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage::from(
                system.to_string(),
            )),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(
                prompt.to_string(),
            )),
        ])
        .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
