use crate::llm::client::{GenerationParams, LLMClient, LLMResponse};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use ollama_rs::{
    Ollama,
    generation::chat::{ChatMessage, request::ChatMessageRequest},
    models::ModelOptions,
};

pub struct OllamaClient {
    client: Ollama,
    model: String,
    params: GenerationParams,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: String, params: GenerationParams) -> Result<Self> {
        let (scheme, rest) = base_url
            .split_once("://")
            .unwrap_or(("http", base_url));
        let rest = rest.trim_end_matches('/');

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| {
                    AppError::Config(format!("Invalid Ollama port in '{}'", base_url))
                })?;
                (host.to_string(), port)
            }
            None => (rest.to_string(), 11434),
        };

        let client = Ollama::new(format!("{}://{}", scheme, host), port);

        Ok(Self {
            client,
            model,
            params,
        })
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<LLMResponse> {
        let request = ChatMessageRequest::new(self.model.clone(), messages)
            .options(model_options(&self.params));

        let response = tokio::time::timeout(
            self.params.timeout,
            self.client.send_chat_messages(request),
        )
        .await
        .map_err(|_| AppError::LLM("Ollama request timed out".to_string()))?
        .map_err(|e| AppError::LLM(format!("Ollama error: {}", e)))?;

        let content = response.message.content;
        if content.trim().is_empty() {
            return Err(AppError::LLM("Ollama returned an empty completion".to_string()));
        }

        let tokens_used = response
            .final_data
            .map(|data| data.prompt_eval_count + data.eval_count)
            .unwrap_or(0);

        Ok(LLMResponse {
            content,
            tokens_used,
            finish_reason: "stop".to_string(),
        })
    }
}

/// Sampling options sent with every chat request
fn model_options(params: &GenerationParams) -> ModelOptions {
    ModelOptions::default()
        .temperature(params.temperature)
        .num_predict(i32::try_from(params.max_tokens).unwrap_or(i32::MAX))
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<LLMResponse> {
        self.chat(vec![ChatMessage::user(prompt.to_string())]).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<LLMResponse> {
        self.chat(vec![
            ChatMessage::system(system.to_string()),
            ChatMessage::user(prompt.to_string()),
        ])
        .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
