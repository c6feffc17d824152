//! LLM Client abstractions and provider management
//!
//! This module provides a unified interface for the generative text providers
//! the answer synthesizer talks to:
//! - **OpenAI**: any OpenAI-compatible `/chat/completions` endpoint
//! - **Ollama**: local inference (requires the `ollama` feature)

use crate::types::{AppError, Result};
use crate::utils::toml_config::TriangulateConfig;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing for easy swapping
/// between providers without changing application code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<LLMResponse>;

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<LLMResponse>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Response from an LLM generation request
#[derive(Debug, Clone, PartialEq)]
pub struct LLMResponse {
    /// The text content of the response
    pub content: String,
    /// Total tokens billed for the request (prompt + completion), 0 when unreported
    pub tokens_used: u64,
    /// The reason generation stopped (e.g., "stop", "length")
    pub finish_reason: String,
}

/// Sampling and transport parameters shared by every provider
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 1500,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including Azure OpenAI and compatible APIs)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: Some("sk-...".to_string()),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-4o-mini".to_string(),
    /// };
    /// ```
    OpenAI {
        /// `None` when the key env var is unset; calls then fail fast
        api_key: Option<String>,
        api_base: String,
        model: String,
    },

    /// Ollama local LLM provider
    Ollama { base_url: String, model: String },
}

impl Provider {
    /// Build the provider described by the `[llm]` configuration section
    pub fn from_config(config: &TriangulateConfig) -> Result<Self> {
        let llm = &config.llm;
        match llm.provider.as_str() {
            "openai" => Ok(Provider::OpenAI {
                api_key: config.llm_api_key(),
                api_base: llm.base_url.clone(),
                model: llm.model.clone(),
            }),
            "ollama" => Ok(Provider::Ollama {
                base_url: llm.base_url.clone(),
                model: llm.model.clone(),
            }),
            other => Err(AppError::Config(format!(
                "Unknown LLM provider '{}'",
                other
            ))),
        }
    }

    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's feature is not compiled in or its
    /// base URL cannot be parsed.
    pub fn create_client(&self, params: GenerationParams) -> Result<Arc<dyn LLMClient>> {
        match self {
            Provider::OpenAI {
                api_key,
                api_base,
                model,
            } => Ok(Arc::new(super::openai::OpenAIClient::new(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                params,
            ))),

            #[cfg(feature = "ollama")]
            Provider::Ollama { base_url, model } => Ok(Arc::new(
                super::ollama::OllamaClient::new(base_url, model.clone(), params)?,
            )),

            #[cfg(not(feature = "ollama"))]
            Provider::Ollama { model, .. } => Err(AppError::Config(format!(
                "Ollama provider requested (model '{}') but the 'ollama' feature is not enabled",
                model
            ))),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    /// Whether the provider has what it needs to make calls
    pub fn is_configured(&self) -> bool {
        match self {
            Provider::OpenAI { api_key, .. } => api_key.is_some(),
            Provider::Ollama { .. } => true,
        }
    }
}

impl GenerationParams {
    /// Read generation parameters from the `[llm]` configuration section
    pub fn from_config(config: &TriangulateConfig) -> Self {
        Self {
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
            timeout: Duration::from_secs(config.llm.timeout_secs),
        }
    }
}
