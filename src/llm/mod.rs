//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for the generative text model the
//! answer synthesizer depends on. Provider-specific implementations sit behind
//! the [`LLMClient`] trait, so the rest of the application (and its tests) can
//! work with any supported model or a mock.
//!
//! # Supported Providers
//!
//! - OpenAI-compatible chat completions (always available)
//! - `ollama` - Local Ollama server (cargo feature)
//!
//! # Example
//!
//! ```ignore
//! use triangulate::llm::{GenerationParams, Provider};
//!
//! let provider = Provider::from_config(&config)?;
//! let client = provider.create_client(GenerationParams::from_config(&config))?;
//!
//! let response = client.generate("What is 2+2?").await?;
//! println!("{} ({} tokens)", response.content, response.tokens_used);
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// OpenAI-compatible chat-completions client.
pub mod openai;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use client::{GenerationParams, LLMClient, LLMResponse, Provider};
