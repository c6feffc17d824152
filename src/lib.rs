//! # Triangulate
//!
//! A research assistant server. A question is fanned out concurrently to
//! several knowledge sources (Wikipedia, arXiv, NewsAPI), the results are
//! merged in a fixed source order, de-duplicated by URL and capped, and an LLM
//! writes an answer that cites the surviving documents as `[1]`, `[2]`, ...
//!
//! ## Overview
//!
//! Triangulate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `triangulate-server` binary
//! 2. **As a library** - Embed the [`ResearchOrchestrator`] in your own project
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use triangulate::{ResearchOrchestrator, TriangulateConfig};
//! use triangulate::types::SourceType;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TriangulateConfig::load_or_default("triangulate.toml")?;
//!     let orchestrator = ResearchOrchestrator::from_config(&config)?;
//!
//!     let response = orchestrator
//!         .research("How do transformers work?", &SourceType::ALL, 5)
//!         .await?;
//!     println!("{}", response.answer);
//!     Ok(())
//! }
//! ```
//!
//! ### Custom Sources
//!
//! ```rust,ignore
//! use triangulate::sources::{SourceAdapter, SourceRegistry};
//! use std::sync::Arc;
//!
//! let mut registry = SourceRegistry::new();
//! registry.register(Arc::new(MyWikipediaMirror::new()));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui/` |
//! | `full` | Everything above |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`cli`] - Command-line parsing and terminal output
//! - [`llm`] - LLM client implementations
//! - [`research`] - Admission, depth presets, orchestration and synthesis
//! - [`sources`] - Source adapters and their registry
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration and text helpers

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Research orchestration.
pub mod research;
/// Knowledge source adapters.
pub mod sources;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration and text utilities.
pub mod utils;

// Re-export commonly used types
pub use llm::{LLMClient, LLMResponse, Provider};
pub use research::ResearchOrchestrator;
pub use sources::{SourceAdapter, SourceRegistry};
pub use types::{AppError, Result};
pub use utils::toml_config::TriangulateConfig;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded TOML configuration
    pub config: Arc<TriangulateConfig>,
    /// Research orchestrator (owns the sources, LLM client and admission ceiling)
    pub orchestrator: Arc<ResearchOrchestrator>,
    /// When the server started, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: TriangulateConfig, orchestrator: ResearchOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            started_at: Instant::now(),
        }
    }

    /// Build the full application state from configuration
    pub fn from_config(config: TriangulateConfig) -> Result<Self> {
        let orchestrator = ResearchOrchestrator::from_config(&config)?;
        Ok(Self::new(config, orchestrator))
    }
}

/// The complete HTTP application: routes, middleware and optional API docs
pub fn build_app(state: AppState) -> Router {
    let app = Router::new()
        .route("/", get(api::handlers::health::root))
        .nest("/api/v1", api::routes::create_router());

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    app.layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
