//! HTTP API Handlers and Routes
//!
//! The REST layer over the research orchestrator, built on Axum.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions
//!
//! # API Endpoints
//!
//! - `GET /` - Service banner
//! - `GET /api/v1/health` - Health, uptime and in-flight request count
//! - `GET /api/v1/sources` - Source availability
//! - `POST /api/v1/research` - Research a question
//!
//! # Errors
//!
//! Failures are returned as `{"error": "..."}` with status 400 for invalid
//! input, 429 (plus `Retry-After`) when the admission ceiling is reached and
//! 500 otherwise.
//!
//! # OpenAPI Documentation
//!
//! When the `swagger-ui` feature is enabled, interactive API documentation
//! is available at `/swagger-ui/`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

use crate::types::{Document, HealthResponse, ResearchDepth, ResearchRequest, ResearchResponse, SourceStatus, SourceType};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::health::list_sources,
        handlers::research::research,
    ),
    components(schemas(
        Document,
        HealthResponse,
        ResearchDepth,
        ResearchRequest,
        ResearchResponse,
        SourceStatus,
        SourceType,
    )),
    tags(
        (name = "research", description = "Multi-source research"),
        (name = "health", description = "Service status"),
    ),
    info(title = "Triangulate API", description = "Multi-source research with cited answers")
)]
pub struct ApiDoc;
