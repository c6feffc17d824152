use crate::{
    AppState,
    types::{HealthResponse, SourceStatus},
};
use axum::{Json, extract::State};
use serde_json::{Value, json};

/// Service liveness, uptime, in-flight load and credential status
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        in_flight: state.orchestrator.in_flight(),
        api_keys: state.config.api_key_status(),
    })
}

/// Every known source type and whether it is enabled and configured
#[utoipa::path(
    get,
    path = "/api/v1/sources",
    responses(
        (status = 200, description = "Source availability", body = [SourceStatus])
    ),
    tag = "health"
)]
pub async fn list_sources(State(state): State<AppState>) -> Json<Vec<SourceStatus>> {
    Json(state.orchestrator.registry().statuses())
}

/// Service banner with the registered source types
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "Triangulate",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Multi-source research with cited answers",
        "health": "/api/v1/health",
        "research": "/api/v1/research",
        "docs": "/swagger-ui/",
        "sources": state.orchestrator.registry().source_types(),
    }))
}
