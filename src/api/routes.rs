use crate::AppState;
use crate::api::handlers::{health, research};
use axum::{
    Router,
    routing::{get, post},
};

/// Routes mounted under `/api/v1`
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/sources", get(health::list_sources))
        .route("/research", post(research::research))
}
