use crate::{
    AppState,
    types::{AppError, ResearchRequest, ResearchResponse},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Research a question across the enabled sources and return a cited answer
#[utoipa::path(
    post,
    path = "/api/v1/research",
    request_body = ResearchRequest,
    responses(
        (status = 200, description = "Research completed", body = ResearchResponse),
        (status = 400, description = "Invalid input"),
        (status = 413, description = "Request body too large"),
        (status = 429, description = "Too many requests in flight, retry later"),
        (status = 500, description = "Internal error")
    ),
    tag = "research"
)]
pub async fn research(
    State(state): State<AppState>,
    payload: Result<Json<ResearchRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return rejection.into_response();
        }
        // Unknown source names and malformed bodies are caller errors
        Err(rejection) => return AppError::InvalidInput(rejection.body_text()).into_response(),
    };

    match state.orchestrator.research_request(&payload).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response(),
    }
}
