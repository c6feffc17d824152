use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use utoipa::ToSchema;

// ============= Source Types =============

/// The external knowledge sources a research request can fan out to.
///
/// This enum is the single allowlist of source types: anything that does not
/// deserialize into one of these variants is rejected at the API boundary.
/// Variant order is the fixed issue order used when merging results.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Encyclopedia lookup (Wikipedia)
    #[serde(alias = "encyclopedia")]
    Wikipedia,
    /// Academic-paper index (arXiv)
    #[serde(alias = "paper-index")]
    Arxiv,
    /// News search (NewsAPI)
    News,
}

impl SourceType {
    /// Every source type, in issue order.
    pub const ALL: [SourceType; 3] = [SourceType::Wikipedia, SourceType::Arxiv, SourceType::News];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Wikipedia => "wikipedia",
            SourceType::Arxiv => "arxiv",
            SourceType::News => "news",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wikipedia" | "encyclopedia" => Ok(SourceType::Wikipedia),
            "arxiv" | "paper-index" => Ok(SourceType::Arxiv),
            "news" => Ok(SourceType::News),
            other => Err(AppError::InvalidInput(format!(
                "Unknown source '{}'. Available sources: wikipedia, arxiv, news",
                other
            ))),
        }
    }
}

// ============= Document Types =============

/// A normalized candidate source returned by a source adapter.
///
/// `url` is the canonical identifier: two documents with the same `url` are
/// duplicates regardless of which source produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Document {
    pub title: String,
    pub content: String,
    pub url: String,
    pub source_type: SourceType,
    /// Free-form, per-source metadata (authors, publish date, categories...)
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
        source_type: SourceType,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            url: url.into(),
            source_type,
            metadata: Map::new(),
        }
    }

    /// Attach a metadata entry, builder style.
    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

// ============= API Request/Response Types =============

/// How much effort a research request should spend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResearchDepth {
    /// Encyclopedia only, at most 3 sources
    Quick,
    /// Caller-supplied or default sources and cap
    #[default]
    Balanced,
    /// All requested sources, at most 8 sources
    Deep,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResearchRequest {
    /// The research question
    pub query: String,
    #[serde(default)]
    pub depth: ResearchDepth,
    /// Which sources to query; defaults to all of them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_sources: Option<Vec<SourceType>>,
    /// Maximum number of sources in the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sources: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResearchResponse {
    pub answer: String,
    pub sources: Vec<Document>,
    pub query: String,
    pub tokens_used: u64,
    /// Wall-clock seconds spent on the request, rounded to 2 decimals
    pub processing_time: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Seconds since the server started
    pub uptime: f64,
    /// Research requests currently being processed
    pub in_flight: usize,
    pub api_keys: HashMap<String, bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SourceStatus {
    pub source_type: SourceType,
    pub enabled: bool,
    pub requires_api_key: bool,
    pub configured: bool,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Too many requests: {0}")]
    Capacity(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Source error: {0}")]
    Source(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::{StatusCode, header};

        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Capacity(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            AppError::LLM(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Source(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        if status == StatusCode::TOO_MANY_REQUESTS {
            return (status, [(header::RETRY_AFTER, "1")], axum::Json(body)).into_response();
        }

        (status, axum::Json(body)).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Source(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
