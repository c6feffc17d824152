//! NewsAPI adapter (`/v2/everything`).

use crate::sources::{SourceAdapter, http_client};
use crate::types::{AppError, Document, Result, SourceType};
use crate::utils::text::{excerpt, truncate_chars};
use crate::utils::toml_config::NewsConfig;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::warn;

/// Placeholder title NewsAPI uses for articles that were taken down
const REMOVED_MARKER: &str = "[Removed]";

pub struct NewsSource {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    max_chars: usize,
    lookback_days: i64,
    language: String,
}

impl NewsSource {
    pub fn new(config: &NewsConfig, api_key: Option<String>) -> Result<Self> {
        let user_agent = format!("Triangulate/{}", env!("CARGO_PKG_VERSION"));
        Ok(Self {
            client: http_client(config.timeout_secs, &user_agent)?,
            api_url: config.api_url.clone(),
            api_key,
            max_chars: config.max_chars,
            lookback_days: config.lookback_days,
            language: config.language.clone(),
        })
    }

    fn to_document(&self, article: Article) -> Option<Document> {
        let title = article.title.filter(|t| !t.trim().is_empty() && t != REMOVED_MARKER)?;
        let url = article.url.filter(|u| !u.trim().is_empty())?;
        let body = article
            .description
            .filter(|d| !d.trim().is_empty())
            .or(article.content.filter(|c| !c.trim().is_empty()))?;

        let content = truncate_chars(body.trim(), self.max_chars);
        let published = article
            .published_at
            .as_deref()
            .map(|p| excerpt(p, 10).to_string())
            .unwrap_or_default();
        let source_name = article
            .source
            .and_then(|s| s.name)
            .unwrap_or_else(|| "Unknown".to_string());

        Some(
            Document::new(title, content, url, SourceType::News)
                .with_meta("source", source_name)
                .with_meta("published", published)
                .with_meta("author", article.author),
        )
    }
}

#[async_trait]
impl SourceAdapter for NewsSource {
    fn source_type(&self) -> SourceType {
        SourceType::News
    }

    fn requires_api_key(&self) -> bool {
        true
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<Document>> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("NewsAPI key not configured, skipping news search");
            return Ok(Vec::new());
        };

        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let from_date = (Utc::now() - Duration::days(self.lookback_days))
            .format("%Y-%m-%d")
            .to_string();

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("q", query),
                ("apiKey", api_key),
                ("sortBy", "relevancy"),
                ("language", self.language.as_str()),
                ("from", from_date.as_str()),
            ])
            .query(&[("pageSize", limit)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Source(format!(
                "NewsAPI error: HTTP {}",
                status.as_u16()
            )));
        }

        let body: NewsResponse = response.json().await?;
        if body.status.as_deref() == Some("error") {
            return Err(AppError::Source(format!(
                "NewsAPI error: {}",
                body.message.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        Ok(body
            .articles
            .into_iter()
            .filter_map(|article| self.to_document(article))
            .take(limit)
            .collect())
    }
}

// ============= NewsAPI Response Types =============

#[derive(Debug, Deserialize)]
struct NewsResponse {
    status: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    source: Option<ArticleSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}
