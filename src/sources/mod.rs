//! Source Adapters
//!
//! Each adapter wraps one external search capability and normalizes its
//! results into [`Document`]s:
//!
//! - [`wikipedia`](crate::sources::wikipedia) - encyclopedia lookup with a single full-text fallback hop
//! - [`arxiv`](crate::sources::arxiv) - academic papers from the arXiv Atom API
//! - [`news`](crate::sources::news) - recent articles from NewsAPI (needs an API key)
//! - [`registry`](crate::sources::registry) - maps each [`SourceType`] to its adapter
//!
//! # Failure model
//!
//! Adapters implement the fallible [`SourceAdapter::try_search`]. Callers use
//! [`SourceAdapter::search`], which never fails: any error is logged as a
//! warning and turned into an empty result set, so one broken source can
//! never take a research request down with it.

/// arXiv paper index adapter.
pub mod arxiv;
/// NewsAPI adapter.
pub mod news;
/// Source type to adapter registry.
pub mod registry;
/// Wikipedia encyclopedia adapter.
pub mod wikipedia;

pub use registry::SourceRegistry;

use crate::types::{Document, Result, SourceType};
use async_trait::async_trait;
use tracing::{debug, warn};

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source_type(&self) -> SourceType;

    /// Whether this source needs an API credential
    fn requires_api_key(&self) -> bool {
        false
    }

    /// Whether every credential this source needs is present
    fn is_configured(&self) -> bool {
        true
    }

    /// Query the source, returning at most `limit` documents.
    async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<Document>>;

    /// Infallible search: errors become an empty list.
    ///
    /// Documents without a URL are dropped and the result is capped at `limit`.
    async fn search(&self, query: &str, limit: usize) -> Vec<Document> {
        let source = self.source_type();
        match self.try_search(query, limit).await {
            Ok(mut documents) => {
                documents.retain(|doc| !doc.url.trim().is_empty());
                documents.truncate(limit);
                debug!(%source, count = documents.len(), "Source search finished");
                documents
            }
            Err(e) => {
                warn!(%source, error = %e, "Source search failed, continuing without it");
                Vec::new()
            }
        }
    }
}

pub(crate) fn http_client(timeout_secs: u64, user_agent: &str) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(user_agent)
        .build()
        .map_err(|e| crate::types::AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}
