//! Wikipedia encyclopedia adapter.
//!
//! A query is first treated as an exact page title. When no such page exists
//! the adapter runs a full-text search and looks up the top hit instead. That
//! fallback happens at most once per search.

use crate::sources::{SourceAdapter, http_client};
use crate::types::{Document, Result, SourceType};
use crate::utils::text::{decode_html_entities, truncate_chars};
use crate::utils::toml_config::WikipediaConfig;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Number of full-text hits requested when the exact title misses
const FALLBACK_SEARCH_LIMIT: u32 = 3;

pub struct WikipediaSource {
    client: reqwest::Client,
    api_url: String,
    max_chars: usize,
}

/// Lookup progress. Every transition moves forward, so a search makes at
/// most three HTTP calls.
#[derive(Debug)]
enum Lookup {
    Direct(String),
    FallbackSearch,
    FallbackLookup(String),
    Done(Option<Document>),
}

impl WikipediaSource {
    pub fn new(config: &WikipediaConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_secs, &config.user_agent)?,
            api_url: config.api_url.clone(),
            max_chars: config.max_chars,
        })
    }

    async fn run(&self, query: &str) -> Result<Option<Document>> {
        let mut state = Lookup::Direct(query.to_string());

        loop {
            state = match state {
                Lookup::Direct(title) => match self.fetch_page(&title).await? {
                    Some(doc) => Lookup::Done(Some(doc)),
                    None => Lookup::FallbackSearch,
                },
                Lookup::FallbackSearch => match self.top_search_hit(query).await? {
                    Some(title) => {
                        debug!(%query, %title, "No exact Wikipedia page, trying top search hit");
                        Lookup::FallbackLookup(title)
                    }
                    None => Lookup::Done(None),
                },
                Lookup::FallbackLookup(title) => Lookup::Done(self.fetch_page(&title).await?),
                Lookup::Done(result) => return Ok(result),
            };
        }
    }

    /// Fetch the intro extract of the page titled exactly `title`.
    async fn fetch_page(&self, title: &str) -> Result<Option<Document>> {
        let response: QueryResponse<PagesQuery> = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts|info"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("inprop", "url"),
                ("titles", title),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let pages = response.query.map(|q| q.pages).unwrap_or_default();

        Ok(pages
            .into_iter()
            .filter(|(page_id, page)| page_id != "-1" && page.missing.is_none())
            .find_map(|(page_id, page)| {
                let extract = decode_html_entities(page.extract.trim());
                if extract.trim().is_empty() {
                    return None;
                }
                Some(
                    Document::new(
                        page.title.clone().unwrap_or_else(|| title.to_string()),
                        truncate_chars(&extract, self.max_chars),
                        format!("https://en.wikipedia.org/?curid={}", page_id),
                        SourceType::Wikipedia,
                    )
                    .with_meta("page_id", page_id),
                )
            }))
    }

    /// Title of the best full-text match for `query`, if any.
    async fn top_search_hit(&self, query: &str) -> Result<Option<String>> {
        let limit = FALLBACK_SEARCH_LIMIT.to_string();
        let response: QueryResponse<SearchQuery> = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .query
            .and_then(|q| q.search.into_iter().next())
            .map(|hit| hit.title))
    }
}

#[async_trait]
impl SourceAdapter for WikipediaSource {
    fn source_type(&self) -> SourceType {
        SourceType::Wikipedia
    }

    async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<Document>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        Ok(self.run(query).await?.into_iter().collect())
    }
}

// ============= MediaWiki Response Types =============

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    query: Option<T>,
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: Option<String>,
    #[serde(default)]
    extract: String,
    missing: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}
