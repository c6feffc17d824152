//! arXiv adapter backed by the public Atom export API.

use crate::sources::{SourceAdapter, http_client};
use crate::types::{AppError, Document, Result, SourceType};
use crate::utils::text::{collapse_whitespace, excerpt, truncate_chars};
use crate::utils::toml_config::ArxivConfig;
use async_trait::async_trait;
use chrono::DateTime;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use reqwest::header::ACCEPT;

const MAX_AUTHORS: usize = 3;

pub struct ArxivSource {
    client: reqwest::Client,
    api_url: String,
    max_chars: usize,
}

impl ArxivSource {
    pub fn new(config: &ArxivConfig) -> Result<Self> {
        let user_agent = format!("Triangulate/{}", env!("CARGO_PKG_VERSION"));
        Ok(Self {
            client: http_client(config.timeout_secs, &user_agent)?,
            api_url: config.api_url.clone(),
            max_chars: config.max_chars,
        })
    }

    fn to_document(&self, entry: AtomEntry) -> Document {
        let published = DateTime::parse_from_rfc3339(entry.published.trim())
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| excerpt(entry.published.trim(), 10).to_string());

        let authors: Vec<String> = entry.authors.into_iter().take(MAX_AUTHORS).collect();
        let categories = if entry.primary_categories.is_empty() {
            entry.categories
        } else {
            entry.primary_categories
        };

        Document::new(
            collapse_whitespace(&entry.title),
            truncate_chars(&collapse_whitespace(&entry.summary), self.max_chars),
            entry.id.trim(),
            SourceType::Arxiv,
        )
        .with_meta("authors", authors)
        .with_meta("published", published)
        .with_meta("categories", categories)
    }
}

#[async_trait]
impl SourceAdapter for ArxivSource {
    fn source_type(&self) -> SourceType {
        SourceType::Arxiv
    }

    async fn try_search(&self, query: &str, limit: usize) -> Result<Vec<Document>> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let search_query = format!("all:{}", query);
        let body = self
            .client
            .get(&self.api_url)
            .query(&[("search_query", search_query.as_str())])
            .query(&[("start", 0), ("max_results", limit)])
            .query(&[("sortBy", "relevance"), ("sortOrder", "descending")])
            .header(ACCEPT, "application/atom+xml, application/xml;q=0.9, text/xml;q=0.8")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let entries = parse_atom_feed(&body)?;

        Ok(entries
            .into_iter()
            .filter(|entry| !entry.id.trim().is_empty())
            .take(limit)
            .map(|entry| self.to_document(entry))
            .collect())
    }
}

// ============= Atom Parsing =============

#[derive(Debug, Default, Clone, PartialEq)]
struct AtomEntry {
    id: String,
    title: String,
    summary: String,
    published: String,
    authors: Vec<String>,
    primary_categories: Vec<String>,
    categories: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Id,
    Title,
    Summary,
    Published,
    AuthorName,
}

fn term_attribute(element: &BytesStart<'_>) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"term")
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
        .filter(|term| !term.is_empty())
}

/// Parse the entries of an arXiv Atom feed. Namespace prefixes are ignored.
fn parse_atom_feed(xml: &str) -> Result<Vec<AtomEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut entries = Vec::new();
    let mut current: Option<AtomEntry> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"entry" => current = Some(AtomEntry::default()),
                    _ if current.is_none() => {}
                    b"id" => field = Some(Field::Id),
                    b"title" => field = Some(Field::Title),
                    b"summary" => field = Some(Field::Summary),
                    b"published" => field = Some(Field::Published),
                    b"name" => field = Some(Field::AuthorName),
                    b"primary_category" | b"category" => {
                        push_category(current.as_mut(), name.as_ref(), &e)
                    }
                    _ => {}
                }
                text.clear();
            }
            Ok(Event::Empty(e)) => {
                let name = e.local_name();
                if matches!(name.as_ref(), b"primary_category" | b"category") {
                    push_category(current.as_mut(), name.as_ref(), &e);
                }
            }
            Ok(Event::Text(t)) => {
                if field.is_some() {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| AppError::Source(format!("arXiv feed text error: {}", e)))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(t)) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"entry" {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                } else if let (Some(f), Some(entry)) = (field.take(), current.as_mut()) {
                    let value = std::mem::take(&mut text);
                    match f {
                        Field::Id => entry.id = value,
                        Field::Title => entry.title = value,
                        Field::Summary => entry.summary = value,
                        Field::Published => entry.published = value,
                        Field::AuthorName => entry.authors.push(value.trim().to_string()),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AppError::Source(format!("arXiv feed XML parse error: {}", e)));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

fn push_category(entry: Option<&mut AtomEntry>, name: &[u8], element: &BytesStart<'_>) {
    let (Some(entry), Some(term)) = (entry, term_attribute(element)) else {
        return;
    };
    if name == b"primary_category" {
        entry.primary_categories.push(term);
    } else {
        entry.categories.push(term);
    }
}
