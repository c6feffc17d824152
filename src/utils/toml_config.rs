//! TOML-based configuration for Triangulate
//!
//! This module provides declarative configuration for the server, the LLM
//! provider, the research limits and every source adapter via a TOML file
//! (`triangulate.toml`).
//!
//! Every section has defaults, so a missing file yields a working
//! configuration. Secrets are never stored in the file: the file names the
//! environment variable that holds them (`api_key_env = "OPENAI_API_KEY"`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Root configuration structure loaded from triangulate.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangulateConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub research: ResearchConfig,

    #[serde(default)]
    pub sources: SourcesConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

// ============= LLM Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai" (any OpenAI-compatible endpoint) or "ollama"
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API base for OpenAI-compatible providers, server URL for Ollama
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Environment variable containing the API key
    #[serde(default = "default_llm_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_llm_timeout() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_llm_model(),
            base_url: default_llm_base_url(),
            api_key_env: default_llm_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

// ============= Research Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Cap used by the balanced preset when the caller gives none
    #[serde(default = "default_max_sources")]
    pub default_max_sources: usize,

    /// Largest cap a caller may ask for
    #[serde(default = "default_max_sources_limit")]
    pub max_sources_limit: usize,

    /// Documents requested from each individual source
    #[serde(default = "default_per_source_limit")]
    pub per_source_limit: usize,

    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,

    /// Admission ceiling for in-flight research requests
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

fn default_max_sources() -> usize {
    5
}

fn default_max_sources_limit() -> usize {
    20
}

fn default_per_source_limit() -> usize {
    3
}

fn default_max_query_chars() -> usize {
    500
}

fn default_max_concurrent_requests() -> usize {
    5
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            default_max_sources: default_max_sources(),
            max_sources_limit: default_max_sources_limit(),
            per_source_limit: default_per_source_limit(),
            max_query_chars: default_max_query_chars(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

// ============= Source Configuration =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub wikipedia: WikipediaConfig,

    #[serde(default)]
    pub arxiv: ArxivConfig,

    #[serde(default)]
    pub news: NewsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikipediaConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_wikipedia_url")]
    pub api_url: String,

    #[serde(default = "default_wikipedia_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_wikipedia_max_chars")]
    pub max_chars: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_true() -> bool {
    true
}

fn default_wikipedia_url() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_wikipedia_timeout() -> u64 {
    10
}

fn default_wikipedia_max_chars() -> usize {
    500
}

fn default_user_agent() -> String {
    format!("Triangulate/{} (research assistant)", env!("CARGO_PKG_VERSION"))
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_wikipedia_url(),
            timeout_secs: default_wikipedia_timeout(),
            max_chars: default_wikipedia_max_chars(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxivConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_arxiv_url")]
    pub api_url: String,

    #[serde(default = "default_arxiv_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_arxiv_max_chars")]
    pub max_chars: usize,
}

fn default_arxiv_url() -> String {
    "https://export.arxiv.org/api/query".to_string()
}

fn default_arxiv_timeout() -> u64 {
    15
}

fn default_arxiv_max_chars() -> usize {
    300
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_arxiv_url(),
            timeout_secs: default_arxiv_timeout(),
            max_chars: default_arxiv_max_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_news_url")]
    pub api_url: String,

    /// Environment variable containing the NewsAPI key
    #[serde(default = "default_news_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_news_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_news_max_chars")]
    pub max_chars: usize,

    /// Only articles published within this many days are returned
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,

    #[serde(default = "default_language")]
    pub language: String,
}

fn default_news_url() -> String {
    "https://newsapi.org/v2/everything".to_string()
}

fn default_news_api_key_env() -> String {
    "NEWS_API_KEY".to_string()
}

fn default_news_timeout() -> u64 {
    15
}

fn default_news_max_chars() -> usize {
    250
}

fn default_lookback_days() -> i64 {
    30
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_news_url(),
            api_key_env: default_news_api_key_env(),
            timeout_secs: default_news_timeout(),
            max_chars: default_news_max_chars(),
            lookback_days: default_lookback_days(),
            language: default_language(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Config(err.to_string())
    }
}

impl TriangulateConfig {
    /// Load configuration from a TOML file that must exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        info!(path = %path.display(), "No configuration file found, using defaults");
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: TriangulateConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate numeric ranges and provider selection
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        let research = &self.research;

        if research.default_max_sources == 0 {
            return Err(ConfigError::ValidationError(
                "research.default_max_sources must be positive".to_string(),
            ));
        }
        if research.max_sources_limit < research.default_max_sources {
            return Err(ConfigError::ValidationError(format!(
                "research.max_sources_limit ({}) is smaller than research.default_max_sources ({})",
                research.max_sources_limit, research.default_max_sources
            )));
        }
        if research.per_source_limit == 0 {
            return Err(ConfigError::ValidationError(
                "research.per_source_limit must be positive".to_string(),
            ));
        }
        if research.max_query_chars == 0 {
            return Err(ConfigError::ValidationError(
                "research.max_query_chars must be positive".to_string(),
            ));
        }
        if research.max_concurrent_requests == 0 {
            return Err(ConfigError::ValidationError(
                "research.max_concurrent_requests must be positive".to_string(),
            ));
        }

        match self.llm.provider.as_str() {
            "openai" | "ollama" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Unknown LLM provider '{}' (expected 'openai' or 'ollama')",
                    other
                )));
            }
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "llm.max_tokens must be positive".to_string(),
            ));
        }

        let sources = &self.sources;
        for (name, max_chars) in [
            ("wikipedia", sources.wikipedia.max_chars),
            ("arxiv", sources.arxiv.max_chars),
            ("news", sources.news.max_chars),
        ] {
            if max_chars == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "sources.{}.max_chars must be positive",
                    name
                )));
            }
        }
        if sources.news.lookback_days <= 0 {
            return Err(ConfigError::ValidationError(
                "sources.news.lookback_days must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference; empty values count as unset
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    /// The LLM API key, if the referenced env var is set
    pub fn llm_api_key(&self) -> Option<String> {
        self.resolve_env(&self.llm.api_key_env)
    }

    /// The NewsAPI key, if the referenced env var is set
    pub fn news_api_key(&self) -> Option<String> {
        self.resolve_env(&self.sources.news.api_key_env)
    }

    /// Which credentials are configured, keyed by service name
    pub fn api_key_status(&self) -> HashMap<String, bool> {
        let mut status = HashMap::new();
        status.insert(self.llm.provider.clone(), self.llm_api_key().is_some());
        status.insert("newsapi".to_string(), self.news_api_key().is_some());
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> String {
        r#"
[server]
host = "0.0.0.0"
port = 9000
log_level = "debug"

[llm]
provider = "openai"
model = "gpt-4o-mini"
api_key_env = "TEST_TRIANGULATE_OPENAI_KEY"
temperature = 0.2

[research]
max_concurrent_requests = 2
per_source_limit = 2

[sources.news]
api_key_env = "TEST_TRIANGULATE_NEWS_KEY"
max_chars = 120

[sources.arxiv]
enabled = false
"#
        .to_string()
    }

    #[test]
    fn test_parse_config() {
        let config = TriangulateConfig::from_toml(&create_test_config()).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, 1500);
        assert_eq!(config.research.max_concurrent_requests, 2);
        assert_eq!(config.research.per_source_limit, 2);
        assert_eq!(config.research.default_max_sources, 5);
        assert_eq!(config.sources.news.max_chars, 120);
        assert!(!config.sources.arxiv.enabled);
        assert!(config.sources.wikipedia.enabled);
    }

    #[test]
    fn test_defaults() {
        let config = TriangulateConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.sources.wikipedia.max_chars, 500);
        assert_eq!(config.sources.arxiv.max_chars, 300);
        assert_eq!(config.sources.news.max_chars, 250);
        assert_eq!(config.sources.news.lookback_days, 30);
        assert_eq!(config.research.max_query_chars, 500);
    }

    #[test]
    fn test_empty_file_is_valid() {
        let config = TriangulateConfig::from_toml("").unwrap();
        assert_eq!(config.research.max_concurrent_requests, 5);
    }

    #[test]
    fn test_validation_unknown_provider() {
        let result = TriangulateConfig::from_toml("[llm]\nprovider = \"llamacpp\"\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_zero_ceiling() {
        let result = TriangulateConfig::from_toml("[research]\nmax_concurrent_requests = 0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_limit_below_default() {
        let result = TriangulateConfig::from_toml(
            "[research]\ndefault_max_sources = 10\nmax_sources_limit = 4\n",
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_temperature_range() {
        let result = TriangulateConfig::from_toml("[llm]\ntemperature = 3.5\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = TriangulateConfig::from_toml("[server\nport = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = TriangulateConfig::load("/definitely/not/here/triangulate.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));

        let config =
            TriangulateConfig::load_or_default("/definitely/not/here/triangulate.toml").unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_resolve_env_ignores_empty_values() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("TEST_TRIANGULATE_EMPTY_KEY", "   ");
        }
        let config = TriangulateConfig::default();
        assert!(config.resolve_env("TEST_TRIANGULATE_EMPTY_KEY").is_none());
        assert!(config.resolve_env("TEST_TRIANGULATE_NEVER_SET").is_none());
    }
}
