use std::io::Write;
use tempfile::NamedTempFile;
use triangulate::sources::SourceRegistry;
use triangulate::types::SourceType;
use triangulate::utils::toml_config::{ConfigError, TriangulateConfig};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
[server]
port = 9100
log_format = "json"

[llm]
model = "gpt-4o-mini"
max_tokens = 800

[research]
default_max_sources = 4
max_concurrent_requests = 10

[sources.wikipedia]
max_chars = 200

[sources.news]
enabled = false
"#,
    );

    let config = TriangulateConfig::load(file.path()).unwrap();
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.log_format, "json");
    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert_eq!(config.llm.max_tokens, 800);
    assert_eq!(config.research.default_max_sources, 4);
    assert_eq!(config.research.max_sources_limit, 20);
    assert_eq!(config.sources.wikipedia.max_chars, 200);

    let registry = SourceRegistry::from_config(&config).unwrap();
    assert_eq!(
        registry.source_types(),
        vec![SourceType::Wikipedia, SourceType::Arxiv]
    );
}

#[test]
fn test_load_or_default_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = TriangulateConfig::load_or_default(dir.path().join("triangulate.toml")).unwrap();
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.research.max_concurrent_requests, 5);
}

#[test]
fn test_load_requires_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = TriangulateConfig::load(dir.path().join("missing.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn test_invalid_file_is_rejected() {
    let file = write_config("[research]\nper_source_limit = 0\n");
    let result = TriangulateConfig::load_or_default(file.path());
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));

    let file = write_config("[server\nport = 1");
    let result = TriangulateConfig::load(file.path());
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}
