use crate::sources::{
    SourceAdapter, arxiv::ArxivSource, news::NewsSource, wikipedia::WikipediaSource,
};
use crate::types::{Result, SourceStatus, SourceType};
use crate::utils::toml_config::TriangulateConfig;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Maps each [`SourceType`] to the adapter that serves it.
///
/// Backed by a `BTreeMap` so iteration follows the fixed issue order.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    adapters: BTreeMap<SourceType, Arc<dyn SourceAdapter>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build adapters for every source enabled in the configuration
    pub fn from_config(config: &TriangulateConfig) -> Result<Self> {
        let mut registry = Self::new();
        let sources = &config.sources;

        if sources.wikipedia.enabled {
            registry.register(Arc::new(WikipediaSource::new(&sources.wikipedia)?));
        }
        if sources.arxiv.enabled {
            registry.register(Arc::new(ArxivSource::new(&sources.arxiv)?));
        }
        if sources.news.enabled {
            registry.register(Arc::new(NewsSource::new(
                &sources.news,
                config.news_api_key(),
            )?));
        }

        info!(sources = ?registry.source_types(), "Source adapters registered");
        Ok(registry)
    }

    /// Register an adapter, replacing any previous adapter for the same source type
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) {
        self.adapters.insert(adapter.source_type(), adapter);
    }

    pub fn get(&self, source_type: SourceType) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters.get(&source_type).cloned()
    }

    pub fn has_source(&self, source_type: SourceType) -> bool {
        self.adapters.contains_key(&source_type)
    }

    /// Registered source types, in issue order
    pub fn source_types(&self) -> Vec<SourceType> {
        self.adapters.keys().copied().collect()
    }

    /// Availability of every known source type, registered or not
    pub fn statuses(&self) -> Vec<SourceStatus> {
        SourceType::ALL
            .iter()
            .map(|&source_type| match self.adapters.get(&source_type) {
                Some(adapter) => SourceStatus {
                    source_type,
                    enabled: true,
                    requires_api_key: adapter.requires_api_key(),
                    configured: adapter.is_configured(),
                },
                None => SourceStatus {
                    source_type,
                    enabled: false,
                    requires_api_key: source_type == SourceType::News,
                    configured: false,
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config_registers_all_sources() {
        let registry = SourceRegistry::from_config(&TriangulateConfig::default()).unwrap();
        assert_eq!(registry.source_types(), SourceType::ALL.to_vec());
        assert!(registry.has_source(SourceType::Arxiv));
    }

    #[test]
    fn test_disabled_sources_are_skipped() {
        let mut config = TriangulateConfig::default();
        config.sources.arxiv.enabled = false;
        config.sources.news.enabled = false;

        let registry = SourceRegistry::from_config(&config).unwrap();
        assert_eq!(registry.source_types(), vec![SourceType::Wikipedia]);
        assert!(registry.get(SourceType::News).is_none());

        let statuses = registry.statuses();
        assert_eq!(statuses.len(), 3);
        assert!(statuses[0].enabled);
        assert!(!statuses[1].enabled);
        assert!(statuses[2].requires_api_key);
    }

    #[test]
    fn test_news_status_reflects_missing_key() {
        let mut config = TriangulateConfig::default();
        config.sources.news.api_key_env = "TEST_TRIANGULATE_UNSET_NEWS_KEY".to_string();

        let registry = SourceRegistry::from_config(&config).unwrap();
        let news = registry
            .statuses()
            .into_iter()
            .find(|s| s.source_type == SourceType::News)
            .unwrap();
        assert!(news.enabled);
        assert!(!news.configured);
    }
}
