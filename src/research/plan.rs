use crate::types::{AppError, ResearchDepth, Result, SourceType};
use crate::utils::toml_config::ResearchConfig;

/// Cap forced by the quick preset
pub const QUICK_MAX_SOURCES: usize = 3;
/// Cap used by the deep preset
pub const DEEP_MAX_SOURCES: usize = 8;

/// The concrete sources and cap a research request runs with, after the
/// depth preset has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchPlan {
    /// Enabled sources in issue order, without duplicates
    pub sources: Vec<SourceType>,
    pub max_sources: usize,
}

impl ResearchPlan {
    /// Apply a depth preset to the caller's optional overrides.
    ///
    /// - `quick`: Wikipedia only, at most 3 sources; overrides are ignored
    /// - `deep`: at most 8 sources; caller's sources or all of them
    /// - `balanced`: caller's sources or all of them, caller's cap or the configured default
    pub fn resolve(
        depth: ResearchDepth,
        include_sources: Option<Vec<SourceType>>,
        max_sources: Option<i64>,
        limits: &ResearchConfig,
    ) -> Result<Self> {
        let requested_sources = || include_sources.clone().unwrap_or_else(|| SourceType::ALL.to_vec());

        let (sources, max_sources) = match depth {
            ResearchDepth::Quick => (
                vec![SourceType::Wikipedia],
                QUICK_MAX_SOURCES.min(limits.max_sources_limit),
            ),
            ResearchDepth::Deep => (
                requested_sources(),
                DEEP_MAX_SOURCES.min(limits.max_sources_limit),
            ),
            ResearchDepth::Balanced => {
                let cap = match max_sources {
                    Some(n) => usize::try_from(n).map_err(|_| {
                        AppError::InvalidInput(format!(
                            "max_sources must be a positive integer, got {}",
                            n
                        ))
                    })?,
                    None => limits.default_max_sources,
                };
                (requested_sources(), cap)
            }
        };

        Ok(Self {
            sources: normalize_sources(sources),
            max_sources,
        })
    }
}

/// Sort into issue order and drop repeats.
pub fn normalize_sources(mut sources: Vec<SourceType>) -> Vec<SourceType> {
    sources.sort();
    sources.dedup();
    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn limits() -> ResearchConfig {
        ResearchConfig::default()
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(vec![SourceType::News, SourceType::Arxiv]), Some(10))]
    #[case(Some(vec![]), Some(-4))]
    fn test_quick_always_forces_wikipedia_and_three(
        #[case] include: Option<Vec<SourceType>>,
        #[case] max: Option<i64>,
    ) {
        let plan = ResearchPlan::resolve(ResearchDepth::Quick, include, max, &limits()).unwrap();
        assert_eq!(plan.sources, vec![SourceType::Wikipedia]);
        assert_eq!(plan.max_sources, 3);
    }

    #[rstest]
    #[case(None, SourceType::ALL.to_vec())]
    #[case(Some(vec![SourceType::Arxiv]), vec![SourceType::Arxiv])]
    fn test_deep_raises_cap(
        #[case] include: Option<Vec<SourceType>>,
        #[case] expected: Vec<SourceType>,
    ) {
        let plan = ResearchPlan::resolve(ResearchDepth::Deep, include, Some(2), &limits()).unwrap();
        assert_eq!(plan.sources, expected);
        assert_eq!(plan.max_sources, 8);
    }

    #[test]
    fn test_balanced_defaults() {
        let plan = ResearchPlan::resolve(ResearchDepth::Balanced, None, None, &limits()).unwrap();
        assert_eq!(plan.sources, SourceType::ALL.to_vec());
        assert_eq!(plan.max_sources, 5);
    }

    #[test]
    fn test_balanced_uses_caller_values_in_issue_order() {
        let plan = ResearchPlan::resolve(
            ResearchDepth::Balanced,
            Some(vec![SourceType::News, SourceType::Wikipedia, SourceType::News]),
            Some(2),
            &limits(),
        )
        .unwrap();
        assert_eq!(plan.sources, vec![SourceType::Wikipedia, SourceType::News]);
        assert_eq!(plan.max_sources, 2);
    }

    #[test]
    fn test_balanced_rejects_negative_cap() {
        let result = ResearchPlan::resolve(ResearchDepth::Balanced, None, Some(-1), &limits());
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_presets_respect_configured_limit() {
        let limits = ResearchConfig {
            default_max_sources: 2,
            max_sources_limit: 2,
            ..ResearchConfig::default()
        };
        let quick = ResearchPlan::resolve(ResearchDepth::Quick, None, None, &limits).unwrap();
        let deep = ResearchPlan::resolve(ResearchDepth::Deep, None, None, &limits).unwrap();
        assert_eq!(quick.max_sources, 2);
        assert_eq!(deep.max_sources, 2);
    }
}
