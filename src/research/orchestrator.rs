use crate::llm::{GenerationParams, Provider};
use crate::research::admission::AdmissionController;
use crate::research::plan::{ResearchPlan, normalize_sources};
use crate::research::synthesizer::AnswerSynthesizer;
use crate::sources::SourceRegistry;
use crate::types::{AppError, Document, ResearchRequest, ResearchResponse, Result, SourceType};
use crate::utils::text::excerpt;
use crate::utils::toml_config::{ResearchConfig, TriangulateConfig};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

/// Runs one research request end to end: admission, validation, concurrent
/// fan-out to the enabled sources, merge, dedupe, cap and synthesis.
pub struct ResearchOrchestrator {
    registry: SourceRegistry,
    synthesizer: AnswerSynthesizer,
    admission: Arc<AdmissionController>,
    limits: ResearchConfig,
}

impl ResearchOrchestrator {
    pub fn new(
        registry: SourceRegistry,
        synthesizer: AnswerSynthesizer,
        limits: ResearchConfig,
    ) -> Self {
        let admission = Arc::new(AdmissionController::new(limits.max_concurrent_requests));
        Self {
            registry,
            synthesizer,
            admission,
            limits,
        }
    }

    /// Wire up sources, the LLM client and the admission ceiling from configuration
    pub fn from_config(config: &TriangulateConfig) -> Result<Self> {
        let registry = SourceRegistry::from_config(config)?;

        let provider = Provider::from_config(config)?;
        if !provider.is_configured() {
            warn!(
                provider = provider.name(),
                env = %config.llm.api_key_env,
                "LLM API key not set; answers will fall back to an error message"
            );
        }
        let llm = provider.create_client(GenerationParams::from_config(config))?;
        info!(provider = provider.name(), model = llm.model_name(), "LLM client ready");

        Ok(Self::new(
            registry,
            AnswerSynthesizer::new(llm),
            config.research.clone(),
        ))
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }

    pub fn in_flight(&self) -> usize {
        self.admission.in_flight()
    }

    /// Resolve the depth preset, then run the research.
    pub async fn research_request(&self, request: &ResearchRequest) -> Result<ResearchResponse> {
        let plan = ResearchPlan::resolve(
            request.depth,
            request.include_sources.clone(),
            request.max_sources,
            &self.limits,
        )?;
        self.research(&request.query, &plan.sources, plan.max_sources)
            .await
    }

    /// Research `query` across `sources`, returning at most `max_sources`
    /// unique documents and a synthesized answer citing them.
    ///
    /// Invalid input is rejected before any source is contacted. When the
    /// admission ceiling is reached the request fails with
    /// [`AppError::Capacity`] and nothing else happens.
    pub async fn research(
        &self,
        query: &str,
        sources: &[SourceType],
        max_sources: usize,
    ) -> Result<ResearchResponse> {
        let started = Instant::now();
        let query = self.validate(query, max_sources)?;
        let _permit = self.admission.try_acquire()?;

        let span = info_span!(
            "research",
            request_id = %Uuid::new_v4(),
            query = %excerpt(query, 80),
        );

        async move {
            let sources = normalize_sources(sources.to_vec());
            let per_source_limit = self.limits.per_source_limit.min(max_sources);
            info!(?sources, max_sources, per_source_limit, "Starting research");

            let gathered = self.gather(query, &sources, per_source_limit).await;
            let gathered_count = gathered.len();
            let documents = dedupe_and_cap(gathered, max_sources);
            info!(
                gathered = gathered_count,
                kept = documents.len(),
                "Merged source results"
            );

            let synthesis = self.synthesizer.generate_answer(query, &documents).await;
            let processing_time = round_to_hundredths(started.elapsed().as_secs_f64());

            info!(
                tokens_used = synthesis.tokens_used,
                processing_time, "Research finished"
            );

            Ok(ResearchResponse {
                answer: synthesis.answer,
                sources: documents,
                query: query.to_string(),
                tokens_used: synthesis.tokens_used,
                processing_time,
                timestamp: Utc::now(),
            })
        }
        .instrument(span)
        .await
    }

    fn validate<'q>(&self, query: &'q str, max_sources: usize) -> Result<&'q str> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput("Query cannot be empty".to_string()));
        }
        let length = query.chars().count();
        if length > self.limits.max_query_chars {
            return Err(AppError::InvalidInput(format!(
                "Query is too long ({} characters, maximum is {})",
                length, self.limits.max_query_chars
            )));
        }
        if max_sources == 0 || max_sources > self.limits.max_sources_limit {
            return Err(AppError::InvalidInput(format!(
                "max_sources must be between 1 and {}, got {}",
                self.limits.max_sources_limit, max_sources
            )));
        }
        Ok(query)
    }

    /// Query every enabled source concurrently and concatenate the results in
    /// issue order, regardless of which source finished first.
    async fn gather(&self, query: &str, sources: &[SourceType], limit: usize) -> Vec<Document> {
        let mut set = JoinSet::new();

        for (index, &source_type) in sources.iter().enumerate() {
            let Some(adapter) = self.registry.get(source_type) else {
                warn!(source = %source_type, "Source is not available, skipping");
                continue;
            };
            let query = query.to_string();
            set.spawn(
                async move { (index, adapter.search(&query, limit).await) }
                    .in_current_span(),
            );
        }

        let mut slots: Vec<Vec<Document>> = vec![Vec::new(); sources.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, documents)) => slots[index] = documents,
                Err(e) => warn!(error = %e, "Source task aborted, continuing without it"),
            }
        }

        slots.into_iter().flatten().collect()
    }
}

/// Keep the first document seen for each URL, then cap the list.
pub fn dedupe_and_cap(documents: Vec<Document>, max_sources: usize) -> Vec<Document> {
    let mut seen = HashSet::new();
    documents
        .into_iter()
        .filter(|doc| seen.insert(doc.url.clone()))
        .take(max_sources)
        .collect()
}

fn round_to_hundredths(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
