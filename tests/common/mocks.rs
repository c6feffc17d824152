//! Mock implementations for testing.
//!
//! Mock LLM clients and source adapters shared across test files, so that the
//! orchestrator and API can be exercised without any network access.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use triangulate::llm::{LLMClient, LLMResponse};
use triangulate::sources::SourceAdapter;
use triangulate::types::{AppError, Document, Result, SourceType};

// ============= LLM =============

/// Mock LLM client with a canned reply and a call log.
///
/// ```ignore
/// let client = MockLLMClient::new("Rust is fast [1].");
/// let client = MockLLMClient::failing();
/// ```
#[derive(Default)]
pub struct MockLLMClient {
    response: String,
    tokens_used: u64,
    should_fail: bool,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Arc<Self> {
        Arc::new(Self {
            response: response.to_string(),
            tokens_used: 128,
            ..Self::default()
        })
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            should_fail: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// User prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<LLMResponse> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<LLMResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(LLMResponse {
            content: self.response.clone(),
            tokens_used: self.tokens_used,
            finish_reason: "stop".to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

// ============= Sources =============

/// Build a document whose title and URL are derived from `slug`.
pub fn doc(source_type: SourceType, slug: &str) -> Document {
    Document::new(
        format!("Title {}", slug),
        format!("Content about {}", slug),
        format!("https://example.com/{}", slug),
        source_type,
    )
}

enum Behavior {
    Return(Vec<Document>),
    Fail,
    Panic,
    /// Wait for a permit from the gate before returning
    Gated(Arc<Semaphore>, Vec<Document>),
}

/// Scripted source adapter that records every call it receives.
pub struct MockSource {
    source_type: SourceType,
    behavior: Behavior,
    delay: Duration,
    calls: AtomicUsize,
    limits: Mutex<Vec<usize>>,
}

impl MockSource {
    fn with_behavior(source_type: SourceType, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            source_type,
            behavior,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            limits: Mutex::new(Vec::new()),
        })
    }

    pub fn returning(source_type: SourceType, documents: Vec<Document>) -> Arc<Self> {
        Self::with_behavior(source_type, Behavior::Return(documents))
    }

    /// Returns `documents` after sleeping for `delay`
    pub fn slow(source_type: SourceType, delay: Duration, documents: Vec<Document>) -> Arc<Self> {
        Arc::new(Self {
            source_type,
            behavior: Behavior::Return(documents),
            delay,
            calls: AtomicUsize::new(0),
            limits: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(source_type: SourceType) -> Arc<Self> {
        Self::with_behavior(source_type, Behavior::Fail)
    }

    pub fn panicking(source_type: SourceType) -> Arc<Self> {
        Self::with_behavior(source_type, Behavior::Panic)
    }

    /// Blocks every search until `gate` hands out a permit
    pub fn gated(
        source_type: SourceType,
        gate: Arc<Semaphore>,
        documents: Vec<Document>,
    ) -> Arc<Self> {
        Self::with_behavior(source_type, Behavior::Gated(gate, documents))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The `limit` argument of every call, in order
    pub fn limits(&self) -> Vec<usize> {
        self.limits.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceAdapter for MockSource {
    fn source_type(&self) -> SourceType {
        self.source_type
    }

    async fn try_search(&self, _query: &str, limit: usize) -> Result<Vec<Document>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.limits.lock().unwrap().push(limit);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.behavior {
            Behavior::Return(documents) => Ok(documents.iter().take(limit).cloned().collect()),
            Behavior::Fail => Err(AppError::Source(format!(
                "{} is unreachable",
                self.source_type
            ))),
            Behavior::Panic => panic!("{} adapter panicked", self.source_type),
            Behavior::Gated(gate, documents) => {
                let _permit = gate
                    .acquire()
                    .await
                    .map_err(|_| AppError::Source("gate closed".to_string()))?;
                Ok(documents.iter().take(limit).cloned().collect())
            }
        }
    }
}
