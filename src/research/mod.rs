//! Research Orchestration
//!
//! A research request flows through four stages:
//!
//! 1. **Admission** - [`admission::AdmissionController`] rejects the request
//!    outright when too many are already in flight
//! 2. **Planning** - [`plan::ResearchPlan`] applies the depth preset to the
//!    caller's source selection and cap
//! 3. **Gathering** - [`orchestrator::ResearchOrchestrator`] queries every
//!    enabled source concurrently, merges results in a fixed source order,
//!    drops duplicate URLs and caps the list
//! 4. **Synthesis** - [`synthesizer::AnswerSynthesizer`] asks the LLM for an
//!    answer citing the surviving documents as `[1]`, `[2]`, ...
//!
//! # Usage
//!
//! ```ignore
//! use triangulate::research::ResearchOrchestrator;
//! use triangulate::types::SourceType;
//!
//! let orchestrator = ResearchOrchestrator::from_config(&config)?;
//! let response = orchestrator
//!     .research("What is quantum entanglement?", &SourceType::ALL, 5)
//!     .await?;
//!
//! println!("{}", response.answer);
//! for (i, source) in response.sources.iter().enumerate() {
//!     println!("[{}] {}", i + 1, source.url);
//! }
//! ```

/// Non-blocking admission ceiling.
pub mod admission;
/// Request orchestration.
pub mod orchestrator;
/// Depth presets.
pub mod plan;
/// Cited answer generation.
pub mod synthesizer;

pub use admission::{AdmissionController, AdmissionPermit};
pub use orchestrator::ResearchOrchestrator;
pub use plan::ResearchPlan;
pub use synthesizer::{AnswerSynthesizer, Synthesis};
