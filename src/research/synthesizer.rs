use crate::llm::LLMClient;
use crate::types::Document;
use crate::utils::text::excerpt;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Answer returned when there is nothing to synthesize from
pub const NO_SOURCES_ANSWER: &str = "I couldn't find enough relevant sources to answer your question. Please try rephrasing or try a different query.";

/// Characters of the underlying error quoted in the fallback answer
const ERROR_EXCERPT_CHARS: usize = 100;

const MAX_CITED_AUTHORS: usize = 3;

pub const SYSTEM_PROMPT: &str = "You are a helpful research assistant that provides accurate, well-cited answers.

Your task is to answer questions using ONLY the provided sources. Follow these guidelines:

1. Use information ONLY from the provided sources
2. Cite sources using [1], [2], [3] format corresponding to the source numbers
3. If sources contradict each other, acknowledge the contradiction
4. If the sources don't contain enough information, say so clearly
5. Structure your answer in clear paragraphs
6. Be concise but comprehensive
7. Include relevant details and context from the sources

Always end your answer with proper citations.";

/// Outcome of a synthesis call. Never an error: failures become fallback text.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub answer: String,
    pub tokens_used: u64,
}

impl Synthesis {
    fn fallback(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            tokens_used: 0,
        }
    }
}

/// Turns a question plus numbered documents into a cited answer.
pub struct AnswerSynthesizer {
    llm: Arc<dyn LLMClient>,
}

impl AnswerSynthesizer {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Generate a cited answer from `documents`.
    ///
    /// With no documents the generator is not called at all.
    pub async fn generate_answer(&self, query: &str, documents: &[Document]) -> Synthesis {
        if documents.is_empty() {
            return Synthesis::fallback(NO_SOURCES_ANSWER);
        }

        let prompt = build_prompt(query, documents);
        match self.llm.generate_with_system(SYSTEM_PROMPT, &prompt).await {
            Ok(response) if !response.content.trim().is_empty() => {
                info!(
                    model = self.llm.model_name(),
                    tokens = response.tokens_used,
                    "Generated answer"
                );
                Synthesis {
                    answer: response.content.trim().to_string(),
                    tokens_used: response.tokens_used,
                }
            }
            Ok(_) => {
                error!(model = self.llm.model_name(), "Generator returned an empty answer");
                Synthesis::fallback(error_answer("the model returned an empty answer"))
            }
            Err(e) => {
                error!(model = self.llm.model_name(), error = %e, "Answer generation failed");
                Synthesis::fallback(error_answer(&e.to_string()))
            }
        }
    }
}

fn error_answer(reason: &str) -> String {
    format!(
        "I encountered an error while generating the answer. Please try again. Error: {}",
        excerpt(reason, ERROR_EXCERPT_CHARS)
    )
}

/// The user prompt: question, numbered source blocks, then the instruction.
pub fn build_prompt(query: &str, documents: &[Document]) -> String {
    format!(
        "QUESTION: {}\n\nAVAILABLE SOURCES:\n{}\n\nPlease provide a well-researched answer with proper citations:",
        query,
        format_sources(documents)
    )
}

/// Render documents as 1-based numbered blocks so `[n]` citations resolve to
/// the n-th document in the response.
pub fn format_sources(documents: &[Document]) -> String {
    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| format_source(i + 1, doc))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_source(number: usize, doc: &Document) -> String {
    let mut block = format!(
        "--- SOURCE {} ---\nTITLE: {}\nTYPE: {}\nCONTENT: {}",
        number, doc.title, doc.source_type, doc.content
    );

    if let Some(Value::Array(authors)) = doc.metadata.get("authors") {
        let names: Vec<&str> = authors
            .iter()
            .filter_map(Value::as_str)
            .take(MAX_CITED_AUTHORS)
            .collect();
        if !names.is_empty() {
            block.push_str(&format!("\nAUTHORS: {}", names.join(", ")));
        }
    }
    if let Some(date) = doc.metadata.get("published").and_then(Value::as_str) {
        if !date.is_empty() {
            block.push_str(&format!("\nDATE: {}", date));
        }
    }
    if let Some(outlet) = doc.metadata.get("source").and_then(Value::as_str) {
        block.push_str(&format!("\nNEWS SOURCE: {}", outlet));
    }

    block
}
