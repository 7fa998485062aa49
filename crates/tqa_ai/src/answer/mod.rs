use serde::{Deserialize, Serialize};
use tqa_core::bibliography::Reference;
use tqa_core::config::{AppConfig, CallSettings};
use tqa_core::error::AppError;
use tqa_core::query::Query;
use tracing::{debug, warn};

use crate::citation::{resolve_citations, CitationOutcome};
use crate::llm::{GenerationOptions, Llm};
use crate::retrieve::{retrieve, RetrievalResult};
use crate::store::Collection;

pub mod prompts;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerReport {
    pub answer: String,
    pub citations: CitationOutcome,
    pub retrieved: RetrievalResult,
    pub prompt: String,
}

/// Build the answer prompt, generate, and return the trimmed answer text.
pub fn generate_answer(
    llm: &dyn Llm,
    settings: &CallSettings,
    query: &str,
    documents: &[String],
    references: &[Reference],
) -> Result<(String, String), AppError> {
    let prompt = prompts::answer_prompt(query, documents, references);
    debug!(%prompt, "answer prompt");
    let out = llm.generate(&prompt, &GenerationOptions::from_settings(settings))?;
    let answer = out.trim().to_string();
    if answer.is_empty() {
        return Err(AppError::new("AI_EMPTY_RESPONSE", "Answer response was empty")
            .with_details(format!("model={}", settings.model)));
    }
    Ok((answer, prompt))
}

/// Per-query orchestration over a populated collection.
pub struct Assistant<'a> {
    llm: &'a dyn Llm,
    collection: &'a dyn Collection,
    config: &'a AppConfig,
}

impl<'a> Assistant<'a> {
    pub fn new(llm: &'a dyn Llm, collection: &'a dyn Collection, config: &'a AppConfig) -> Self {
        Self {
            llm,
            collection,
            config,
        }
    }

    /// Retrieve, decide on citations, compose and generate. The answer is returned on every branch.
    ///
    /// Store-side retrieval failures are treated as "no results". Input errors,
    /// language-model and bibliography failures end this query with an error.
    pub fn answer(&self, query: &Query) -> Result<AnswerReport, AppError> {
        let retrieved = match retrieve(self.collection, query) {
            Ok(r) => r,
            Err(e) if e.is_input_error() => return Err(e),
            Err(e) => {
                warn!(error = %e, "retrieval failed; answering without documents");
                RetrievalResult::empty()
            }
        };
        let documents = retrieved.texts();

        let citations = resolve_citations(self.llm, self.config, query.text(), &documents)?;
        let (answer, prompt) = generate_answer(
            self.llm,
            &self.config.answer,
            query.text(),
            &documents,
            citations.references(),
        )?;

        Ok(AnswerReport {
            answer,
            citations,
            retrieved,
            prompt,
        })
    }
}
