//! Citation gate, key extraction and bibliography resolution.
//!
//! Every path that does not end in resolved references yields an explicit
//! [`CitationOutcome::Uncited`] with the reason, so the answer composer has one
//! branch to take instead of three silent fallbacks.

use serde::{Deserialize, Serialize};
use tqa_core::bibliography::{Bibliography, Reference};
use tqa_core::config::{AppConfig, CallSettings};
use tqa_core::error::AppError;
use tracing::{debug, info, warn};

use crate::llm::{GenerationOptions, Llm};

pub const NO_KEYS_SENTINEL: &str = "No keys found";

const EXTRACT_SYSTEM_INSTRUCTION: &str = "You should find the citation keys from the .tex document related to the query. Output the keys in a single line, separated by commas. If no keys are found, output 'No keys found'.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "raw")]
pub enum CitationNeed {
    Required,
    NotRequired,
    /// Anything other than a bare `1` or `0`. Treated as not required.
    Unrecognized(String),
}

impl CitationNeed {
    pub fn from_output(raw: &str) -> Self {
        match raw.trim() {
            "1" => Self::Required,
            "0" => Self::NotRequired,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UncitedReason {
    NotRequired,
    NoKeysFound,
    NoReferencesResolved,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CitationOutcome {
    Cited(Vec<Reference>),
    Uncited(UncitedReason),
}

impl CitationOutcome {
    pub fn references(&self) -> &[Reference] {
        match self {
            Self::Cited(refs) => refs,
            Self::Uncited(_) => &[],
        }
    }
}

pub fn citation_check_prompt(query: &str) -> String {
    format!(
        "Does the following query requires any citations/references (bibliography)? answer 1 for Yes, 0 for No. No other output. Query: {query}"
    )
}

pub fn key_extraction_prompt(query: &str, documents: &[String]) -> String {
    let docs = documents
        .iter()
        .map(|d| format!("- {d}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Find the related citations keys in the document for the following query: {query}. The related documents are:\n{docs}"
    )
}

/// Ask the classifier model whether answering `query` needs bibliography references.
pub fn classify_citation_need(
    llm: &dyn Llm,
    settings: &CallSettings,
    query: &str,
) -> Result<CitationNeed, AppError> {
    let out = llm.generate(
        &citation_check_prompt(query),
        &GenerationOptions::from_settings(settings),
    )?;
    let need = CitationNeed::from_output(&out);
    match &need {
        CitationNeed::Unrecognized(raw) => {
            warn!(output = %raw, "citation check returned neither 1 nor 0; treating as not required")
        }
        other => debug!(need = ?other, "citation check"),
    }
    Ok(need)
}

/// True iff the classifier answered exactly `1`.
pub fn needs_citation(llm: &dyn Llm, settings: &CallSettings, query: &str) -> Result<bool, AppError> {
    Ok(classify_citation_need(llm, settings, query)?.is_required())
}

/// Parse the extractor output. The sentinel and an all-blank list both mean "no keys".
pub fn parse_citation_keys(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw == NO_KEYS_SENTINEL {
        return Vec::new();
    }
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn extract_citation_keys(
    llm: &dyn Llm,
    settings: &CallSettings,
    query: &str,
    documents: &[String],
) -> Result<Vec<String>, AppError> {
    let options =
        GenerationOptions::from_settings(settings).with_system_instruction(EXTRACT_SYSTEM_INSTRUCTION);
    let out = llm.generate(&key_extraction_prompt(query, documents), &options)?;
    Ok(parse_citation_keys(&out))
}

/// Classify, extract keys and resolve them against the bibliography file.
///
/// The bibliography is re-read on every call so edits to the JSON take effect
/// without restarting the session.
pub fn resolve_citations(
    llm: &dyn Llm,
    config: &AppConfig,
    query: &str,
    documents: &[String],
) -> Result<CitationOutcome, AppError> {
    if !needs_citation(llm, &config.classifier, query)? {
        return Ok(CitationOutcome::Uncited(UncitedReason::NotRequired));
    }

    let keys = extract_citation_keys(llm, &config.extractor, query, documents)?;
    if keys.is_empty() {
        info!("no citation keys found for the query");
        return Ok(CitationOutcome::Uncited(UncitedReason::NoKeysFound));
    }
    info!(keys = ?keys, "citation keys found");

    let bibliography = Bibliography::load(&config.bibliography_path)?;
    let resolution = bibliography.resolve(&keys);
    if resolution.references.is_empty() {
        info!(missing = resolution.missing_keys.len(), "no references found for the citation keys");
        return Ok(CitationOutcome::Uncited(UncitedReason::NoReferencesResolved));
    }
    info!(
        resolved = resolution.references.len(),
        missing = resolution.missing_keys.len(),
        "references found"
    );
    Ok(CitationOutcome::Cited(resolution.references))
}
