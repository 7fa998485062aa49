use serde::{Deserialize, Serialize};
use tqa_core::error::AppError;
use tqa_core::query::Query;
use tracing::info;

use crate::store::Collection;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalHit {
    pub chunk_id: String,
    pub text: String,
    pub score: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RetrievalResult {
    pub hits: Vec<RetrievalHit>,
}

impl RetrievalResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Chunk texts in relevance order.
    pub fn texts(&self) -> Vec<String> {
        self.hits.iter().map(|h| h.text.clone()).collect()
    }
}

/// Top-N chunks for a validated query, in the store's relevance order.
pub fn retrieve(collection: &dyn Collection, query: &Query) -> Result<RetrievalResult, AppError> {
    let matches = collection.query(query.text(), query.n_results())?;
    info!(
        collection = collection.name(),
        requested = query.n_results(),
        returned = matches.len(),
        "retrieved chunks"
    );
    Ok(RetrievalResult {
        hits: matches
            .into_iter()
            .map(|m| RetrievalHit {
                chunk_id: m.id,
                text: m.document,
                score: m.score,
            })
            .collect(),
    })
}
