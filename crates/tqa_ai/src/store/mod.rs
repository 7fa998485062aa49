use serde::{Deserialize, Serialize};
use tqa_core::error::AppError;

pub mod memory;
mod similarity;

pub use memory::{MemoryCollection, MemoryStore};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryMatch {
    pub id: String,
    pub document: String,
    pub score: f32,
}

/// A named set of documents searchable by text similarity.
pub trait Collection {
    fn name(&self) -> &str;

    fn count(&self) -> usize;

    /// Bulk insert. `ids` and `documents` are parallel; ids must be new and unique.
    fn add(&mut self, ids: Vec<String>, documents: Vec<String>) -> Result<(), AppError>;

    /// Nearest neighbours of `query_text`, most similar first, at most `n_results`.
    fn query(&self, query_text: &str, n_results: usize) -> Result<Vec<QueryMatch>, AppError>;
}
