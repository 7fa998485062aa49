use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

use tqa_core::error::AppError;
use tracing::debug;

use super::similarity::{cosine_similarity, l2_norm};
use super::{Collection, QueryMatch};
use crate::embeddings::Embedder;

/// Ephemeral, process-local store of named collections.
pub struct MemoryStore {
    embedder: Rc<dyn Embedder>,
    names: BTreeSet<String>,
}

impl MemoryStore {
    pub fn new(embedder: Rc<dyn Embedder>) -> Self {
        Self {
            embedder,
            names: BTreeSet::new(),
        }
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Create an empty collection. Names are unique for the lifetime of the store.
    pub fn create_collection(&mut self, name: &str) -> Result<MemoryCollection, AppError> {
        validate_collection_name(name)?;
        if !self.names.insert(name.to_string()) {
            return Err(AppError::new(
                "STORE_COLLECTION_EXISTS",
                "Collection already exists",
            )
            .with_details(format!("name={name}")));
        }
        Ok(MemoryCollection {
            name: name.to_string(),
            embedder: Rc::clone(&self.embedder),
            records: Vec::new(),
            dims: None,
        })
    }
}

struct Record {
    id: String,
    document: String,
    vector: Vec<f32>,
    norm: f32,
}

pub struct MemoryCollection {
    name: String,
    embedder: Rc<dyn Embedder>,
    records: Vec<Record>,
    dims: Option<usize>,
}

impl MemoryCollection {
    /// Stored ids in insertion order.
    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.document.as_str())
    }

    fn check_dims(&self, got: usize, context: &str) -> Result<(), AppError> {
        match self.dims {
            Some(d) if d != got => Err(AppError::new(
                "STORE_DIMENSION_MISMATCH",
                "Embedding dimension mismatch",
            )
            .with_details(format!("{context}; expected={d}; got={got}"))),
            _ => Ok(()),
        }
    }
}

impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn count(&self) -> usize {
        self.records.len()
    }

    fn add(&mut self, ids: Vec<String>, documents: Vec<String>) -> Result<(), AppError> {
        if ids.len() != documents.len() {
            return Err(AppError::new(
                "STORE_ADD_FAILED",
                "ids and documents must have the same length",
            )
            .with_details(format!("ids={}; documents={}", ids.len(), documents.len())));
        }
        if ids.is_empty() {
            return Err(AppError::new("STORE_ADD_FAILED", "Nothing to add"));
        }

        let mut seen: HashSet<&str> = self.records.iter().map(|r| r.id.as_str()).collect();
        for id in ids.iter() {
            if !seen.insert(id.as_str()) {
                return Err(AppError::new("STORE_DUPLICATE_ID", "Duplicate document id")
                    .with_details(format!("collection={}; id={id}", self.name)));
            }
        }

        let vectors = self.embedder.embed_documents(&documents)?;
        if vectors.len() != documents.len() {
            return Err(AppError::new(
                "STORE_ADD_FAILED",
                "Embedder returned a different number of vectors than documents",
            )
            .with_details(format!("expected={}; got={}", documents.len(), vectors.len())));
        }

        // Validate everything before mutating so a failed add leaves the collection unchanged.
        let mut dims = self.dims;
        for (id, v) in ids.iter().zip(vectors.iter()) {
            match dims {
                Some(d) if d != v.len() => {
                    return Err(AppError::new(
                        "STORE_DIMENSION_MISMATCH",
                        "Embedding dimension mismatch",
                    )
                    .with_details(format!("id={id}; expected={d}; got={}", v.len())));
                }
                Some(_) => {}
                None => dims = Some(v.len()),
            }
        }

        for ((id, document), vector) in ids.into_iter().zip(documents).zip(vectors) {
            let norm = l2_norm(&vector);
            self.records.push(Record {
                id,
                document,
                vector,
                norm,
            });
        }
        self.dims = dims;
        debug!(collection = %self.name, count = self.records.len(), "documents added");
        Ok(())
    }

    fn query(&self, query_text: &str, n_results: usize) -> Result<Vec<QueryMatch>, AppError> {
        if n_results == 0 {
            return Err(AppError::new(
                "INPUT_INVALID_RESULT_COUNT",
                "Number of results must be greater than 0",
            ));
        }
        if self.records.is_empty() {
            return Err(AppError::new(
                "STORE_COLLECTION_EMPTY",
                "Collection has no documents to query",
            )
            .with_details(format!("collection={}", self.name)));
        }

        let qv = self.embedder.embed_query(query_text)?;
        self.check_dims(qv.len(), "query")?;
        let qnorm = l2_norm(&qv);
        if qnorm == 0.0 {
            return Err(AppError::new(
                "STORE_QUERY_FAILED",
                "Query embedding norm is zero",
            ));
        }

        // (insertion index, score); the index keeps ties in insertion order.
        let mut scored: Vec<(usize, f32)> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.norm > 0.0)
            .map(|(i, r)| (i, cosine_similarity(&qv, &r.vector, qnorm, r.norm)))
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        scored.truncate(n_results);

        Ok(scored
            .into_iter()
            .map(|(i, score)| {
                let r = &self.records[i];
                QueryMatch {
                    id: r.id.clone(),
                    document: r.document.clone(),
                    score,
                }
            })
            .collect())
    }
}

/// Collection names: 3-63 characters of `[A-Za-z0-9._-]`, alphanumeric at both ends, no `..`.
fn validate_collection_name(name: &str) -> Result<(), AppError> {
    let len = name.chars().count();
    let charset_ok = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    let ends_ok = name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
        && name.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());
    if (3..=63).contains(&len) && charset_ok && ends_ok && !name.contains("..") {
        return Ok(());
    }
    Err(AppError::new("STORE_INVALID_NAME", "Invalid collection name")
        .with_details(format!("name={name:?}")))
}
