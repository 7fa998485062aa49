use std::path::Path;

use serde::{Deserialize, Serialize};
use tqa_core::chunks::{read_chunk_source, ChunkSource};
use tqa_core::error::AppError;
use tracing::{info, warn};

use crate::store::{Collection, MemoryCollection, MemoryStore};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadSummary {
    pub collection: String,
    pub lines_read: usize,
    pub chunks_loaded: usize,
    pub lines_skipped: usize,
}

/// Insert every chunk of `source` into `collection` in one bulk add.
pub fn load_chunks(collection: &mut dyn Collection, source: ChunkSource) -> Result<LoadSummary, AppError> {
    let lines_read = source.lines_read;
    let lines_skipped = source.lines_skipped();
    let chunks_loaded = source.chunks.len();

    if chunks_loaded == 0 {
        warn!(
            collection = collection.name(),
            lines_read, "chunk source produced no chunks; collection left empty"
        );
    } else {
        let (ids, documents): (Vec<String>, Vec<String>) =
            source.chunks.into_iter().map(|c| (c.id, c.text)).unzip();
        collection.add(ids, documents)?;
    }

    let summary = LoadSummary {
        collection: collection.name().to_string(),
        lines_read,
        chunks_loaded,
        lines_skipped,
    };
    info!(
        collection = %summary.collection,
        chunks = summary.chunks_loaded,
        skipped = summary.lines_skipped,
        "loaded chunks"
    );
    Ok(summary)
}

/// Read the chunk file, create a fresh collection named `name` and populate it.
///
/// The source is read before the collection is created, so a missing file leaves the store untouched.
pub fn build_collection(
    store: &mut MemoryStore,
    name: &str,
    chunks_path: &Path,
) -> Result<(MemoryCollection, LoadSummary), AppError> {
    let source = read_chunk_source(chunks_path)?;
    let mut collection = store.create_collection(name)?;
    let summary = load_chunks(&mut collection, source)?;
    Ok((collection, summary))
}
