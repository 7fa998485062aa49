use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lines shorter than this (after trimming) are noise, e.g. stray LaTeX braces.
pub const MIN_CHUNK_CHARS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkSource {
    pub lines_read: usize,
    pub chunks: Vec<Chunk>,
}

impl ChunkSource {
    pub fn lines_skipped(&self) -> usize {
        self.lines_read - self.chunks.len()
    }
}

/// Split newline-delimited text into chunks. Ids are the zero-based insertion order.
pub fn parse_chunks(text: &str) -> ChunkSource {
    let mut lines_read = 0usize;
    let mut chunks = Vec::new();
    for line in text.lines() {
        lines_read += 1;
        let trimmed = line.trim();
        if trimmed.chars().count() < MIN_CHUNK_CHARS {
            continue;
        }
        chunks.push(Chunk {
            id: chunks.len().to_string(),
            text: trimmed.to_string(),
        });
    }
    ChunkSource { lines_read, chunks }
}

pub fn read_chunk_source(path: &Path) -> Result<ChunkSource, AppError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        let code = if e.kind() == ErrorKind::NotFound {
            "CHUNKS_SOURCE_NOT_FOUND"
        } else {
            "CHUNKS_SOURCE_READ_FAILED"
        };
        AppError::new(code, "Failed to read chunk source")
            .with_details(format!("path={}; err={}", path.display(), e))
    })?;
    Ok(parse_chunks(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn length_boundary_is_ten_trimmed_characters() {
        let src = parse_chunks("123456789\n1234567890\n   123456789   \n");
        assert_eq!(src.lines_read, 3);
        assert_eq!(
            src.chunks,
            vec![Chunk {
                id: "0".to_string(),
                text: "1234567890".to_string(),
            }]
        );
    }

    #[test]
    fn ids_are_contiguous_in_insertion_order() {
        let src = parse_chunks("first line of text\n\nx\nsecond line of text\r\nthird line of text");
        let ids: Vec<&str> = src.chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
        assert_eq!(src.chunks[1].text, "second line of text");
        assert_eq!(src.lines_skipped(), 2);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 9 characters, 18 bytes.
        let src = parse_chunks("ééééééééé");
        assert!(src.chunks.is_empty());
    }
}
