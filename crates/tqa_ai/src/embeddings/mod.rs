use tqa_core::error::AppError;

/// Text embeddings for the vector store. Documents and queries are embedded
/// separately because hosted models tune vectors per retrieval role.
pub trait Embedder {
    fn embed_documents(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AppError>;
    fn embed_query(&self, input: &str) -> Result<Vec<f32>, AppError>;
}

pub mod gemini_embed;
