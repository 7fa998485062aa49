use std::time::Duration;

use serde::{Deserialize, Serialize};
use tqa_core::error::AppError;

use super::Embedder;
use crate::gemini::{truncate, GeminiClient};
use crate::llm::gemini_llm::Content;

const EMBED_TIMEOUT: Duration = Duration::from_secs(30);
/// Hosted limit on requests per `batchEmbedContents` call.
pub const MAX_BATCH: usize = 100;
const MAX_INPUT_CHARS: usize = 8_000;

#[derive(Debug, Clone)]
pub struct GeminiEmbedder {
    client: GeminiClient,
    model: String,
}

impl GeminiEmbedder {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn qualified_model(&self) -> String {
        format!("models/{}", self.model.trim_start_matches("models/"))
    }

    fn request(&self, input: &str, task_type: &'static str) -> EmbedContentRequest {
        EmbedContentRequest {
            model: self.qualified_model(),
            content: Content::text(None, truncate(input, MAX_INPUT_CHARS)),
            task_type,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest {
    model: String,
    content: Content,
    task_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct BatchEmbedContentsRequest {
    requests: Vec<EmbedContentRequest>,
}

#[derive(Debug, Clone, Deserialize)]
struct ContentEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Clone, Deserialize)]
struct BatchEmbedContentsResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

impl GeminiEmbedder {
    /// One `batchEmbedContents` request per `MAX_BATCH` inputs, in input order.
    fn batch_requests(&self, inputs: &[String]) -> Vec<BatchEmbedContentsRequest> {
        inputs
            .chunks(MAX_BATCH)
            .map(|batch| BatchEmbedContentsRequest {
                requests: batch
                    .iter()
                    .map(|t| self.request(t, "RETRIEVAL_DOCUMENT"))
                    .collect(),
            })
            .collect()
    }
}

fn batch_vectors(
    expected: usize,
    resp: BatchEmbedContentsResponse,
) -> Result<Vec<Vec<f32>>, AppError> {
    if resp.embeddings.len() != expected {
        return Err(AppError::new(
            "AI_EMBEDDINGS_FAILED",
            "Embeddings response count does not match request count",
        )
        .with_details(format!(
            "expected={}; got={}",
            expected,
            resp.embeddings.len()
        )));
    }
    resp.embeddings
        .into_iter()
        .map(|e| {
            if e.values.is_empty() {
                Err(AppError::new(
                    "AI_EMBEDDINGS_FAILED",
                    "Embeddings response was empty",
                ))
            } else {
                Ok(e.values)
            }
        })
        .collect()
}

impl Embedder for GeminiEmbedder {
    fn embed_documents(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AppError> {
        let url = self.client.model_url(&self.model, "batchEmbedContents");
        let mut out = Vec::with_capacity(inputs.len());
        for req in self.batch_requests(inputs) {
            let expected = req.requests.len();
            let resp: BatchEmbedContentsResponse =
                self.client.post_json(&url, &req, EMBED_TIMEOUT, "AI_EMBEDDINGS_FAILED")?;
            out.extend(batch_vectors(expected, resp)?);
        }
        Ok(out)
    }

    fn embed_query(&self, input: &str) -> Result<Vec<f32>, AppError> {
        let url = self.client.model_url(&self.model, "embedContent");
        let req = self.request(input, "RETRIEVAL_QUERY");
        let resp: EmbedContentResponse =
            self.client
                .post_json(&url, &req, EMBED_TIMEOUT, "AI_EMBEDDINGS_FAILED")?;
        if resp.embedding.values.is_empty() {
            return Err(AppError::new(
                "AI_EMBEDDINGS_FAILED",
                "Embeddings response was empty",
            ));
        }
        Ok(resp.embedding.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn embedder() -> GeminiEmbedder {
        let client = GeminiClient::new("https://generativelanguage.googleapis.com/v1beta", "k")
            .expect("client");
        GeminiEmbedder::new(client, "text-embedding-004")
    }

    #[test]
    fn documents_are_split_into_batches_of_at_most_max_batch() {
        let inputs: Vec<String> = (0..(MAX_BATCH * 2 + 5)).map(|i| format!("chunk {i}")).collect();
        let batches = embedder().batch_requests(&inputs);

        let sizes: Vec<usize> = batches.iter().map(|b| b.requests.len()).collect();
        assert_eq!(sizes, vec![MAX_BATCH, MAX_BATCH, 5]);
        assert_eq!(batches[1].requests[0].content.parts[0].text, format!("chunk {MAX_BATCH}"));
        assert!(batches
            .iter()
            .flat_map(|b| b.requests.iter())
            .all(|r| r.task_type == "RETRIEVAL_DOCUMENT"));

        assert!(embedder().batch_requests(&[]).is_empty());
    }

    #[test]
    fn batch_response_count_must_match_request_count() {
        let resp: BatchEmbedContentsResponse =
            serde_json::from_value(json!({"embeddings": [{"values": [0.1, 0.2]}]})).expect("decode");
        let err = batch_vectors(2, resp).expect_err("short response");
        assert_eq!(err.code, "AI_EMBEDDINGS_FAILED");
        assert_eq!(err.details.as_deref(), Some("expected=2; got=1"));

        let resp: BatchEmbedContentsResponse = serde_json::from_value(json!({
            "embeddings": [{"values": [1.0]}, {"values": [2.0]}]
        }))
        .expect("decode");
        assert_eq!(batch_vectors(2, resp).expect("vectors"), vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn empty_vector_in_batch_is_an_error() {
        let resp: BatchEmbedContentsResponse =
            serde_json::from_value(json!({"embeddings": [{"values": [1.0]}, {}]})).expect("decode");
        let err = batch_vectors(2, resp).expect_err("empty vector");
        assert_eq!(err.message, "Embeddings response was empty");
    }

    #[test]
    fn embed_request_uses_qualified_model_and_task_type() {
        let embedder = embedder();
        let v = serde_json::to_value(embedder.request("umap", "RETRIEVAL_QUERY")).expect("json");
        assert_eq!(
            v,
            json!({
                "model": "models/text-embedding-004",
                "content": {"parts": [{"text": "umap"}]},
                "taskType": "RETRIEVAL_QUERY"
            })
        );
    }
}
