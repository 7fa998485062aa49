use std::time::Duration;

use serde::{Deserialize, Serialize};
use tqa_core::error::AppError;

use super::{GenerationOptions, Llm};
use crate::gemini::GeminiClient;

const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct GeminiLlm {
    client: GeminiClient,
}

impl GeminiLlm {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub(crate) struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub(crate) fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    fn build(prompt: &str, options: &GenerationOptions) -> Self {
        let generation_config = if options.temperature.is_some() || options.max_output_tokens.is_some() {
            Some(GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
            })
        } else {
            None
        };
        Self {
            contents: vec![Content::text(Some("user"), prompt)],
            system_instruction: options
                .system_instruction
                .as_deref()
                .map(|s| Content::text(None, s)),
            generation_config,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, AppError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "none".to_string());
            return Err(AppError::new("AI_GENERATION_FAILED", "Gemini returned no candidates")
                .with_details(format!("block_reason={reason}")));
        };
        if let Some(reason) = candidate.finish_reason.as_deref() {
            tracing::debug!(finish_reason = reason, "gemini generation finished");
        }
        Ok(candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default())
    }
}

impl Llm for GeminiLlm {
    fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, AppError> {
        let url = self.client.model_url(&options.model, "generateContent");
        let req = GenerateContentRequest::build(prompt, options);
        let resp: GenerateContentResponse =
            self.client
                .post_json(&url, &req, GENERATE_TIMEOUT, "AI_GENERATION_FAILED")?;
        resp.into_text()
    }
}
