use serde::{Deserialize, Serialize};
use tqa_core::config::CallSettings;
use tqa_core::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub system_instruction: Option<String>,
}

impl GenerationOptions {
    pub fn from_settings(settings: &CallSettings) -> Self {
        Self {
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
            system_instruction: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
}

/// Single-turn text generation. Implementations return the raw (untrimmed) text,
/// which may be empty when the model stops before emitting anything.
pub trait Llm {
    fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, AppError>;
}

pub mod gemini_llm;
