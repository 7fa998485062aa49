use serde::{Deserialize, Serialize};
use std::fmt;

/// Single structured error shape shared by the loader, retriever and answer pipeline.
///
/// `code` is a stable SCREAMING_SNAKE identifier. Its prefix says which layer failed:
/// `CONFIG_*` (fatal at startup), `INPUT_*` (rejected before any external call) and
/// `STORE_*` / `AI_*` / `BIB_*` / `CHUNKS_*` (collaborator failures that end one query).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn is_config_error(&self) -> bool {
        self.code.starts_with("CONFIG_")
    }

    pub fn is_input_error(&self) -> bool {
        self.code.starts_with("INPUT_")
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({details})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}
