use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CHUNKS_PATH: &str = "./data/chunks.txt";
pub const DEFAULT_BIBLIOGRAPHY_PATH: &str = "./data/bib_entries.json";
pub const DEFAULT_COLLECTION: &str = "PhD_thesis";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

/// Sampling settings for one kind of language-model call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallSettings {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl CallSettings {
    /// Yes/no citation gate: a single low-temperature token.
    pub fn classifier_default() -> Self {
        Self {
            model: "gemini-2.5-flash-lite".to_string(),
            temperature: Some(0.1),
            max_output_tokens: Some(1),
        }
    }

    /// Citation key extraction: one short comma-separated line.
    pub fn extractor_default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            temperature: Some(0.1),
            max_output_tokens: Some(100),
        }
    }

    /// Open-ended answer generation; the model's own output budget applies unless capped.
    pub fn answer_default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            temperature: None,
            max_output_tokens: None,
        }
    }
}

/// Process-wide configuration, built once at startup and passed by reference.
/// Holds the API key: not serializable, and `Debug` redacts it.
#[derive(Clone, PartialEq)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub chunks_path: PathBuf,
    pub bibliography_path: PathBuf,
    pub collection_name: String,
    pub embedding_model: String,
    pub classifier: CallSettings,
    pub extractor: CallSettings,
    pub answer: CallSettings,
}

impl AppConfig {
    /// Build a config from an arbitrary variable lookup. The API key is mandatory.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::new(
                    "CONFIG_MISSING_API_KEY",
                    "GEMINI_API_KEY is not set in the environment variables",
                )
            })?;

        let api_base_url = lookup(BASE_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            api_base_url,
            chunks_path: PathBuf::from(DEFAULT_CHUNKS_PATH),
            bibliography_path: PathBuf::from(DEFAULT_BIBLIOGRAPHY_PATH),
            collection_name: DEFAULT_COLLECTION.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            classifier: CallSettings::classifier_default(),
            extractor: CallSettings::extractor_default(),
            answer: CallSettings::answer_default(),
        })
    }

    /// Build a config from the process environment. Callers load `.env` beforehand.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("chunks_path", &self.chunks_path)
            .field("bibliography_path", &self.bibliography_path)
            .field("collection_name", &self.collection_name)
            .field("embedding_model", &self.embedding_model)
            .field("classifier", &self.classifier)
            .field("extractor", &self.extractor)
            .field("answer", &self.answer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let err = AppConfig::from_lookup(lookup_from(&[])).expect_err("should fail");
        assert_eq!(err.code, "CONFIG_MISSING_API_KEY");
        assert!(err.is_config_error());

        let err = AppConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "   ")])).expect_err("blank");
        assert_eq!(err.code, "CONFIG_MISSING_API_KEY");
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "k-123")])).expect("config");
        assert_eq!(cfg.api_key, "k-123");
        assert_eq!(cfg.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.collection_name, "PhD_thesis");
        assert_eq!(cfg.classifier.max_output_tokens, Some(1));
        assert_eq!(cfg.extractor.max_output_tokens, Some(100));
        assert_eq!(cfg.answer.max_output_tokens, None);
    }

    #[test]
    fn base_url_override_is_read() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "k"),
            (BASE_URL_VAR, "http://127.0.0.1:8080"),
        ]))
        .expect("config");
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(API_KEY_VAR, "super-secret")])).expect("config");
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
