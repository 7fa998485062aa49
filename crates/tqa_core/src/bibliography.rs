use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reference {
    pub key: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolution {
    pub references: Vec<Reference>,
    pub missing_keys: Vec<String>,
}

/// Citation key to formatted reference text, as exported from the thesis `.bib`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bibliography {
    entries: BTreeMap<String, String>,
}

impl Bibliography {
    pub fn from_json_str(raw: &str) -> Result<Self, AppError> {
        let entries: BTreeMap<String, String> = serde_json::from_str(raw).map_err(|e| {
            AppError::new("BIB_PARSE_FAILED", "Failed to decode bibliography entries")
                .with_details(e.to_string())
        })?;
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            let code = if e.kind() == ErrorKind::NotFound {
                "BIB_NOT_FOUND"
            } else {
                "BIB_READ_FAILED"
            };
            AppError::new(code, "Failed to read bibliography entries")
                .with_details(format!("path={}; err={}", path.display(), e))
        })?;
        Self::from_json_str(&raw).map_err(|mut e| {
            let details = match e.details.take() {
                Some(err) => format!("path={}; err={}", path.display(), err),
                None => format!("path={}", path.display()),
            };
            e.with_details(details)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Look up each key in order. Unknown keys are logged and skipped.
    pub fn resolve<S: AsRef<str>>(&self, keys: &[S]) -> Resolution {
        let mut out = Resolution::default();
        for key in keys {
            let key = key.as_ref().trim();
            match self.entries.get(key) {
                Some(text) => out.references.push(Reference {
                    key: key.to_string(),
                    text: text.clone(),
                }),
                None => {
                    warn!(key, "citation key not found in the bibliography entries");
                    out.missing_keys.push(key.to_string());
                }
            }
        }
        out
    }
}
