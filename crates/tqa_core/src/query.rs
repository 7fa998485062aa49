use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A validated retrieval request. Construction is the only place preconditions are checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "QueryFields")]
pub struct Query {
    text: String,
    n_results: usize,
}

#[derive(Deserialize)]
struct QueryFields {
    text: String,
    n_results: usize,
}

impl TryFrom<QueryFields> for Query {
    type Error = AppError;

    fn try_from(fields: QueryFields) -> Result<Self, Self::Error> {
        Query::new(fields.text, fields.n_results)
    }
}

impl Query {
    pub fn new(text: impl Into<String>, n_results: usize) -> Result<Self, AppError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AppError::new("INPUT_EMPTY_QUERY", "Query must not be empty"));
        }
        if n_results == 0 {
            return Err(AppError::new(
                "INPUT_INVALID_RESULT_COUNT",
                "Number of results must be greater than 0",
            ));
        }
        Ok(Self { text, n_results })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn n_results(&self) -> usize {
        self.n_results
    }
}

/// Parse a user-typed result count. Zero, negatives and non-integers are rejected.
pub fn parse_result_count(raw: &str) -> Result<usize, AppError> {
    let raw = raw.trim();
    let n: i64 = raw.parse().map_err(|_| {
        AppError::new(
            "INPUT_INVALID_RESULT_COUNT",
            "Number of results must be a positive integer",
        )
        .with_details(format!("input={raw:?}"))
    })?;
    if n <= 0 {
        return Err(AppError::new(
            "INPUT_INVALID_RESULT_COUNT",
            "Number of results must be greater than 0",
        )
        .with_details(format!("input={n}")));
    }
    usize::try_from(n).map_err(|_| {
        AppError::new("INPUT_INVALID_RESULT_COUNT", "Number of results is too large")
            .with_details(format!("input={n}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_blank() {
        assert_eq!(
            Query::new("what is umap?", 0).expect_err("zero").code,
            "INPUT_INVALID_RESULT_COUNT"
        );
        assert_eq!(Query::new("", 3).expect_err("empty").code, "INPUT_EMPTY_QUERY");
        assert_eq!(Query::new(" \t\n", 3).expect_err("blank").code, "INPUT_EMPTY_QUERY");

        let q = Query::new("what is umap?", 3).expect("valid");
        assert_eq!(q.text(), "what is umap?");
        assert_eq!(q.n_results(), 3);
    }

    #[test]
    fn deserializing_applies_the_same_validation() {
        let err = serde_json::from_str::<Query>(r#"{"text": "", "n_results": 0}"#)
            .expect_err("blank text");
        assert!(err.to_string().contains("INPUT_EMPTY_QUERY"), "{err}");

        let err = serde_json::from_str::<Query>(r#"{"text": "what is umap?", "n_results": 0}"#)
            .expect_err("zero results");
        assert!(err.to_string().contains("INPUT_INVALID_RESULT_COUNT"), "{err}");

        let q: Query =
            serde_json::from_str(r#"{"text": "what is umap?", "n_results": 2}"#).expect("valid");
        assert_eq!(q, Query::new("what is umap?", 2).expect("valid"));
        let again: Query = serde_json::from_str(&serde_json::to_string(&q).expect("encode"))
            .expect("decode");
        assert_eq!(again, q);
    }

    #[test]
    fn result_count_parsing() {
        assert_eq!(parse_result_count(" 5 ").expect("ok"), 5);
        for bad in ["0", "-1", "-100", "three", "", "2.5"] {
            let err = parse_result_count(bad).expect_err(bad);
            assert_eq!(err.code, "INPUT_INVALID_RESULT_COUNT", "input {bad:?}");
            assert!(err.is_input_error());
        }
    }
}
