use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tqa_core::config::AppConfig;
use tqa_core::error::AppError;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client for the Gemini REST API.
    ///
    /// The base URL must be `https://` or a loopback `http://127.0.0.1[:port]` proxy.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, AppError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;

        if api_key.trim().is_empty() {
            return Err(AppError::new(
                "CONFIG_MISSING_API_KEY",
                "Gemini API key must not be empty",
            ));
        }

        Ok(Self {
            base_url,
            api_key: api_key.trim().to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(&config.api_base_url, &config.api_key)
    }

    /// `{base}/models/{model}:{method}`; a leading `models/` on the model name is tolerated.
    pub fn model_url(&self, model: &str, method: &str) -> String {
        let model = model.trim_start_matches("models/");
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    pub(crate) fn post_json<B, R>(
        &self,
        url: &str,
        body: &B,
        timeout: Duration,
        error_code: &str,
    ) -> Result<R, AppError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_value(body).map_err(|e| {
            AppError::new(error_code, "Failed to encode Gemini request").with_details(e.to_string())
        })?;

        let resp = ureq::post(url)
            .set(API_KEY_HEADER, &self.api_key)
            .timeout(timeout)
            .send_json(payload);

        match resp {
            Ok(r) => r.into_json::<R>().map_err(|e| {
                AppError::new(error_code, "Failed to decode Gemini response")
                    .with_details(e.to_string())
            }),
            Err(ureq::Error::Status(status, r)) => {
                let body = r.into_string().unwrap_or_default();
                Err(AppError::new(error_code, "Gemini request failed")
                    .with_details(format!("status={status}; body={}", truncate(&body, 500)))
                    .with_retryable(status == 429 || status >= 500))
            }
            Err(e) => Err(AppError::new(error_code, "Failed to reach Gemini endpoint")
                .with_details(e.to_string())
                .with_retryable(true)),
        }
    }
}

fn validate_base_url(base_url: &str) -> Result<(), AppError> {
    let reject = || {
        AppError::new(
            "CONFIG_INVALID_BASE_URL",
            "Gemini base URL must be https or a 127.0.0.1 proxy",
        )
        .with_details(format!("base_url={base_url}"))
    };

    let (rest, loopback_only) = if let Some(rest) = base_url.strip_prefix("https://") {
        (rest, false)
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        (rest, true)
    } else {
        return Err(reject());
    };

    let authority = rest.split('/').next().unwrap_or_default();
    if authority.is_empty() || authority.contains('@') {
        return Err(reject());
    }

    let (host, port) = match authority.split_once(':') {
        Some((h, p)) => (h, Some(p)),
        None => (authority, None),
    };
    if host.is_empty() {
        return Err(reject());
    }
    if let Some(p) = port {
        match p.parse::<u16>() {
            Ok(n) if n > 0 => {}
            _ => return Err(reject()),
        }
    }
    if loopback_only && host != "127.0.0.1" {
        return Err(reject());
    }
    Ok(())
}

pub(crate) fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
