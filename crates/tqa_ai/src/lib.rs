pub mod answer;
pub mod citation;
pub mod embeddings;
pub mod gemini;
pub mod llm;
pub mod loader;
pub mod retrieve;
pub mod store;

#[cfg(test)]
mod tests {
    use super::gemini::GeminiClient;

    #[test]
    fn enforces_https_or_loopback_base_url() {
        assert!(GeminiClient::new("https://generativelanguage.googleapis.com/v1beta", "k").is_ok());
        assert!(GeminiClient::new("https://generativelanguage.googleapis.com/v1beta/", "k").is_ok());
        assert!(GeminiClient::new("http://127.0.0.1:8080", "k").is_ok());
        assert!(GeminiClient::new("http://127.0.0.1", "k").is_ok());

        assert!(GeminiClient::new("http://generativelanguage.googleapis.com", "k").is_err());
        assert!(GeminiClient::new("http://localhost:8080", "k").is_err());
        assert!(GeminiClient::new("ftp://example.com", "k").is_err());
        assert!(GeminiClient::new("https://", "k").is_err());

        // Harden against prefix-based bypasses.
        assert!(GeminiClient::new("http://127.0.0.1.evil.com:8080", "k").is_err());
        assert!(GeminiClient::new("http://127.0.0.1@evil.com:8080", "k").is_err());
        assert!(GeminiClient::new("http://127.0.0.1:", "k").is_err());
        assert!(GeminiClient::new("http://127.0.0.1:0", "k").is_err());
        assert!(GeminiClient::new("http://127.0.0.1:99999", "k").is_err());
    }

    #[test]
    fn rejects_blank_api_key() {
        let err = GeminiClient::new("https://generativelanguage.googleapis.com/v1beta", "  ")
            .expect_err("blank key");
        assert_eq!(err.code, "CONFIG_MISSING_API_KEY");
    }

    #[test]
    fn model_url_accepts_bare_or_qualified_names() {
        let c = GeminiClient::new("https://generativelanguage.googleapis.com/v1beta/", "k").expect("client");
        assert_eq!(
            c.model_url("gemini-2.5-flash", "generateContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            c.model_url("models/text-embedding-004", "embedContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/text-embedding-004:embedContent"
        );
    }

    #[test]
    fn debug_output_hides_api_key() {
        let c = GeminiClient::new("https://generativelanguage.googleapis.com/v1beta", "secret-key")
            .expect("client");
        assert!(!format!("{c:?}").contains("secret-key"));
    }
}
