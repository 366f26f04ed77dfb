//! OpenAI configuration

use serde::{Deserialize, Serialize};
use std::env;
use tqa_core::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Configuration for the OpenAI client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub embedding_model: String,
    pub chat_model: String,
    pub request_timeout_secs: u64,
}

impl OpenAiConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::Configuration("OPENAI_API_KEY environment variable not found".to_string())
            })?;

        let base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let embedding_model = env::var("TQA_EMBEDDING_MODEL")
            .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string());

        let chat_model =
            env::var("TQA_CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());

        let request_timeout_secs = match env::var("TQA_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                Error::Configuration(format!(
                    "TQA_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                ))
            })?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let config = Self {
            api_key,
            base_url,
            embedding_model,
            chat_model,
            request_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Check the base URL parses and the key is present
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Configuration("OpenAI API key is empty".to_string()));
        }
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            Error::Configuration(format!("invalid OpenAI base URL {:?}: {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "OpenAI base URL must be http(s), got {}",
                url.scheme()
            )));
        }
        Ok(())
    }

    /// Join an API path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = OpenAiConfig::new("sk-test".to_string()).with_base_url("http://localhost:8080/v1/");
        assert_eq!(config.endpoint("/embeddings"), "http://localhost:8080/v1/embeddings");
        assert_eq!(config.endpoint("chat/completions"), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = OpenAiConfig::new("sk-test".to_string()).with_base_url("not a url");
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        let config = OpenAiConfig::new("sk-test".to_string()).with_base_url("ftp://example.com");
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_blank_key() {
        let config = OpenAiConfig::new("   ".to_string());
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_defaults() {
        let config = OpenAiConfig::new("sk-test".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.embedding_model, "text-embedding-ada-002");
        assert_eq!(config.chat_model, "gpt-3.5-turbo");
    }
}
