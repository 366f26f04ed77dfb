//! Error types for the thesis Q&A pipeline

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the retrieval-augmented generation pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// The embedding snapshot is missing or malformed. Fatal at startup.
    #[error("Corpus load error: {0}")]
    CorpusLoad(String),

    /// No tokenization scheme is known for the model identifier.
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Embedding store is empty")]
    EmptyStore,

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the failure originated at a provider and may succeed on retry.
    ///
    /// Configuration and corpus failures will fail again with the same inputs.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::EmbeddingService(_) | Error::Synthesis(_) | Error::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_errors_are_retryable() {
        assert!(Error::EmbeddingService("503".to_string()).is_retryable());
        assert!(Error::Synthesis("quota".to_string()).is_retryable());
        assert!(Error::Timeout("30s".to_string()).is_retryable());
    }

    #[test]
    fn test_configuration_errors_are_not_retryable() {
        assert!(!Error::CorpusLoad("row 3".to_string()).is_retryable());
        assert!(!Error::UnknownModel("llama".to_string()).is_retryable());
        assert!(!Error::EmptyStore.is_retryable());
        assert!(!Error::Configuration("OPENAI_API_KEY".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(Error::EmptyStore.to_string(), "Embedding store is empty");
        assert_eq!(
            Error::UnknownModel("foo".to_string()).to_string(),
            "Unknown model: foo"
        );
    }
}
