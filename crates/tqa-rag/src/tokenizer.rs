//! Model-specific token counting backed by tiktoken

use std::fmt;

use tqa_core::{Error, Result};

/// Token counter for one model's BPE scheme
pub struct TokenCounter {
    model_id: String,
    bpe: tiktoken_rs::CoreBPE,
}

impl TokenCounter {
    /// Create a token counter for the given model.
    ///
    /// Fails with `UnknownModel` when tiktoken has no encoding for it; there is no
    /// fallback encoding because a wrong scheme miscounts the budget.
    pub fn for_model(model_id: &str) -> Result<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model_id)
            .map_err(|_| Error::UnknownModel(model_id.to_string()))?;
        Ok(Self {
            model_id: model_id.to_string(),
            bpe,
        })
    }

    /// Count the number of tokens in a string.
    ///
    /// Special-token markers such as `<|endoftext|>` count as the plain text the
    /// chat API sees them as.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

impl fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCounter")
            .field("model_id", &self.model_id)
            .finish_non_exhaustive()
    }
}

/// One-off count of `text` under `model_id`'s tokenizer
pub fn count_tokens(text: &str, model_id: &str) -> Result<usize> {
    Ok(TokenCounter::for_model(model_id)?.count(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_model_counts() {
        let counter = TokenCounter::for_model("gpt-3.5-turbo").unwrap();
        assert_eq!(counter.count(""), 0);
        assert_eq!(counter.count("hello world"), 2);
        assert_eq!(counter.model_id(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_special_token_markers_count_as_plain_text() {
        let counter = TokenCounter::for_model("gpt-3.5-turbo").unwrap();
        let text = "Passage quoting <|endoftext|> marker";
        let ordinary = counter.bpe.encode_ordinary(text).len();
        assert_eq!(counter.count(text), ordinary);
        assert!(counter.count(text) > counter.count("Passage quoting marker") + 1);
    }

    #[test]
    fn test_count_is_deterministic() {
        let text = "The MSc project thesis is due at the end of August.";
        let first = count_tokens(text, "gpt-4").unwrap();
        let second = count_tokens(text, "gpt-4").unwrap();
        assert_eq!(first, second);
        assert!(first > 0);
    }

    #[test]
    fn test_unknown_model() {
        let err = TokenCounter::for_model("definitely-not-a-model").unwrap_err();
        assert!(matches!(err, Error::UnknownModel(ref m) if m == "definitely-not-a-model"));
        assert!(!err.is_retryable());
    }
}
