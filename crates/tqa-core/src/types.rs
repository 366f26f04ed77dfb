//! Common types used across the thesis Q&A pipeline

use serde::{Deserialize, Serialize};

/// Relatedness at or above which a digest entry is flagged relevant
pub const RELEVANCE_THRESHOLD: f64 = 0.8;

/// Token budget for an assembled prompt, measured under `model_id`'s tokenizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptBudget {
    pub model_id: String,
    pub max_tokens: usize,
}

impl PromptBudget {
    pub fn new(model_id: impl Into<String>, max_tokens: usize) -> Self {
        Self {
            model_id: model_id.into(),
            max_tokens,
        }
    }
}

/// One passage of the relevance digest returned alongside an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceDigestEntry {
    pub chunk: String,
    pub relatedness: f64,
    pub is_relevant: bool,
}

impl RelevanceDigestEntry {
    /// Flag the entry against `threshold` (inclusive)
    pub fn new(chunk: impl Into<String>, relatedness: f64, threshold: f64) -> Self {
        Self {
            chunk: chunk.into(),
            relatedness,
            is_relevant: relatedness >= threshold,
        }
    }
}

/// Final output of the pipeline for one question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Model output, passed through verbatim
    pub text: String,
    pub digest: Vec<RelevanceDigestEntry>,
    /// The user prompt that was sent to the model
    pub prompt: String,
}

impl Answer {
    /// Display heuristic: does the answer contain the refusal phrase the prompt asked for?
    ///
    /// The model is not obliged to use the phrase, so a `false` here proves nothing.
    pub fn looks_like_refusal(&self, phrase: &str) -> bool {
        !phrase.is_empty() && self.text.contains(phrase)
    }

    /// Number of digest entries at or above the relevance threshold
    pub fn relevant_count(&self) -> usize {
        self.digest.iter().filter(|entry| entry.is_relevant).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_threshold_is_inclusive() {
        assert!(RelevanceDigestEntry::new("a", 0.8, RELEVANCE_THRESHOLD).is_relevant);
        assert!(RelevanceDigestEntry::new("b", 0.95, RELEVANCE_THRESHOLD).is_relevant);
        assert!(!RelevanceDigestEntry::new("c", 0.7999, RELEVANCE_THRESHOLD).is_relevant);
        assert!(!RelevanceDigestEntry::new("d", -0.2, RELEVANCE_THRESHOLD).is_relevant);
    }

    #[test]
    fn test_refusal_heuristic() {
        let answer = Answer {
            text: "I'm sorry, I could not find an appropriate answer.".to_string(),
            digest: Vec::new(),
            prompt: String::new(),
        };
        assert!(answer.looks_like_refusal("I'm sorry, I could not find an appropriate answer."));
        assert!(!answer.looks_like_refusal(""));
    }

    #[test]
    fn test_relevant_count() {
        let answer = Answer {
            text: "ok".to_string(),
            digest: vec![
                RelevanceDigestEntry::new("a", 0.9, RELEVANCE_THRESHOLD),
                RelevanceDigestEntry::new("b", 0.5, RELEVANCE_THRESHOLD),
            ],
            prompt: String::new(),
        };
        assert_eq!(answer.relevant_count(), 1);
    }
}
