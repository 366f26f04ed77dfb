//! Retrieval-augmented generation pipeline for TQA
//!
//! Passages are loaded once into an immutable [`EmbeddingStore`], ranked by
//! cosine relatedness to a query, greedily packed into a token-budgeted prompt
//! and sent to a chat model by the [`AnswerSynthesizer`].

mod engine;
mod prompt;
pub mod ranker;
mod store;
pub mod tokenizer;


pub use engine::{AnswerSynthesizer, DEFAULT_CHAT_MODEL, DEFAULT_MAX_TOKENS, SynthesisConfig};
pub use prompt::{AssembledPrompt, PromptAssembler, PromptTemplate};
pub use ranker::{DIGEST_TOP_N, PROMPT_TOP_N, RankedResult, rank, rank_by_vector, relatedness};
pub use store::{CONTENT_COLUMN, EMBEDDING_COLUMN, EmbeddingStore, Passage, parse_embedding};
pub use tokenizer::{TokenCounter, count_tokens};

// Re-export core types for convenience
pub use tqa_core::{
    Answer, ChatProvider, EmbeddingProvider, Error, PromptBudget, RelevanceDigestEntry, Result,
};
