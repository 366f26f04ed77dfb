//! Core traits and types for TQA (thesis Q&A)
//!
//! This crate defines the error taxonomy, the provider traits for embedding and
//! chat completion, and the value types passed between pipeline stages.

pub mod error;
pub mod llm;
pub mod types;

pub use error::{Error, Result};
pub use llm::{ChatMessage, ChatProvider, ChatRequest, EmbeddingProvider, Role};
pub use types::*;
