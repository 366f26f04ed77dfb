//! OpenAI integration for TQA
//!
//! This crate provides the OpenAI implementation of the `EmbeddingProvider` and
//! `ChatProvider` traits.

mod client;
mod config;

#[cfg(test)]
mod tests;

pub use client::OpenAiClient;
pub use config::{
    DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS,
    OpenAiConfig,
};

// Re-export core types for convenience
pub use tqa_core::{ChatMessage, ChatProvider, ChatRequest, EmbeddingProvider, Error, Result};
