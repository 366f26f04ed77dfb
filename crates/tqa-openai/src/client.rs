//! OpenAI client implementation

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use tqa_core::{ChatMessage, ChatProvider, ChatRequest, EmbeddingProvider, Error, Result};

use crate::config::OpenAiConfig;

/// OpenAI client, serving both the embedding and the chat completion endpoints
pub struct OpenAiClient {
    config: OpenAiConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmbeddingRequest<'a> {
    pub(crate) model: &'a str,
    pub(crate) input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
    pub(crate) model: &'a str,
    pub(crate) messages: &'a [ChatMessage],
    pub(crate) temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Model constants
    pub const TEXT_EMBEDDING_ADA_002: &'static str = "text-embedding-ada-002";
    pub const GPT_3_5_TURBO: &'static str = "gpt-3.5-turbo";

    /// Create a new OpenAI client from configuration
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| Error::Configuration("invalid OpenAI API key".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create a new OpenAI client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = OpenAiConfig::from_env()?;
        Self::new(config)
    }

    /// Get the default chat model from configuration
    pub fn chat_model(&self) -> &str {
        &self.config.chat_model
    }

    /// POST a JSON body and return the response text, or a message describing the failure
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> std::result::Result<String, String> {
        let url = self.config.endpoint(path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    format!("request to {url} timed out")
                } else {
                    format!("request to {url} failed: {e}")
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| format!("failed to read response body: {e}"))?;

        if !status.is_success() {
            return Err(format!("OpenAI API request failed with status {status}: {text}"));
        }

        Ok(text)
    }
}

/// Extract the single embedding vector from an embeddings response body
pub(crate) fn parse_embedding_response(body: &str) -> Result<Vec<f64>> {
    let parsed: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| Error::EmbeddingService(format!("malformed embedding response: {e}")))?;

    let embedding = parsed
        .data
        .into_iter()
        .next()
        .map(|data| data.embedding)
        .ok_or_else(|| Error::EmbeddingService("embedding response has no data".to_string()))?;

    if embedding.is_empty() {
        return Err(Error::EmbeddingService("embedding response vector is empty".to_string()));
    }

    Ok(embedding)
}

/// Extract the first choice's message content from a chat completion response body
pub(crate) fn parse_completion_response(body: &str) -> Result<String> {
    let parsed: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| Error::Synthesis(format!("malformed completion response: {e}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| Error::Synthesis("completion response has no message content".to_string()))
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, input: &str) -> Result<Vec<f64>> {
        let request = EmbeddingRequest {
            model: &self.config.embedding_model,
            input,
        };

        let started = Instant::now();
        let body = self
            .post_json("embeddings", &request)
            .await
            .map_err(Error::EmbeddingService)?;
        let embedding = parse_embedding_response(&body)?;

        debug!(
            model = %self.config.embedding_model,
            dimension = embedding.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "embedding request completed"
        );

        Ok(embedding)
    }

    fn embedding_model(&self) -> &str {
        &self.config.embedding_model
    }
}

#[async_trait]
impl ChatProvider for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let body = CompletionRequest {
            model: &request.model_id,
            messages: &request.messages,
            temperature: request.temperature,
        };

        let started = Instant::now();
        let text = self
            .post_json("chat/completions", &body)
            .await
            .map_err(Error::Synthesis)?;
        let answer = parse_completion_response(&text)?;

        debug!(
            model = %request.model_id,
            answer_chars = answer.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chat completion completed"
        );

        Ok(answer)
    }
}
