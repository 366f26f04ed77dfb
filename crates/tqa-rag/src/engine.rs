//! Answer synthesis: rank, assemble, generate

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use tqa_core::{
    Answer, ChatMessage, ChatProvider, ChatRequest, EmbeddingProvider, Error, PromptBudget,
    RELEVANCE_THRESHOLD, RelevanceDigestEntry, Result,
};

use crate::prompt::{PromptAssembler, PromptTemplate};
use crate::ranker::{self, DIGEST_TOP_N, PROMPT_TOP_N, RankedResult};
use crate::store::EmbeddingStore;
use crate::tokenizer::TokenCounter;

/// Default generation model
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
/// Default prompt budget: a 4096-token context minus 500 reserved for the answer
pub const DEFAULT_MAX_TOKENS: usize = 4096 - 500;

/// Configuration for answer synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    pub chat_model: String,
    pub max_tokens: usize,
    pub prompt_top_n: usize,
    pub digest_top_n: usize,
    pub relevance_threshold: f64,
    pub system_message: String,
    /// Upper bound on one whole `answer` call; `None` waits indefinitely
    pub timeout: Option<Duration>,
    pub template: PromptTemplate,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            prompt_top_n: PROMPT_TOP_N,
            digest_top_n: DIGEST_TOP_N,
            relevance_threshold: RELEVANCE_THRESHOLD,
            system_message: "You answer questions about the QMUL MSc Project Thesis.".to_string(),
            timeout: None,
            template: PromptTemplate::default(),
        }
    }
}

impl SynthesisConfig {
    pub fn budget(&self) -> PromptBudget {
        PromptBudget::new(self.chat_model.clone(), self.max_tokens)
    }
}

/// Retrieval-augmented answer synthesizer over an immutable store
pub struct AnswerSynthesizer<E: EmbeddingProvider, C: ChatProvider> {
    store: Arc<EmbeddingStore>,
    embedder: Arc<E>,
    chat: Arc<C>,
    assembler: PromptAssembler,
    counter: TokenCounter,
    config: SynthesisConfig,
}

impl<E: EmbeddingProvider, C: ChatProvider> AnswerSynthesizer<E, C> {
    /// Create a new synthesizer.
    ///
    /// Fails with `UnknownModel` if the configured chat model has no tokenizer.
    pub fn new(
        store: Arc<EmbeddingStore>,
        embedder: Arc<E>,
        chat: Arc<C>,
        config: SynthesisConfig,
    ) -> Result<Self> {
        let counter = TokenCounter::for_model(&config.chat_model)?;
        let assembler = PromptAssembler::new(config.template.clone());

        Ok(Self {
            store,
            embedder,
            chat,
            assembler,
            counter,
            config,
        })
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }

    /// Answer with the configured model and budget
    pub async fn answer(&self, query: &str) -> Result<Answer> {
        let budget = self.config.budget();
        self.answer_with_budget(query, &budget).await
    }

    /// Answer with an explicit model and token budget
    pub async fn answer_with_budget(&self, query: &str, budget: &PromptBudget) -> Result<Answer> {
        match self.config.timeout {
            Some(bound) => tokio::time::timeout(bound, self.run(query, budget))
                .await
                .map_err(|_| Error::Timeout(format!("no answer within {bound:?}")))?,
            None => self.run(query, budget).await,
        }
    }

    async fn run(&self, query: &str, budget: &PromptBudget) -> Result<Answer> {
        let store = self.store.as_ref();
        let embedder = self.embedder.as_ref();

        // Independent rankings: one feeds the prompt, the other the digest.
        let (prompt_ranking, digest_ranking) = futures::try_join!(
            ranker::rank(embedder, query, store, self.config.prompt_top_n),
            ranker::rank(embedder, query, store, self.config.digest_top_n)
        )?;

        let other_counter;
        let counter = if budget.model_id == self.counter.model_id() {
            &self.counter
        } else {
            other_counter = TokenCounter::for_model(&budget.model_id)?;
            &other_counter
        };

        let prompt =
            self.assembler
                .assemble_with_counter(query, &prompt_ranking, counter, budget.max_tokens);

        let request = ChatRequest::deterministic(
            budget.model_id.clone(),
            vec![
                ChatMessage::system(self.config.system_message.clone()),
                ChatMessage::user(prompt.text.clone()),
            ],
        );
        let text = self.chat.complete(&request).await?;

        let digest = self.digest(&digest_ranking);
        info!(
            model = %budget.model_id,
            passages_in_prompt = prompt.passages_included,
            prompt_tokens = prompt.token_count,
            relevant = digest.iter().filter(|entry| entry.is_relevant).count(),
            "answered query"
        );

        Ok(Answer {
            text,
            digest,
            prompt: prompt.text,
        })
    }

    /// Annotate ranked passages with the relevance flag
    pub fn digest(&self, ranked: &[RankedResult<'_>]) -> Vec<RelevanceDigestEntry> {
        let digest: Vec<RelevanceDigestEntry> = ranked
            .iter()
            .map(|r| {
                RelevanceDigestEntry::new(
                    r.passage.content.clone(),
                    r.relatedness,
                    self.config.relevance_threshold,
                )
            })
            .collect();
        debug!(entries = digest.len(), "built relevance digest");
        digest
    }
}
