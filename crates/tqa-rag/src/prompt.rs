//! Token-budgeted prompt assembly

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tqa_core::{PromptBudget, Result};

use crate::ranker::RankedResult;
use crate::tokenizer::TokenCounter;

const DEFAULT_REFUSAL: &str = "I'm sorry, I could not find an appropriate answer.";

/// Fixed framing text around the ranked passages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Instructions placed before any passage
    pub preamble: String,
    /// Title line of every passage block
    pub section_header: String,
    /// Phrase the preamble asks the model to use when the passages lack an answer
    pub refusal_phrase: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            preamble: format!(
                "Use the below articles on the QMUL Computer Science Msc Project Thesis Module \
                 to answer the subsequent question. If the answer cannot be found in the \
                 articles, write \"{DEFAULT_REFUSAL}\""
            ),
            section_header: "QMUL MSc Project Thesis Information section".to_string(),
            refusal_phrase: DEFAULT_REFUSAL.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Delimited block for one passage, appended after the preamble
    pub fn passage_block(&self, content: &str) -> String {
        format!("\n\n{}:\n\"\"\"\n{}\n\"\"\"", self.section_header, content)
    }

    /// Trailing question text
    pub fn question(&self, query: &str) -> String {
        format!("\n\nQuestion: {query}")
    }
}

/// Outcome of packing passages into a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub text: String,
    /// Leading ranked passages that made it in
    pub passages_included: usize,
    pub token_count: usize,
}

/// Greedy packer of ranked passages under a token budget
#[derive(Debug, Clone, Default)]
pub struct PromptAssembler {
    template: PromptTemplate,
}

impl PromptAssembler {
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Assemble a prompt measured under `budget.model_id`'s tokenizer
    pub fn assemble(
        &self,
        query: &str,
        ranked: &[RankedResult<'_>],
        budget: &PromptBudget,
    ) -> Result<String> {
        let counter = TokenCounter::for_model(&budget.model_id)?;
        Ok(self
            .assemble_with_counter(query, ranked, &counter, budget.max_tokens)
            .text)
    }

    /// Append whole passages in rank order until the next one would push the
    /// measured prompt over `max_tokens`, then stop.
    ///
    /// If preamble and question alone are over budget, that minimal prompt is
    /// returned with no passages.
    pub fn assemble_with_counter(
        &self,
        query: &str,
        ranked: &[RankedResult<'_>],
        counter: &TokenCounter,
        max_tokens: usize,
    ) -> AssembledPrompt {
        let question = self.template.question(query);
        let mut message = self.template.preamble.clone();
        let mut token_count = counter.count(&format!("{message}{question}"));
        let mut passages_included = 0;

        if token_count > max_tokens {
            warn!(
                token_count,
                max_tokens,
                model = counter.model_id(),
                "preamble and question exceed the token budget; sending without passages"
            );
        } else {
            for result in ranked {
                let block = self.template.passage_block(&result.passage.content);
                let candidate = format!("{message}{block}{question}");
                let candidate_tokens = counter.count(&candidate);
                if candidate_tokens > max_tokens {
                    break;
                }
                message.push_str(&block);
                token_count = candidate_tokens;
                passages_included += 1;
            }
        }

        debug!(
            passages_included,
            candidates = ranked.len(),
            token_count,
            max_tokens,
            "assembled prompt"
        );

        message.push_str(&question);
        AssembledPrompt {
            text: message,
            passages_included,
            token_count,
        }
    }
}
