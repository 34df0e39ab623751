//! The medical assistant: one question in, one grounded answer out.
//!
//! # Flow
//!
//! 1. Blank question → fixed apology, nothing else runs
//! 2. Retrieve the best-matching diseases and drugs
//! 3. Assemble the prompt around the rendered context
//! 4. Generate via the configured provider
//! 5. Trim surrounding whitespace and return

use std::sync::Arc;

use medizap_config::{AppConfig, GenerationConfig};
use medizap_core::provider::{CompletionRequest, Provider};
use medizap_retrieval::{KnowledgeStore, RetrievedCandidate, Retriever, Tokenizer};
use serde::Serialize;
use tracing::{debug, info};

/// Reply to an empty or whitespace-only question.
pub const APOLOGY: &str =
    "I'm sorry, I can't help without a question. Please tell me what's on your mind.";

/// Attached to every answer shown to a user.
pub const DISCLAIMER: &str = "This information is for general knowledge and informational purposes only, and does not constitute medical advice. Always consult a qualified healthcare professional for diagnosis and treatment.";

/// Result of answering one question.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// Generated text with surrounding whitespace removed, or the apology.
    pub text: String,
    /// Keywords extracted from the question.
    pub keywords: Vec<String>,
    /// Context the answer was grounded in. `None` when nothing was retrieved
    /// because the question was blank.
    pub context: Option<String>,
    /// Records that made it into the context, best first.
    pub candidates: Vec<RetrievedCandidate>,
}

impl Answer {
    fn apology() -> Self {
        Self {
            text: APOLOGY.to_string(),
            keywords: Vec::new(),
            context: None,
            candidates: Vec::new(),
        }
    }

    /// Whether the provider was consulted for this answer.
    pub fn was_generated(&self) -> bool {
        self.context.is_some()
    }
}

/// Retrieval-grounded question answering over the knowledge base.
pub struct MedicalAssistant {
    provider: Arc<dyn Provider>,
    model: String,
    generation: GenerationConfig,
    retriever: Retriever,
}

impl MedicalAssistant {
    /// Create an assistant with default generation and retrieval settings.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            generation: GenerationConfig::default(),
            retriever: Retriever::default(),
        }
    }

    /// Create an assistant with generation and retrieval settings from config.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        config: &AppConfig,
    ) -> Self {
        let retriever = Retriever::new(
            Tokenizer::new(config.retrieval.min_keyword_len),
            config.retrieval.top_n,
        );
        Self::new(provider, model)
            .with_generation(config.generation.clone())
            .with_retriever(retriever)
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_retriever(mut self, retriever: Retriever) -> Self {
        self.retriever = retriever;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answer `query` from `store`.
    ///
    /// A question with no usable keywords still reaches the provider with the
    /// "no information" context; only a blank question short-circuits.
    pub async fn answer(
        &self,
        store: &KnowledgeStore,
        query: &str,
    ) -> medizap_core::Result<Answer> {
        if query.trim().is_empty() {
            debug!("Blank question, replying with apology");
            return Ok(Answer::apology());
        }

        let (retrieval, prompt) = self.retriever.prompt(store, query);

        let request = CompletionRequest {
            model: self.model.clone(),
            prompt,
            temperature: self.generation.temperature,
            max_tokens: Some(self.generation.max_tokens),
            stop: self.generation.stop.clone(),
        };

        let response = self.provider.complete(request).await?;
        let text = response.text.trim().to_string();

        info!(
            provider = %self.provider.name(),
            model = %response.model,
            candidates = retrieval.candidates.len(),
            answer_len = text.len(),
            "Answer generated"
        );

        Ok(Answer {
            text,
            keywords: retrieval.keywords,
            context: Some(retrieval.context),
            candidates: retrieval.candidates,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
