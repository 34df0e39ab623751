//! The query pipeline: tokenize → score → rank → format → assemble.
//!
//! Pure and synchronous. The store is only read, so any number of queries
//! can run against the same snapshot at once.

use serde::Serialize;
use tracing::debug;

use crate::context::{NO_INFORMATION, format_context};
use crate::prompt::assemble_prompt;
use crate::ranker::{CandidateKind, DEFAULT_TOP_N, score_all, select_top};
use crate::store::KnowledgeStore;
use crate::tokenizer::Tokenizer;

/// Summary of a selected record, detached from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievedCandidate {
    pub kind: CandidateKind,
    pub name: String,
    pub score: u32,
}

/// Everything retrieval produced for one query.
#[derive(Debug, Clone, Serialize)]
pub struct Retrieval {
    pub keywords: Vec<String>,
    pub candidates: Vec<RetrievedCandidate>,
    pub context: String,
}

impl Retrieval {
    /// Whether the context is the "no information" sentinel.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Keyword retriever with a fixed tokenizer and result bound.
#[derive(Debug, Clone, Copy)]
pub struct Retriever {
    tokenizer: Tokenizer,
    top_n: usize,
}

impl Retriever {
    pub fn new(tokenizer: Tokenizer, top_n: usize) -> Self {
        Self { tokenizer, top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Find the best-matching records for `query` and render the context.
    pub fn retrieve(&self, store: &KnowledgeStore, query: &str) -> Retrieval {
        let keywords = self.tokenizer.tokenize(query);
        if keywords.is_empty() {
            debug!("No usable keywords in query, skipping scoring");
            return Retrieval {
                keywords,
                candidates: Vec::new(),
                context: NO_INFORMATION.to_string(),
            };
        }

        let scored = score_all(store, &keywords);
        let matched = scored.len();
        let top = select_top(scored, self.top_n);

        debug!(
            keywords = keywords.len(),
            matched,
            selected = top.len(),
            "Knowledge retrieval complete"
        );

        let context = format_context(&top);
        let candidates = top
            .iter()
            .map(|c| RetrievedCandidate {
                kind: c.candidate.kind(),
                name: c.candidate.name().to_string(),
                score: c.score,
            })
            .collect();

        Retrieval {
            keywords,
            candidates,
            context,
        }
    }

    /// Retrieve, then wrap the context and raw query into the outbound prompt.
    pub fn prompt(&self, store: &KnowledgeStore, query: &str) -> (Retrieval, String) {
        let retrieval = self.retrieve(store, query);
        let prompt = assemble_prompt(&retrieval.context, query);
        (retrieval, prompt)
    }
}

impl Default for Retriever {
    fn default() -> Self {
        Self::new(Tokenizer::default(), DEFAULT_TOP_N)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medizap_core::record::{DiseaseRecord, DrugRecord};

    fn scenario_store() -> KnowledgeStore {
        KnowledgeStore::new(
            vec![DiseaseRecord {
                disease: "flu".into(),
                description: String::new(),
                symptoms: vec!["fever".into(), "cough".into()],
                medicines: vec!["paracetamol".into()],
            }],
            vec![DrugRecord {
                name: "Paracetamol".into(),
                indication: "fever and pain".into(),
                category: "analgesic".into(),
                ..DrugRecord::default()
            }],
        )
    }

    #[test]
    fn fever_and_cough_scenario() {
        let retrieval = Retriever::default().retrieve(&scenario_store(), "fever and cough");

        assert_eq!(retrieval.keywords, vec!["fever", "cough"]);
        assert_eq!(
            retrieval.candidates,
            vec![
                RetrievedCandidate {
                    kind: CandidateKind::Disease,
                    name: "flu".into(),
                    score: 4,
                },
                RetrievedCandidate {
                    kind: CandidateKind::Drug,
                    name: "Paracetamol".into(),
                    score: 3,
                },
            ]
        );
        assert!(retrieval.context.starts_with("Type: Disease Information\nDisease: flu\n"));
        assert!(retrieval.context.contains("\n\n---\n\nType: Drug Information\n"));
    }

    #[test]
    fn empty_query_touches_nothing() {
        let retrieval = Retriever::default().retrieve(&scenario_store(), "");
        assert!(retrieval.keywords.is_empty());
        assert!(retrieval.is_empty());
        assert_eq!(retrieval.context, NO_INFORMATION);
    }

    #[test]
    fn empty_store_always_gives_sentinel() {
        let store = KnowledgeStore::empty();
        for q in ["fever and cough", "paracetamol dosage", "what is diabetes"] {
            let retrieval = Retriever::default().retrieve(&store, q);
            assert_eq!(
                retrieval.context,
                "No specific information found in the knowledge base."
            );
        }
    }

    #[test]
    fn unmatched_query_gives_sentinel() {
        let retrieval = Retriever::default().retrieve(&scenario_store(), "broken ankle");
        assert_eq!(retrieval.context, NO_INFORMATION);
    }

    #[test]
    fn at_most_top_n_blocks() {
        let diseases = (0..8)
            .map(|i| DiseaseRecord {
                disease: format!("Rash variant {i}"),
                symptoms: vec!["rash".into()],
                ..DiseaseRecord::default()
            })
            .collect();
        let store = KnowledgeStore::new(diseases, vec![]);

        let retrieval = Retriever::default().retrieve(&store, "rash");
        assert_eq!(retrieval.candidates.len(), 3);
        assert_eq!(retrieval.context.matches("Type: Disease Information").count(), 3);

        let narrow = Retriever::new(Tokenizer::default(), 2).retrieve(&store, "rash");
        assert_eq!(narrow.candidates.len(), 2);
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let store = scenario_store();
        let retriever = Retriever::default();
        let (first_retrieval, first_prompt) = retriever.prompt(&store, "Fever, cough; pain");
        for _ in 0..5 {
            let (retrieval, prompt) = retriever.prompt(&store, "Fever, cough; pain");
            assert_eq!(retrieval.context, first_retrieval.context);
            assert_eq!(prompt, first_prompt);
        }
    }

    #[test]
    fn prompt_embeds_context_and_raw_query() {
        let (retrieval, prompt) = Retriever::default().prompt(&scenario_store(), "Fever and cough");
        assert!(prompt.contains(&retrieval.context));
        assert!(prompt.contains("User question: Fever and cough\n"));
    }
}
