//! Keyword retrieval over the Medizap knowledge base.
//!
//! Turns a free-text medical question into the prompt sent to the
//! generation backend:
//!
//! 1. [`tokenizer`]: lowercase, split, drop short words, deduplicate
//! 2. [`scorer`]: weighted per-field matching for diseases and drugs
//! 3. [`ranker`]: descending score, store order on ties, top-N
//! 4. [`context`]: fixed labeled blocks, or the "no information" sentinel
//! 5. [`prompt`]: instruction + context + question template
//!
//! [`lookup`] holds the direct searches that skip generation: disease name
//! lookup and ranking diseases by a list of symptoms.

pub mod context;
pub mod lookup;
pub mod pipeline;
pub mod prompt;
pub mod ranker;
pub mod scorer;
pub mod store;
pub mod tokenizer;

pub use context::{NO_INFORMATION, format_context};
pub use lookup::{
    DEFAULT_LOOKUP_LIMIT, SymptomMatch, lookup_diseases, parse_symptoms, rank_by_symptoms,
};
pub use pipeline::{RetrievedCandidate, Retrieval, Retriever};
pub use prompt::{SYSTEM_INSTRUCTION, assemble_prompt};
pub use ranker::{Candidate, CandidateKind, ScoredCandidate};
pub use store::{KnowledgeStore, SharedKnowledge, StoreStats};
pub use tokenizer::Tokenizer;
