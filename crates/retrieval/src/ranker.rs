//! Candidate scoring and top-N selection.

use medizap_core::record::{DiseaseRecord, DrugRecord};
use serde::Serialize;

use crate::store::KnowledgeStore;

/// Default number of records placed in the prompt context.
pub const DEFAULT_TOP_N: usize = 3;

/// Which knowledge base a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Disease,
    Drug,
}

/// A record that matched the query, borrowed from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate<'a> {
    Disease(&'a DiseaseRecord),
    Drug(&'a DrugRecord),
}

impl Candidate<'_> {
    pub fn kind(&self) -> CandidateKind {
        match self {
            Candidate::Disease(_) => CandidateKind::Disease,
            Candidate::Drug(_) => CandidateKind::Drug,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Candidate::Disease(d) => &d.disease,
            Candidate::Drug(d) => &d.name,
        }
    }
}

/// A candidate with its relevance for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredCandidate<'a> {
    pub candidate: Candidate<'a>,
    pub score: u32,
}

/// Score every record in the store. Zero-scored records are left out.
///
/// Output order is store order, diseases first, which is what ties fall
/// back to after ranking.
pub fn score_all<'a>(store: &'a KnowledgeStore, keywords: &[String]) -> Vec<ScoredCandidate<'a>> {
    let diseases = store.diseases().iter().map(|d| ScoredCandidate {
        candidate: Candidate::Disease(&d.record),
        score: d.index.score(keywords),
    });
    let drugs = store.drugs().iter().map(|d| ScoredCandidate {
        candidate: Candidate::Drug(&d.record),
        score: d.index.score(keywords),
    });

    diseases.chain(drugs).filter(|c| c.score > 0).collect()
}

/// Order candidates by descending score and keep the first `top_n`.
///
/// The sort is stable, so equal scores keep their incoming order.
pub fn select_top(
    mut candidates: Vec<ScoredCandidate<'_>>,
    top_n: usize,
) -> Vec<ScoredCandidate<'_>> {
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(top_n);
    candidates
}
