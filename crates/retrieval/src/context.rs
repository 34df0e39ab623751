//! Context formatter: renders ranked candidates into the prompt's
//! CONTEXT section.
//!
//! Every block has a fixed set of labeled lines in a fixed order. Empty
//! fields render as `N/A`; lines are never omitted.

use medizap_core::record::{DiseaseRecord, DrugRecord};

use crate::ranker::{Candidate, ScoredCandidate};

/// Context used when nothing in the knowledge base matched.
pub const NO_INFORMATION: &str = "No specific information found in the knowledge base.";

/// Separator between candidate blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

const NOT_AVAILABLE: &str = "N/A";

/// Render candidates in the order given.
pub fn format_context(candidates: &[ScoredCandidate<'_>]) -> String {
    if candidates.is_empty() {
        return NO_INFORMATION.to_string();
    }

    candidates
        .iter()
        .map(|c| match c.candidate {
            Candidate::Disease(d) => render_disease(d),
            Candidate::Drug(d) => render_drug(d),
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

fn render_disease(d: &DiseaseRecord) -> String {
    format!(
        "Type: Disease Information\n\
         Disease: {}\n\
         Description: {}\n\
         Symptoms: {}\n\
         Common Medicines: {}",
        or_na(&d.disease),
        or_na(&d.description),
        join_or_na(d.symptoms.iter().map(String::as_str)),
        join_or_na(d.medicines.iter().map(String::as_str)),
    )
}

fn render_drug(d: &DrugRecord) -> String {
    let dosage: Vec<String> = d
        .dose
        .iter()
        .filter(|dose| !dose.profil.trim().is_empty() || !dose.dose.trim().is_empty())
        .map(|dose| format!("{}: {}", or_na(&dose.profil), or_na(&dose.dose)))
        .collect();

    format!(
        "Type: Drug Information\n\
         Drug Name: {}\n\
         Indication: {}\n\
         Composition: {}\n\
         Side Effects: {}\n\
         Dosage: {}",
        or_na(&d.name),
        or_na(&d.indication),
        join_or_na(d.composition.iter().map(|c| c.composition.as_str())),
        join_or_na(d.side_effect.iter().map(|s| s.side_effect.as_str())),
        join_or_na(dosage.iter().map(String::as_str)),
    )
}

fn or_na(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE
    } else {
        trimmed
    }
}

fn join_or_na<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let parts: Vec<&str> = values.map(str::trim).filter(|v| !v.is_empty()).collect();
    if parts.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        parts.join(", ")
    }
}
