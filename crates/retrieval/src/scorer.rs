//! Weighted multi-field relevance scoring.
//!
//! Each record kind declares a table of fields with fixed weights. A keyword
//! earns a plain field's weight at most once, however many of the field's
//! values contain it. Symptoms are the exception: every symptom is scored on
//! its own and the hits add up. Fields are additive. Field values are
//! lowercased once when the index is built, never per keyword.
//!
//! | kind    | field                  | weight |
//! |---------|------------------------|--------|
//! | disease | name                   | 3      |
//! | disease | symptom (whole word)   | 2 per symptom |
//! | disease | symptom (substring)    | 1 per symptom |
//! | drug    | name                   | 5      |
//! | drug    | dose ("profil dose")   | 4      |
//! | drug    | indication             | 3      |
//! | drug    | composition            | 2      |
//! | drug    | side effect            | 1      |
//! | drug    | category               | 1      |

use medizap_core::record::{DiseaseRecord, DrugRecord};

pub const DISEASE_NAME_WEIGHT: u32 = 3;
pub const SYMPTOM_WORD_WEIGHT: u32 = 2;
pub const SYMPTOM_SUBSTRING_WEIGHT: u32 = 1;

pub const DRUG_NAME_WEIGHT: u32 = 5;
pub const DRUG_DOSE_WEIGHT: u32 = 4;
pub const DRUG_INDICATION_WEIGHT: u32 = 3;
pub const DRUG_COMPOSITION_WEIGHT: u32 = 2;
pub const DRUG_SIDE_EFFECT_WEIGHT: u32 = 1;
pub const DRUG_CATEGORY_WEIGHT: u32 = 1;

/// How a keyword is matched against a field's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Substring containment in any value earns the field weight once.
    Substring,
    /// Every value is scored separately and the results are summed. A
    /// whole-word hit earns `word_weight` instead of the field weight for
    /// that value; a plain substring hit earns the field weight.
    WholeWordPreferred { word_weight: u32 },
}

/// One searchable field of a record, pre-normalized.
#[derive(Debug, Clone)]
struct IndexedField {
    values: Vec<String>,
    weight: u32,
    rule: MatchRule,
}

impl IndexedField {
    fn score(&self, keyword: &str) -> u32 {
        match self.rule {
            MatchRule::Substring => {
                if self.values.iter().any(|v| v.contains(keyword)) {
                    self.weight
                } else {
                    0
                }
            }
            MatchRule::WholeWordPreferred { word_weight } => self
                .values
                .iter()
                .map(|v| {
                    if contains_word(v, keyword) {
                        word_weight
                    } else if v.contains(keyword) {
                        self.weight
                    } else {
                        0
                    }
                })
                .sum(),
        }
    }
}

/// Normalized, weighted view of one record, built once at load time.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    fields: Vec<IndexedField>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Values are lowercased here; blank values are skipped.
    pub fn field<I, S>(mut self, values: I, weight: u32, rule: MatchRule) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_lowercase())
            .filter(|v| !v.is_empty())
            .collect();
        self.fields.push(IndexedField {
            values,
            weight,
            rule,
        });
        self
    }

    /// Total score of the record against already-normalized keywords.
    pub fn score(&self, keywords: &[String]) -> u32 {
        keywords
            .iter()
            .map(|k| self.fields.iter().map(|f| f.score(k)).sum::<u32>())
            .sum()
    }
}

/// A record kind that can be ranked against keywords.
pub trait Scorable {
    /// Build the weighted field table for this record.
    fn field_index(&self) -> FieldIndex;
}

impl Scorable for DiseaseRecord {
    fn field_index(&self) -> FieldIndex {
        FieldIndex::new()
            .field([&self.disease], DISEASE_NAME_WEIGHT, MatchRule::Substring)
            .field(
                &self.symptoms,
                SYMPTOM_SUBSTRING_WEIGHT,
                MatchRule::WholeWordPreferred {
                    word_weight: SYMPTOM_WORD_WEIGHT,
                },
            )
    }
}

impl Scorable for DrugRecord {
    fn field_index(&self) -> FieldIndex {
        FieldIndex::new()
            .field([&self.name], DRUG_NAME_WEIGHT, MatchRule::Substring)
            .field(
                self.dose.iter().map(|d| format!("{} {}", d.profil, d.dose)),
                DRUG_DOSE_WEIGHT,
                MatchRule::Substring,
            )
            .field(
                [&self.indication],
                DRUG_INDICATION_WEIGHT,
                MatchRule::Substring,
            )
            .field(
                self.composition.iter().map(|c| &c.composition),
                DRUG_COMPOSITION_WEIGHT,
                MatchRule::Substring,
            )
            .field(
                self.side_effect.iter().map(|s| &s.side_effect),
                DRUG_SIDE_EFFECT_WEIGHT,
                MatchRule::Substring,
            )
            .field([&self.category], DRUG_CATEGORY_WEIGHT, MatchRule::Substring)
    }
}

/// Whether `needle` occurs in `haystack` bounded by non-alphanumeric
/// characters (or the ends of the string) on both sides.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
