//! Direct disease lookups, without generation.
//!
//! [`lookup_diseases`] matches the whole query phrase as a word against
//! disease names first; only if no name matches are descriptions and
//! symptoms searched.
//!
//! [`rank_by_symptoms`] takes a comma-separated symptom list and ranks
//! diseases by how many of those symptoms they list.

use medizap_core::record::DiseaseRecord;

use crate::scorer::contains_word;
use crate::store::KnowledgeStore;

/// Maximum number of records a lookup returns.
pub const DEFAULT_LOOKUP_LIMIT: usize = 5;

/// Find diseases matching `query`, in store order.
pub fn lookup_diseases<'a>(
    store: &'a KnowledgeStore,
    query: &str,
    limit: usize,
) -> Vec<&'a DiseaseRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let by_name: Vec<&DiseaseRecord> = store
        .diseases()
        .iter()
        .map(|d| &d.record)
        .filter(|d| contains_word(&d.disease.to_lowercase(), &needle))
        .take(limit)
        .collect();
    if !by_name.is_empty() {
        return by_name;
    }

    store
        .diseases()
        .iter()
        .map(|d| &d.record)
        .filter(|d| {
            contains_word(&d.description.to_lowercase(), &needle)
                || d
                    .symptoms
                    .iter()
                    .any(|s| contains_word(&s.to_lowercase(), &needle))
        })
        .take(limit)
        .collect()
}

/// A disease and how many of the requested symptoms it lists.
#[derive(Debug, Clone, Copy)]
pub struct SymptomMatch<'a> {
    pub record: &'a DiseaseRecord,
    pub match_count: usize,
}

/// Split `text` on commas into lowercased, deduplicated symptoms.
pub fn parse_symptoms(text: &str) -> Vec<String> {
    let mut symptoms: Vec<String> = Vec::new();
    for symptom in text.split(',').map(|s| s.trim().to_lowercase()) {
        if !symptom.is_empty() && !symptoms.contains(&symptom) {
            symptoms.push(symptom);
        }
    }
    symptoms
}

/// Rank diseases by the number of requested symptoms found, as whole words,
/// in their symptom lists.
///
/// Diseases matching none are left out. Ties are broken by disease name,
/// case-insensitively.
pub fn rank_by_symptoms<'a>(
    store: &'a KnowledgeStore,
    symptoms: &[String],
    limit: usize,
) -> Vec<SymptomMatch<'a>> {
    let mut matches: Vec<SymptomMatch<'a>> = store
        .diseases()
        .iter()
        .map(|d| {
            let listed: Vec<String> =
                d.record.symptoms.iter().map(|s| s.to_lowercase()).collect();
            let match_count = symptoms
                .iter()
                .filter(|wanted| listed.iter().any(|s| contains_word(s, wanted)))
                .count();
            SymptomMatch {
                record: &d.record,
                match_count,
            }
        })
        .filter(|m| m.match_count > 0)
        .collect();

    matches.sort_by(|a, b| {
        b.match_count.cmp(&a.match_count).then_with(|| {
            a.record
                .disease
                .to_lowercase()
                .cmp(&b.record.disease.to_lowercase())
        })
    });
    matches.truncate(limit);
    matches
}

/// "common cold" -> "Common Cold"
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = !c.is_alphanumeric();
        }
    }
    out
}

/// "HIGH fever" -> "High fever"
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> KnowledgeStore {
        KnowledgeStore::new(
            vec![
                DiseaseRecord {
                    disease: "Common Cold".into(),
                    description: "Viral infection of the nose and throat.".into(),
                    symptoms: vec!["sneezing".into(), "sore throat".into()],
                    medicines: vec![],
                },
                DiseaseRecord {
                    disease: "Strep Throat".into(),
                    description: "Bacterial infection causing a sore throat.".into(),
                    symptoms: vec!["fever".into()],
                    medicines: vec!["amoxicillin".into()],
                },
                DiseaseRecord {
                    disease: "Influenza".into(),
                    description: "Flu caused by influenza viruses.".into(),
                    symptoms: vec!["fever".into(), "cold sweats".into()],
                    medicines: vec![],
                },
            ],
            vec![],
        )
    }

    #[test]
    fn name_matches_take_priority() {
        let store = store();
        let found = lookup_diseases(&store, "throat", DEFAULT_LOOKUP_LIMIT);
        let names: Vec<_> = found.iter().map(|d| d.disease.as_str()).collect();
        assert_eq!(names, vec!["Strep Throat"]);
    }

    #[test]
    fn falls_back_to_description_and_symptoms() {
        let store = store();
        let found = lookup_diseases(&store, "Fever", DEFAULT_LOOKUP_LIMIT);
        let names: Vec<_> = found.iter().map(|d| d.disease.as_str()).collect();
        assert_eq!(names, vec!["Strep Throat", "Influenza"]);
    }

    #[test]
    fn whole_words_only() {
        let store = store();
        assert!(lookup_diseases(&store, "influ", DEFAULT_LOOKUP_LIMIT).is_empty());
    }

    #[test]
    fn respects_limit_and_blank_query() {
        let store = store();
        assert_eq!(lookup_diseases(&store, "infection", 1).len(), 1);
        assert!(lookup_diseases(&store, "   ", DEFAULT_LOOKUP_LIMIT).is_empty());
    }

    fn symptom_store() -> KnowledgeStore {
        let disease = |name: &str, symptoms: &[&str]| DiseaseRecord {
            disease: name.into(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            ..DiseaseRecord::default()
        };
        KnowledgeStore::new(
            vec![
                disease("Migraine", &["headache", "nausea"]),
                disease("Influenza", &["Fever", "cough", "headache"]),
                disease("Gastroenteritis", &["nausea", "fever", "diarrhea"]),
                disease("asthma", &["wheezing", "cough"]),
                disease("Common Cold", &["runny nose", "coughing"]),
            ],
            vec![],
        )
    }

    fn ranked(store: &KnowledgeStore, text: &str, limit: usize) -> Vec<(String, usize)> {
        rank_by_symptoms(store, &parse_symptoms(text), limit)
            .into_iter()
            .map(|m| (m.record.disease.clone(), m.match_count))
            .collect()
    }

    #[test]
    fn parse_symptoms_splits_on_commas() {
        assert_eq!(
            parse_symptoms(" Fever, sore throat ,,fever, "),
            vec!["fever", "sore throat"]
        );
        assert!(parse_symptoms(" , ").is_empty());
    }

    #[test]
    fn more_matching_symptoms_rank_first() {
        let store = symptom_store();
        assert_eq!(
            ranked(&store, "fever, headache", DEFAULT_LOOKUP_LIMIT),
            vec![
                ("Influenza".to_string(), 2),
                ("Gastroenteritis".to_string(), 1),
                ("Migraine".to_string(), 1),
            ]
        );
    }

    #[test]
    fn ties_are_ordered_by_name() {
        let store = symptom_store();
        // "coughing" is not a whole-word match for "cough".
        assert_eq!(
            ranked(&store, "cough", DEFAULT_LOOKUP_LIMIT),
            vec![("asthma".to_string(), 1), ("Influenza".to_string(), 1)]
        );
    }

    #[test]
    fn symptom_ranking_respects_limit() {
        let store = symptom_store();
        assert_eq!(ranked(&store, "nausea, fever, cough", 2).len(), 2);
        assert!(ranked(&store, "rash", DEFAULT_LOOKUP_LIMIT).is_empty());
        assert!(ranked(&store, "", DEFAULT_LOOKUP_LIMIT).is_empty());
    }

    #[test]
    fn casing_helpers() {
        assert_eq!(title_case("common cold"), "Common Cold");
        assert_eq!(title_case("HIV/AIDS"), "Hiv/Aids");
        assert_eq!(capitalize("HIGH fever"), "High fever");
        assert_eq!(capitalize(""), "");
    }
}
