//! Knowledge base records.
//!
//! Two shapes exist: diseases (built from the symptom/medicine sheet) and
//! drugs (built from the drug catalog export). Every field tolerates being
//! absent or `null` in the source file; it then takes its empty default.

use serde::{Deserialize, Deserializer, Serialize};

/// One entry of the disease knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    /// Canonical disease name
    #[serde(default, deserialize_with = "nullable")]
    pub disease: String,

    #[serde(default, deserialize_with = "nullable")]
    pub description: String,

    #[serde(default, deserialize_with = "nullable")]
    pub symptoms: Vec<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub medicines: Vec<String>,
}

impl DiseaseRecord {
    /// A record is usable when it has a non-blank name.
    pub fn is_valid(&self) -> bool {
        !self.disease.trim().is_empty()
    }
}

/// One entry of the drug knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    #[serde(default, deserialize_with = "nullable")]
    pub indication: String,

    #[serde(default, deserialize_with = "nullable")]
    pub category: String,

    /// Active ingredients, one per entry
    #[serde(default, deserialize_with = "nullable")]
    pub composition: Vec<DrugComposition>,

    #[serde(default, deserialize_with = "nullable")]
    pub side_effect: Vec<DrugSideEffect>,

    /// Dosage per population segment
    #[serde(default, deserialize_with = "nullable")]
    pub dose: Vec<DrugDose>,
}

impl DrugRecord {
    /// A record is usable when it has a non-blank name.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugComposition {
    #[serde(default, deserialize_with = "nullable")]
    pub composition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugSideEffect {
    #[serde(default, deserialize_with = "nullable")]
    pub side_effect: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugDose {
    /// Population segment, e.g. "Adult"
    #[serde(default, deserialize_with = "nullable")]
    pub profil: String,

    #[serde(default, deserialize_with = "nullable")]
    pub dose: String,
}

/// Treat an explicit `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disease_missing_lists_default_to_empty() {
        let rec: DiseaseRecord =
            serde_json::from_str(r#"{"disease":"Flu","description":"viral"}"#).unwrap();
        assert_eq!(rec.disease, "Flu");
        assert!(rec.symptoms.is_empty());
        assert!(rec.medicines.is_empty());
        assert!(rec.is_valid());
    }

    #[test]
    fn null_fields_are_tolerated() {
        let rec: DrugRecord = serde_json::from_str(
            r#"{"name":"Paracetamol","indication":null,"composition":null,"dose":[{"profil":"Adult","dose":null}]}"#,
        )
        .unwrap();
        assert_eq!(rec.indication, "");
        assert!(rec.composition.is_empty());
        assert_eq!(rec.dose[0].profil, "Adult");
        assert_eq!(rec.dose[0].dose, "");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let rec: DrugRecord = serde_json::from_str(
            r#"{"name":"Amoxicillin","price":[{"unit":"strip","price":"12000"}],"category":"antibiotic"}"#,
        )
        .unwrap();
        assert_eq!(rec.category, "antibiotic");
    }

    #[test]
    fn blank_name_is_invalid() {
        let rec = DrugRecord {
            name: "   ".into(),
            ..DrugRecord::default()
        };
        assert!(!rec.is_valid());
    }
}
