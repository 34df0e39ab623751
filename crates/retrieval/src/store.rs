//! Knowledge store: the in-memory disease and drug collections.
//!
//! A `KnowledgeStore` is built once (from JSON files or directly from
//! records) and never mutated. Each record is paired with its pre-built
//! [`FieldIndex`] so queries only compare keywords against lowercased text.
//!
//! [`SharedKnowledge`] holds the current store behind an `Arc`. Readers take
//! a snapshot; a reload installs a completely new store in one write, so a
//! query in flight keeps the store it started with.

use std::path::Path;
use std::sync::{Arc, RwLock};

use medizap_core::error::KnowledgeError;
use medizap_core::record::{DiseaseRecord, DrugRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::scorer::{FieldIndex, Scorable};

/// A record paired with its scoring index.
#[derive(Debug, Clone)]
pub struct Indexed<R> {
    pub record: R,
    pub index: FieldIndex,
}

impl<R: Scorable> Indexed<R> {
    fn new(record: R) -> Self {
        let index = record.field_index();
        Self { record, index }
    }
}

/// Immutable disease + drug knowledge base.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    diseases: Vec<Indexed<DiseaseRecord>>,
    drugs: Vec<Indexed<DrugRecord>>,
}

/// Record counts, reported by the status endpoints and CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub diseases: usize,
    pub drugs: usize,
}

impl KnowledgeStore {
    /// A store with no records. Every query against it yields the
    /// "no information" context.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from records, dropping any without a name.
    pub fn new(diseases: Vec<DiseaseRecord>, drugs: Vec<DrugRecord>) -> Self {
        let disease_total = diseases.len();
        let drug_total = drugs.len();

        let diseases: Vec<_> = diseases
            .into_iter()
            .filter(DiseaseRecord::is_valid)
            .map(Indexed::new)
            .collect();
        let drugs: Vec<_> = drugs
            .into_iter()
            .filter(DrugRecord::is_valid)
            .map(Indexed::new)
            .collect();

        let skipped = (disease_total - diseases.len()) + (drug_total - drugs.len());
        if skipped > 0 {
            warn!(skipped, "Skipping knowledge records without a name");
        }

        Self { diseases, drugs }
    }

    /// Load both collections from JSON files.
    ///
    /// A missing or malformed file is logged and treated as an empty
    /// collection; loading never fails.
    pub fn load(disease_path: &Path, drug_path: &Path) -> Self {
        let diseases = load_or_empty::<DiseaseRecord>(disease_path, "disease");
        let drugs = load_or_empty::<DrugRecord>(drug_path, "drug");
        let store = Self::new(diseases, drugs);
        let stats = store.stats();
        info!(
            diseases = stats.diseases,
            drugs = stats.drugs,
            "Knowledge base loaded"
        );
        store
    }

    /// Load both collections, failing on the first unreadable or malformed
    /// file. Used when a working store already exists and must be kept.
    pub fn try_load(disease_path: &Path, drug_path: &Path) -> Result<Self, KnowledgeError> {
        let diseases = load_records::<DiseaseRecord>(disease_path)?;
        let drugs = load_records::<DrugRecord>(drug_path)?;
        Ok(Self::new(diseases, drugs))
    }

    pub fn diseases(&self) -> &[Indexed<DiseaseRecord>] {
        &self.diseases
    }

    pub fn drugs(&self) -> &[Indexed<DrugRecord>] {
        &self.drugs
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            diseases: self.diseases.len(),
            drugs: self.drugs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diseases.is_empty() && self.drugs.is_empty()
    }
}

/// Read a JSON array of records from `path`.
pub fn load_records<R: DeserializeOwned>(path: &Path) -> Result<Vec<R>, KnowledgeError> {
    let content = std::fs::read_to_string(path).map_err(|e| KnowledgeError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| KnowledgeError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn load_or_empty<R: DeserializeOwned>(path: &Path, kind: &str) -> Vec<R> {
    match load_records(path) {
        Ok(records) => records,
        Err(e) => {
            warn!(kind, error = %e, "Knowledge base unavailable, continuing without it");
            Vec::new()
        }
    }
}

/// The process-wide knowledge store, swappable as a whole.
#[derive(Debug, Default)]
pub struct SharedKnowledge {
    current: RwLock<Arc<KnowledgeStore>>,
}

impl SharedKnowledge {
    pub fn new(store: KnowledgeStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// The store queries should run against right now.
    pub fn snapshot(&self) -> Arc<KnowledgeStore> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Install `store` for all subsequent snapshots.
    pub fn replace(&self, store: KnowledgeStore) {
        let store = Arc::new(store);
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = store;
    }
}
