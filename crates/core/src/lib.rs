//! # Medizap Core
//!
//! Domain types, traits, and error definitions for the Medizap medical
//! assistant. This crate has **zero framework dependencies**: it defines
//! the knowledge records and the generation boundary that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! The generation backend is a trait here; implementations live in
//! `medizap-providers`. Knowledge records are plain serde types so any
//! loader (JSON files today) can produce them.

pub mod error;
pub mod provider;
pub mod record;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use provider::{CompletionRequest, CompletionResponse, Provider, Usage};
pub use record::{DiseaseRecord, DrugComposition, DrugDose, DrugRecord, DrugSideEffect};
