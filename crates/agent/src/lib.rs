//! The Medizap medical assistant.
//!
//! Couples keyword retrieval over the knowledge base with a text-generation
//! provider. The assistant never rewrites the retrieved context; the model
//! is instructed to answer from it alone.

pub mod assistant;

#[cfg(test)]
mod test_helpers;

pub use assistant::{APOLOGY, Answer, DISCLAIMER, MedicalAssistant};
