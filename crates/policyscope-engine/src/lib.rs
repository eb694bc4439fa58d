//! PolicyScope Engine — retrieval and evidentiary packing for compliance
//! questions.
//!
//! The engine consumes a page store and a precomputed embedding index and
//! produces, per question, a packed evidence context for the downstream
//! decision step. It never mutates either collaborator.

pub mod coordinator;
pub mod pipeline;
pub mod types;

pub use coordinator::EvidenceEngine;
pub use types::{Question, QuestionEvidence};
