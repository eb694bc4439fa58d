//! Store types and the page lookup trait.

use ndarray::Array1;
use policyscope_core::Result;
use serde::{Deserialize, Serialize};

/// One page of a policy document. Read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRow {
    pub document_id: String,
    /// 1-based page number.
    pub page: u32,
    pub text: String,
}

/// One record of the precomputed vector index.
///
/// Immutable after index load. The vector dimension is fixed per index.
#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    pub document_id: String,
    /// 1-based page number.
    pub page: u32,
    pub vector: Array1<f32>,
}

/// Read-only, exact-match page lookup.
///
/// A miss is an expected outcome (`Ok(None)`), not an error: the corpus has
/// gaps and the harvester skips missing pages silently.
pub trait PageStore: Send + Sync {
    fn get_page(&self, document_id: &str, page: u32) -> Result<Option<PageRow>>;
}
