//! The in-memory embedding index and its load-once handle.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::sqlite::SqlitePageStore;
use crate::types::EmbeddingRecord;
use policyscope_core::{Error, Result};

/// Immutable in-memory vector index over document pages.
///
/// Loaded once per process lifetime; all workers share one `Arc`.
#[derive(Debug)]
pub struct EmbeddingIndex {
    model_id: String,
    dimension: usize,
    records: Vec<EmbeddingRecord>,
}

impl EmbeddingIndex {
    /// Load all index records from the store.
    ///
    /// Missing index metadata or a record whose vector does not match the
    /// declared dimension is an `IndexLoad` error — the engine cannot serve
    /// any question without a sound index, so this fails fast at startup.
    /// An empty record set is valid (empty corpus).
    pub fn load_from(store: &SqlitePageStore) -> Result<Self> {
        let (model_id, dimension) = store
            .index_meta()?
            .ok_or_else(|| Error::IndexLoad("index metadata missing from store".into()))?;

        let records = store.load_embedding_records()?;
        for record in &records {
            if record.vector.len() != dimension {
                return Err(Error::IndexLoad(format!(
                    "record {} p.{} has dimension {}, index declares {}",
                    record.document_id,
                    record.page,
                    record.vector.len(),
                    dimension
                )));
            }
        }

        info!(
            "Embedding index loaded: {} records, dim={}, model={}",
            records.len(),
            dimension,
            model_id
        );

        Ok(Self {
            model_id,
            dimension,
            records,
        })
    }

    /// Build an index directly from records (tests, offline tooling).
    pub fn from_records(
        model_id: impl Into<String>,
        dimension: usize,
        records: Vec<EmbeddingRecord>,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            dimension,
            records,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn records(&self) -> &[EmbeddingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load-once gate for the embedding index.
///
/// Concurrent first use loads exactly once; every later call returns the
/// cached `Arc`. There is no invalidation — the index is fixed for the
/// process lifetime.
#[derive(Default)]
pub struct IndexHandle {
    cell: OnceCell<Arc<EmbeddingIndex>>,
}

impl IndexHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the index from `store`, or return the already-loaded one.
    pub fn load(&self, store: &SqlitePageStore) -> Result<Arc<EmbeddingIndex>> {
        self.cell
            .get_or_try_init(|| EmbeddingIndex::load_from(store).map(Arc::new))
            .cloned()
    }
}
