//! PolicyScope Store — page lookup and the precomputed embedding index.
//!
//! Both collaborators are read-only for the engine's lifetime: workers share
//! them behind `Arc` with no locking discipline beyond the one-time index
//! load gate.

pub mod index;
pub mod quant;
pub mod schema;
pub mod sqlite;
pub mod types;

pub use index::{EmbeddingIndex, IndexHandle};
pub use sqlite::SqlitePageStore;
pub use types::{EmbeddingRecord, PageRow, PageStore};
