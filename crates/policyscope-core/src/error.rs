//! Error types for PolicyScope.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Query vectorization failed: provider error, malformed payload, or a
    /// query/index dimension mismatch. Resolves the affected question to
    /// "no evidence"; never aborts the batch.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Embedding index missing or corrupt. Fatal at startup.
    #[error("Index load error: {0}")]
    IndexLoad(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
