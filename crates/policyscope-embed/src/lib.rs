//! PolicyScope Embed — question preprocessing and the query-embedding client.

pub mod cache;
pub mod preprocess;
pub mod provider;

pub use cache::{CachedEmbedder, QueryCache};
pub use preprocess::preprocess_question;
pub use provider::{FixedEmbedder, HttpEmbedder, QueryEmbedder};
