//! PolicyScope Retrieve — nearest-neighbor ranking and neighborhood expansion.

pub mod expand;
pub mod rank;

pub use expand::{expand_neighborhoods, ScoredPage};
pub use rank::{cosine_similarity, top_k, PageHit};
