//! PolicyScope Harvest — sentence-level evidence extraction and scoring.

pub mod harvest;
pub mod rules;
pub mod sentence;

pub use harvest::{harvest_blocks, EvidenceBlock, HarvestMode, HarvestParams};
pub use rules::{extract_numbers, score_sentence, SignalRule};
pub use sentence::{split_sentences, truncate_chars};
