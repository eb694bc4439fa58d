//! Engine configuration — every retrieval/packing knob in one place.

use serde::{Deserialize, Serialize};

/// Default nearest-neighbor fan-out.
pub const DEFAULT_TOP_K: usize = 80;
/// Default page expansion width on each side of a hit.
pub const DEFAULT_NEIGHBOR_RADIUS: u32 = 3;
/// Fraction of the originating similarity carried into a candidate page.
pub const DEFAULT_BASE_SCORE_FACTOR: f32 = 0.25;
/// Default total context character budget.
pub const DEFAULT_CHAR_BUDGET: usize = 12_000;
/// Default packed-chunk ceiling.
pub const DEFAULT_MAX_BLOCKS: usize = 40;
/// Minimum packed chunks before the lenient harvest pass kicks in.
pub const DEFAULT_MIN_CHUNKS: usize = 5;
/// Budget overage allowed for early high-value chunks.
pub const DEFAULT_OVERAGE_MULTIPLIER: f32 = 1.1;
/// Only the first N chunks may use the overage allowance.
pub const DEFAULT_OVERAGE_CHUNK_LIMIT: usize = 10;
/// Sentences of context packed on each side of a scoring sentence.
pub const DEFAULT_SENTENCE_WINDOW: usize = 2;
/// Per-sentence truncation length.
pub const DEFAULT_MAX_SENTENCE_CHARS: usize = 600;
/// Page count cap for the coarse whole-page fallback.
pub const DEFAULT_FALLBACK_PAGES: usize = 20;
/// Parallel in-flight questions.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Tunable parameters for the retrieval-and-packing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Nearest-neighbor fan-out (K).
    pub top_k: usize,
    /// Symmetric page radius expanded around each hit.
    pub neighbor_radius: u32,
    /// Fraction of hit similarity assigned as a candidate page's base score.
    pub base_score_factor: f32,
    /// Total packed-context character budget.
    pub char_budget: usize,
    /// Hard ceiling on packed chunks.
    pub max_blocks: usize,
    /// Below this many packed chunks, re-harvest in lenient mode.
    pub min_chunks: usize,
    /// Budget multiplier tolerated while packing early chunks.
    pub overage_multiplier: f32,
    /// Number of leading chunks allowed to use the overage.
    pub overage_chunk_limit: usize,
    /// Sentences of context on each side of a scoring sentence.
    pub sentence_window: usize,
    /// Per-sentence truncation length in characters.
    pub max_sentence_chars: usize,
    /// Candidate pages consumed by the whole-page fallback.
    pub fallback_pages: usize,
    /// Worker slots for concurrent question processing.
    pub concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            neighbor_radius: DEFAULT_NEIGHBOR_RADIUS,
            base_score_factor: DEFAULT_BASE_SCORE_FACTOR,
            char_budget: DEFAULT_CHAR_BUDGET,
            max_blocks: DEFAULT_MAX_BLOCKS,
            min_chunks: DEFAULT_MIN_CHUNKS,
            overage_multiplier: DEFAULT_OVERAGE_MULTIPLIER,
            overage_chunk_limit: DEFAULT_OVERAGE_CHUNK_LIMIT,
            sentence_window: DEFAULT_SENTENCE_WINDOW,
            max_sentence_chars: DEFAULT_MAX_SENTENCE_CHARS,
            fallback_pages: DEFAULT_FALLBACK_PAGES,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl EngineConfig {
    /// Build a config from environment variables, falling back to defaults.
    ///
    /// Recognized variables: `POLICYSCOPE_TOP_K`, `POLICYSCOPE_RADIUS`,
    /// `POLICYSCOPE_BUDGET`, `POLICYSCOPE_MAX_BLOCKS`,
    /// `POLICYSCOPE_CONCURRENCY`.
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Self::default();

        if let Some(v) = env_parse("POLICYSCOPE_TOP_K")? {
            config.top_k = v;
        }
        if let Some(v) = env_parse("POLICYSCOPE_RADIUS")? {
            config.neighbor_radius = v;
        }
        if let Some(v) = env_parse("POLICYSCOPE_BUDGET")? {
            config.char_budget = v;
        }
        if let Some(v) = env_parse("POLICYSCOPE_MAX_BLOCKS")? {
            config.max_blocks = v;
        }
        if let Some(v) = env_parse("POLICYSCOPE_CONCURRENCY")? {
            config.concurrency = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.top_k == 0 {
            return Err(crate::Error::Config("top_k must be at least 1".into()));
        }
        if self.concurrency == 0 {
            return Err(crate::Error::Config("concurrency must be at least 1".into()));
        }
        if self.char_budget == 0 {
            return Err(crate::Error::Config("char_budget must be positive".into()));
        }
        if self.overage_multiplier < 1.0 {
            return Err(crate::Error::Config(
                "overage_multiplier must be >= 1.0".into(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> crate::Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| crate::Error::Config(format!("invalid value for {}: {}", name, raw))),
        Err(_) => Ok(None),
    }
}
