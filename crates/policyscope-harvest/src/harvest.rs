//! Evidence harvesting over candidate pages.
//!
//! Each candidate page is segmented into sentences, each sentence is scored
//! against the signal battery, and survivors become windowed evidence blocks
//! carrying the page's base score. Strict and lenient passes share one
//! implementation, differing only in their keep threshold and score floor.

use std::collections::HashSet;

use tracing::debug;

use crate::rules::{extract_numbers, score_sentence};
use crate::sentence::{split_sentences, truncate_chars};
use policyscope_core::Result;
use policyscope_retrieve::ScoredPage;
use policyscope_store::PageStore;

/// Combined score floor applied to lenient survivors so every one of them
/// stays packable.
pub const LENIENT_SCORE_FLOOR: f32 = 0.05;
/// Lenient mode keeps anything scoring at or above this.
pub const LENIENT_KEEP_THRESHOLD: f32 = -1.0;
/// Characters of leading text used in the dedup key.
pub const DEDUP_PREFIX_CHARS: usize = 80;

/// A windowed sentence excerpt with a combined relevance score.
#[derive(Debug, Clone)]
pub struct EvidenceBlock {
    pub document_id: String,
    pub page: u32,
    pub text: String,
    pub score: f32,
}

/// Keep threshold and score floor for one harvesting pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestMode {
    /// Discard sentences scoring ≤ 0.
    Strict,
    /// Discard only sentences scoring < −1 and floor the combined score at
    /// a small positive minimum.
    Lenient,
}

impl HarvestMode {
    fn keeps(self, score: f32) -> bool {
        match self {
            HarvestMode::Strict => score > 0.0,
            HarvestMode::Lenient => score >= LENIENT_KEEP_THRESHOLD,
        }
    }

    fn finalize(self, combined: f32) -> f32 {
        match self {
            HarvestMode::Strict => combined,
            HarvestMode::Lenient => combined.max(LENIENT_SCORE_FLOOR),
        }
    }
}

/// Windowing and truncation knobs, lifted from `EngineConfig`.
#[derive(Debug, Clone, Copy)]
pub struct HarvestParams {
    /// Sentences of context on each side of a scoring sentence.
    pub sentence_window: usize,
    /// Per-sentence truncation in characters.
    pub max_sentence_chars: usize,
}

/// Harvest ranked, deduplicated evidence blocks from candidate pages.
///
/// Page-store misses are skipped silently; they never fail the question.
pub fn harvest_blocks(
    store: &dyn PageStore,
    candidates: &[ScoredPage],
    question: &str,
    mode: HarvestMode,
    params: HarvestParams,
) -> Result<Vec<EvidenceBlock>> {
    let question_numbers = extract_numbers(question);
    let mut blocks = Vec::new();

    for candidate in candidates {
        let row = match store.get_page(&candidate.document_id, candidate.page)? {
            Some(row) => row,
            None => {
                debug!(
                    "No text for {} p.{}, skipping",
                    candidate.document_id, candidate.page
                );
                continue;
            }
        };

        let sentences: Vec<&str> = split_sentences(&row.text)
            .into_iter()
            .map(|s| truncate_chars(s, params.max_sentence_chars))
            .collect();

        for (i, sentence) in sentences.iter().enumerate() {
            let sentence_score = score_sentence(sentence, &question_numbers);
            if !mode.keeps(sentence_score) {
                continue;
            }

            let lo = i.saturating_sub(params.sentence_window);
            let hi = (i + params.sentence_window).min(sentences.len() - 1);
            let window = sentences[lo..=hi].join(" ");

            blocks.push(EvidenceBlock {
                document_id: candidate.document_id.clone(),
                page: candidate.page,
                text: window,
                score: mode.finalize(sentence_score + candidate.base_score),
            });
        }
    }

    blocks.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.document_id.cmp(&b.document_id))
            .then_with(|| a.page.cmp(&b.page))
    });

    Ok(dedup_blocks(blocks))
}

/// Drop near-duplicate windows: same (document, page, leading text) keeps
/// only its first (highest-scoring) occurrence.
fn dedup_blocks(blocks: Vec<EvidenceBlock>) -> Vec<EvidenceBlock> {
    let mut seen: HashSet<(String, u32, String)> = HashSet::new();
    blocks
        .into_iter()
        .filter(|block| {
            let prefix = truncate_chars(&block.text, DEDUP_PREFIX_CHARS).to_lowercase();
            seen.insert((block.document_id.clone(), block.page, prefix))
        })
        .collect()
}
