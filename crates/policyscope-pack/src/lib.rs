//! PolicyScope Pack — greedy selection of evidence into a bounded context.
//!
//! Blocks are walked in rank order and appended as citation-tagged chunks
//! until the character budget runs out. A bounded overage protects early
//! high-value evidence from being starved by budget rounding. When sentence
//! harvesting produced nothing packable, a coarse whole-page mode guarantees
//! the decision step still receives context whenever any candidate page has
//! text.

use tracing::debug;

use policyscope_core::Result;
use policyscope_harvest::{truncate_chars, EvidenceBlock};
use policyscope_retrieve::ScoredPage;
use policyscope_store::PageStore;

/// Packing knobs, lifted from `EngineConfig`.
#[derive(Debug, Clone, Copy)]
pub struct PackParams {
    /// Total character budget for the packed context.
    pub char_budget: usize,
    /// Hard ceiling on the number of chunks.
    pub max_blocks: usize,
    /// Budget multiplier tolerated for early chunks.
    pub overage_multiplier: f32,
    /// Only the first N chunks may use the overage.
    pub overage_chunk_limit: usize,
}

/// Render one citation-tagged chunk. `ordinal` is 1-indexed pack order.
fn render_chunk(ordinal: usize, document_id: &str, page: u32, text: &str) -> String {
    format!("[{}] {} p.{}: \"{}\"", ordinal, document_id, page, text)
}

/// Greedily pack ranked blocks into citation-tagged chunks.
///
/// Walks blocks in rank order; a chunk that would overflow the budget is
/// still taken while fewer than `overage_chunk_limit` chunks are packed and
/// the total stays within `char_budget × overage_multiplier`. The first
/// overflow past that allowance stops packing.
pub fn pack_blocks(blocks: &[EvidenceBlock], params: PackParams) -> Vec<String> {
    let hard_cap = (params.char_budget as f32 * params.overage_multiplier) as usize;
    let mut chunks = Vec::new();
    let mut total = 0usize;

    for block in blocks {
        if chunks.len() >= params.max_blocks {
            break;
        }
        let chunk = render_chunk(chunks.len() + 1, &block.document_id, block.page, &block.text);
        let length = chunk.chars().count();

        if total + length <= params.char_budget {
            total += length;
            chunks.push(chunk);
        } else if chunks.len() < params.overage_chunk_limit && total + length <= hard_cap {
            total += length;
            chunks.push(chunk);
        } else {
            break;
        }
    }

    debug!("Packed {} chunks, {} chars", chunks.len(), total);
    chunks
}

/// Coarse whole-page fallback.
///
/// Takes up to `fallback_pages` candidate pages in descending base-score
/// order, splits the budget evenly across the pages that actually have
/// text, and emits each page's whitespace-normalized text truncated to its
/// share.
pub fn pack_whole_pages(
    store: &dyn PageStore,
    candidates: &[ScoredPage],
    fallback_pages: usize,
    char_budget: usize,
) -> Result<Vec<String>> {
    let mut ordered: Vec<&ScoredPage> = candidates.iter().collect();
    ordered.sort_by(|a, b| {
        b.base_score
            .partial_cmp(&a.base_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.document_id.cmp(&b.document_id))
            .then_with(|| a.page.cmp(&b.page))
    });

    let mut pages: Vec<(&ScoredPage, String)> = Vec::new();
    for candidate in ordered {
        if pages.len() >= fallback_pages {
            break;
        }
        if let Some(row) = store.get_page(&candidate.document_id, candidate.page)? {
            let normalized = normalize_whitespace(&row.text);
            if !normalized.is_empty() {
                pages.push((candidate, normalized));
            }
        }
    }

    if pages.is_empty() {
        return Ok(Vec::new());
    }

    let share = (char_budget / pages.len()).max(1);
    let chunks = pages
        .iter()
        .enumerate()
        .map(|(i, (candidate, text))| {
            render_chunk(
                i + 1,
                &candidate.document_id,
                candidate.page,
                truncate_chars(text, share),
            )
        })
        .collect();
    Ok(chunks)
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
