//! The per-question retrieval pipeline.
//!
//! Vectorize → rank → expand → harvest → pack, with three packing
//! strategies tried in order until one meets its yield condition:
//! strict sentence harvest, lenient sentence harvest, whole-page fallback.

use std::sync::Arc;

use tracing::debug;

use crate::types::Question;
use policyscope_core::{EngineConfig, Result};
use policyscope_embed::QueryEmbedder;
use policyscope_harvest::{harvest_blocks, HarvestMode, HarvestParams};
use policyscope_pack::{pack_blocks, pack_whole_pages, PackParams};
use policyscope_retrieve::{expand_neighborhoods, top_k, ScoredPage};
use policyscope_store::{EmbeddingIndex, PageStore};

/// Ordered packing strategies. Each is tried until its yield condition
/// holds; the whole-page pass always terminates the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PackStrategy {
    StrictHarvest,
    LenientHarvest,
    WholePage,
}

const STRATEGY_ORDER: [PackStrategy; 3] = [
    PackStrategy::StrictHarvest,
    PackStrategy::LenientHarvest,
    PackStrategy::WholePage,
];

/// Run the full pipeline for one question.
///
/// Returns the packed context, possibly empty. Errors (embedding failure,
/// dimension mismatch, store faults) are the caller's to degrade into a
/// per-question "no evidence" outcome.
pub(crate) async fn gather_evidence(
    store: &Arc<dyn PageStore>,
    index: &EmbeddingIndex,
    embedder: &dyn QueryEmbedder,
    config: &EngineConfig,
    question: &Question,
) -> Result<String> {
    let vector = embedder.embed_query(&question.text).await?;

    let hits = top_k(index, &vector, config.top_k)?;
    debug!("Question {}: {} nearest pages", question.id, hits.len());

    let candidates =
        expand_neighborhoods(&hits, config.neighbor_radius, config.base_score_factor);
    if candidates.is_empty() {
        debug!("Question {}: no candidate pages after expansion", question.id);
        return Ok(String::new());
    }
    debug!("Question {}: {} candidate pages", question.id, candidates.len());

    let chunks = pack_candidates(store.as_ref(), &candidates, &question.text, config)?;
    debug!("Question {}: packed {} chunks", question.id, chunks.len());

    Ok(chunks.join("\n\n"))
}

/// Try each packing strategy in order until one yields enough.
fn pack_candidates(
    store: &dyn PageStore,
    candidates: &[ScoredPage],
    question: &str,
    config: &EngineConfig,
) -> Result<Vec<String>> {
    let harvest_params = HarvestParams {
        sentence_window: config.sentence_window,
        max_sentence_chars: config.max_sentence_chars,
    };
    let pack_params = PackParams {
        char_budget: config.char_budget,
        max_blocks: config.max_blocks,
        overage_multiplier: config.overage_multiplier,
        overage_chunk_limit: config.overage_chunk_limit,
    };

    for strategy in STRATEGY_ORDER {
        let chunks = match strategy {
            PackStrategy::StrictHarvest => {
                let blocks =
                    harvest_blocks(store, candidates, question, HarvestMode::Strict, harvest_params)?;
                pack_blocks(&blocks, pack_params)
            }
            PackStrategy::LenientHarvest => {
                let blocks = harvest_blocks(
                    store,
                    candidates,
                    question,
                    HarvestMode::Lenient,
                    harvest_params,
                )?;
                pack_blocks(&blocks, pack_params)
            }
            PackStrategy::WholePage => pack_whole_pages(
                store,
                candidates,
                config.fallback_pages,
                config.char_budget,
            )?,
        };

        let enough = match strategy {
            PackStrategy::StrictHarvest => chunks.len() >= config.min_chunks,
            PackStrategy::LenientHarvest => !chunks.is_empty(),
            PackStrategy::WholePage => true,
        };
        if enough {
            if strategy != PackStrategy::StrictHarvest {
                debug!("Packing fell back to {:?}", strategy);
            }
            return Ok(chunks);
        }
    }

    Ok(Vec::new())
}
