//! Batch coordinator — bounded-parallelism question processing.
//!
//! One question runs end-to-end per worker slot. Results land in a buffer
//! pre-sized to the input, each task writing its own index, so output order
//! always matches input order regardless of completion timing.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::pipeline::gather_evidence;
use crate::types::{Question, QuestionEvidence};
use policyscope_core::{EngineConfig, Result};
use policyscope_embed::QueryEmbedder;
use policyscope_store::{EmbeddingIndex, PageStore};

/// The retrieval-and-packing engine.
///
/// All collaborators are constructed once at process start and injected;
/// they are shared read-only across workers.
pub struct EvidenceEngine {
    store: Arc<dyn PageStore>,
    index: Arc<EmbeddingIndex>,
    embedder: Arc<dyn QueryEmbedder>,
    config: EngineConfig,
}

impl EvidenceEngine {
    pub fn new(
        store: Arc<dyn PageStore>,
        index: Arc<EmbeddingIndex>,
        embedder: Arc<dyn QueryEmbedder>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            index,
            embedder,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process a batch of questions under the configured concurrency limit.
    ///
    /// Results are returned in input order. A failed question degrades to
    /// `has_evidence: false` without affecting its siblings.
    pub async fn run_batch(&self, questions: Vec<Question>) -> Vec<QuestionEvidence> {
        let total = questions.len();
        info!(
            "Processing {} questions with concurrency {}",
            total, self.config.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let question_ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();
        let mut results: Vec<Option<QuestionEvidence>> = Vec::new();
        results.resize_with(total, || None);

        let mut workers = JoinSet::new();
        for (idx, question) in questions.into_iter().enumerate() {
            let semaphore = semaphore.clone();
            let store = self.store.clone();
            let index = self.index.clone();
            let embedder = self.embedder.clone();
            let config = self.config.clone();

            workers.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return (idx, QuestionEvidence::none(question.id)),
                };

                let evidence = match gather_evidence(
                    &store,
                    &index,
                    embedder.as_ref(),
                    &config,
                    &question,
                )
                .await
                {
                    Ok(packed) => QuestionEvidence {
                        question_id: question.id,
                        has_evidence: !packed.is_empty(),
                        packed_context: packed,
                    },
                    Err(e) => {
                        warn!("Question {} degraded to no evidence: {}", question.id, e);
                        QuestionEvidence::none(question.id)
                    }
                };
                (idx, evidence)
            });
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((idx, evidence)) => results[idx] = Some(evidence),
                Err(e) => error!("Question worker failed: {}", e),
            }
        }

        let resolved: Vec<QuestionEvidence> = results
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.unwrap_or_else(|| QuestionEvidence::none(question_ids[idx].clone()))
            })
            .collect();

        let with_evidence = resolved.iter().filter(|r| r.has_evidence).count();
        info!(
            "Batch complete: {}/{} questions with evidence",
            with_evidence, total
        );
        resolved
    }
}
