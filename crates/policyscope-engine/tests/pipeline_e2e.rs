//! End-to-end pipeline tests over a real SQLite store.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use policyscope_core::{EngineConfig, Error, Result};
use policyscope_embed::{FixedEmbedder, QueryEmbedder};
use policyscope_engine::{EvidenceEngine, Question, QuestionEvidence};
use policyscope_store::{EmbeddingIndex, PageStore, SqlitePageStore};

const DIM: usize = 3;

/// Store with one strongly matching page (plan.pdf p.10), its neighbors,
/// and an unrelated document.
fn seeded_store() -> (Arc<SqlitePageStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqlitePageStore::open(dir.path()).unwrap();
    store.set_index_meta("embed-004", DIM).unwrap();

    store
        .put_page(
            "plan.pdf",
            10,
            "Claims processing follows the procedures in this section. \
             The Plan shall notify the Member within fourteen (14) calendar days of any adverse determination. \
             Appeals are described in a later section of this document.",
        )
        .unwrap();
    for page in [8u32, 9, 11, 12] {
        store
            .put_page(
                "plan.pdf",
                page,
                "General administrative provisions continue on this page. \
                 The Plan maintains records of all member correspondence.",
            )
            .unwrap();
    }
    store
        .put_page("other.pdf", 1, "Unrelated actuarial tables appear here.")
        .unwrap();

    store.put_embedding("plan.pdf", 10, &[1.0, 0.0, 0.0]).unwrap();
    store.put_embedding("other.pdf", 1, &[0.0, 1.0, 0.0]).unwrap();

    (Arc::new(store), dir)
}

fn engine_with(
    store: Arc<SqlitePageStore>,
    embedder: Arc<dyn QueryEmbedder>,
    config: EngineConfig,
) -> EvidenceEngine {
    let index = Arc::new(EmbeddingIndex::load_from(&store).unwrap());
    let dyn_store: Arc<dyn PageStore> = store;
    EvidenceEngine::new(dyn_store, index, embedder, config).unwrap()
}

fn question(id: &str, text: &str) -> Question {
    Question {
        id: id.into(),
        text: text.into(),
    }
}

/// Embedder that fails for marked questions and sleeps for slow ones.
struct ScriptedEmbedder {
    vector: Vec<f32>,
}

impl QueryEmbedder for ScriptedEmbedder {
    fn embed_query<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
        Box::pin(async move {
            if text.contains("BROKEN") {
                return Err(Error::Embedding("provider returned 500".into()));
            }
            if text.contains("SLOW") {
                tokio::time::sleep(Duration::from_millis(250)).await;
            }
            Ok(self.vector.clone())
        })
    }
}

#[tokio::test]
async fn test_fourteen_day_scenario() {
    let (store, _dir) = seeded_store();
    let embedder = Arc::new(FixedEmbedder::new(vec![1.0, 0.0, 0.0]));
    let engine = engine_with(store, embedder, EngineConfig::default());

    let results = engine
        .run_batch(vec![question(
            "q1",
            "Does the plan notify members within 14 calendar days of an adverse determination?",
        )])
        .await;

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(result.has_evidence);
    assert!(!result.packed_context.is_empty());

    // The obligation sentence wins the top chunk
    let top_chunk = result.packed_context.split("\n\n").next().unwrap();
    assert!(top_chunk.starts_with("[1] plan.pdf p.10:"));
    assert!(top_chunk.contains("fourteen (14) calendar days"));
}

#[tokio::test]
async fn test_sibling_isolation_on_embedding_failure() {
    let (store, _dir) = seeded_store();
    let embedder = Arc::new(ScriptedEmbedder {
        vector: vec![1.0, 0.0, 0.0],
    });
    let engine = engine_with(store, embedder, EngineConfig::default());

    let results = engine
        .run_batch(vec![
            question("good", "Does the plan notify members within 14 calendar days?"),
            question("bad", "BROKEN question"),
            question("good2", "Is notification of members required by the plan?"),
        ])
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].has_evidence);
    assert!(!results[1].has_evidence);
    assert!(results[1].packed_context.is_empty());
    assert!(results[2].has_evidence);
}

#[tokio::test]
async fn test_result_order_matches_input_order() {
    let (store, _dir) = seeded_store();
    let embedder = Arc::new(ScriptedEmbedder {
        vector: vec![1.0, 0.0, 0.0],
    });
    let engine = engine_with(store, embedder, EngineConfig::default());

    // The slow question is first; the fast one completes well before it
    let results = engine
        .run_batch(vec![
            question("first-SLOW", "SLOW does the plan notify members?"),
            question("second", "Is member notification required?"),
        ])
        .await;

    let ids: Vec<&str> = results.iter().map(|r| r.question_id.as_str()).collect();
    assert_eq!(ids, vec!["first-SLOW", "second"]);
}

#[tokio::test]
async fn test_empty_corpus_yields_no_evidence() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqlitePageStore::open(dir.path()).unwrap());
    store.set_index_meta("embed-004", DIM).unwrap();

    let embedder = Arc::new(FixedEmbedder::new(vec![1.0, 0.0, 0.0]));
    let engine = engine_with(store, embedder, EngineConfig::default());

    let results = engine
        .run_batch(vec![question("q1", "Any coverage question at all?")])
        .await;

    assert_eq!(results.len(), 1);
    assert!(!results[0].has_evidence);
    assert_eq!(results[0].packed_context, "");
}

#[tokio::test]
async fn test_whole_page_fallback_guarantees_context() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqlitePageStore::open(dir.path()).unwrap());
    store.set_index_meta("embed-004", DIM).unwrap();

    // Text too short and signal-free for either harvest tier
    store.put_page("plan.pdf", 1, "lorem ipsum dolor sit.").unwrap();
    store.put_embedding("plan.pdf", 1, &[1.0, 0.0, 0.0]).unwrap();

    let embedder = Arc::new(FixedEmbedder::new(vec![1.0, 0.0, 0.0]));
    let engine = engine_with(store, embedder, EngineConfig::default());

    let results = engine
        .run_batch(vec![question("q1", "Is anything covered?")])
        .await;

    assert!(results[0].has_evidence);
    assert!(results[0].packed_context.starts_with("[1] plan.pdf p.1:"));
    assert!(results[0].packed_context.contains("lorem ipsum"));
}

#[tokio::test]
async fn test_no_evidence_constructor() {
    let outcome = QuestionEvidence::none("qx");
    assert_eq!(outcome.question_id, "qx");
    assert!(!outcome.has_evidence);
}
