//! PolicyScope — evidence retrieval for compliance questions.
//!
//! Reads a JSON array of `{ "id", "text" }` questions, runs the retrieval
//! pipeline against the configured page store and embedding index, and
//! prints packed evidence contexts as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use policyscope_core::EngineConfig;
use policyscope_embed::{CachedEmbedder, HttpEmbedder, QueryEmbedder};
use policyscope_engine::{EvidenceEngine, Question};
use policyscope_store::{IndexHandle, PageStore, SqlitePageStore};

fn resolve_data_dir() -> PathBuf {
    std::env::var("POLICYSCOPE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn print_help() {
    println!("PolicyScope — evidence retrieval for compliance questions");
    println!();
    println!("Usage: policyscope <command>");
    println!();
    println!("Commands:");
    println!("  run <questions.json>     Retrieve evidence for a batch of questions");
    println!("  validate [data-dir]      Check that the store and index load");
    println!("  help                     Show this help message");
    println!();
    println!("Environment:");
    println!("  POLICYSCOPE_DATA_DIR     Store directory (default: data)");
    println!("  POLICYSCOPE_EMBED_URL    Embedding provider endpoint");
    println!("  POLICYSCOPE_EMBED_KEY    Embedding provider API key");
    println!("  POLICYSCOPE_EMBED_MODEL  Embedding model id (default: text-embedding-004)");
}

fn validate(data_dir: &PathBuf) -> anyhow::Result<()> {
    let store = SqlitePageStore::open(data_dir)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;
    let handle = IndexHandle::new();
    let index = handle
        .load(&store)
        .map_err(|e| anyhow::anyhow!("Failed to load index: {}", e))?;
    println!(
        "OK: {} pages, {} index records, dim={}, model={}",
        store.count_pages().map_err(|e| anyhow::anyhow!("{}", e))?,
        index.len(),
        index.dimension(),
        index.model_id()
    );
    Ok(())
}

async fn run(data_dir: &PathBuf, questions_path: &str) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(questions_path)?;
    let questions: Vec<Question> = serde_json::from_str(&raw)?;
    info!("Loaded {} questions from {}", questions.len(), questions_path);

    let config = EngineConfig::from_env().map_err(|e| anyhow::anyhow!("{}", e))?;

    // Store and index are constructed once here and injected; the engine
    // never loads them itself.
    let store = Arc::new(
        SqlitePageStore::open(data_dir)
            .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?,
    );
    let index = IndexHandle::new()
        .load(&store)
        .map_err(|e| anyhow::anyhow!("Failed to load index: {}", e))?;

    let embedder: Arc<dyn QueryEmbedder> = Arc::new(CachedEmbedder::with_defaults(
        HttpEmbedder::from_env().map_err(|e| anyhow::anyhow!("{}", e))?,
    ));

    let page_store: Arc<dyn PageStore> = store;
    let engine = EvidenceEngine::new(page_store, index.clone(), embedder, config)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let results = engine.run_batch(questions).await;

    let envelope = serde_json::json!({
        "model_id": index.model_id(),
        "answered_at": chrono::Utc::now().to_rfc3339(),
        "results": results,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("run") => {
            let Some(questions_path) = args.get(2) else {
                eprintln!("Usage: policyscope run <questions.json>");
                std::process::exit(1);
            };
            run(&resolve_data_dir(), questions_path).await
        }
        Some("validate") => {
            let data_dir = args
                .get(2)
                .map(PathBuf::from)
                .unwrap_or_else(resolve_data_dir);
            validate(&data_dir)
        }
        Some("--help") | Some("-h") | Some("help") | None => {
            print_help();
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command: {}. Use 'policyscope help' for usage.", other);
            std::process::exit(1);
        }
    }
}
