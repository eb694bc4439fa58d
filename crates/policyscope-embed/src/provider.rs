//! Query-embedding provider client.
//!
//! The engine issues exactly one embedding request per question. Any
//! non-success status or unparsable payload becomes `Error::Embedding`,
//! which the coordinator turns into a per-question "no evidence" outcome.
//! No retries here; retry policy belongs to the caller.

use futures::future::BoxFuture;
use serde_json::json;
use tracing::debug;

use crate::preprocess::preprocess_question;
use policyscope_core::{Error, Result};

/// Turns question text into a fixed-dimension vector.
pub trait QueryEmbedder: Send + Sync {
    fn embed_query<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>>;
}

/// HTTP embedding client.
///
/// Wire shape: POST `{ model, text, task_type: "query" }` →
/// `{ vector: [f32] }`.
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model_id: String,
}

impl HttpEmbedder {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model_id: model_id.into(),
        }
    }

    /// Build from `POLICYSCOPE_EMBED_URL`, `POLICYSCOPE_EMBED_KEY`,
    /// `POLICYSCOPE_EMBED_MODEL`.
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("POLICYSCOPE_EMBED_URL")
            .map_err(|_| Error::Config("POLICYSCOPE_EMBED_URL not set".into()))?;
        let api_key = std::env::var("POLICYSCOPE_EMBED_KEY")
            .map_err(|_| Error::Config("POLICYSCOPE_EMBED_KEY not set".into()))?;
        let model_id = std::env::var("POLICYSCOPE_EMBED_MODEL")
            .unwrap_or_else(|_| "text-embedding-004".to_string());
        Ok(Self::new(endpoint, api_key, model_id))
    }
}

impl QueryEmbedder for HttpEmbedder {
    fn embed_query<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
        Box::pin(async move {
            let prepared = preprocess_question(text);
            let body = json!({
                "model": self.model_id,
                "text": prepared,
                "task_type": "query",
            });

            debug!("Embedding query via {} model {}", self.endpoint, self.model_id);

            let response = self
                .client
                .post(&self.endpoint)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await
                .map_err(|e| Error::Embedding(format!("request failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let detail = response.text().await.unwrap_or_default();
                return Err(Error::Embedding(format!(
                    "provider returned {}: {}",
                    status, detail
                )));
            }

            let payload: serde_json::Value = response
                .json()
                .await
                .map_err(|e| Error::Embedding(format!("unparsable response: {}", e)))?;

            parse_vector(&payload)
        })
    }
}

fn parse_vector(payload: &serde_json::Value) -> Result<Vec<f32>> {
    let values = payload["vector"]
        .as_array()
        .ok_or_else(|| Error::Embedding("response missing vector field".into()))?;

    let vector: Option<Vec<f32>> = values.iter().map(|v| v.as_f64().map(|f| f as f32)).collect();
    match vector {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(Error::Embedding("provider returned an empty vector".into())),
        None => Err(Error::Embedding("non-numeric vector component".into())),
    }
}

/// Deterministic embedder for tests: always returns the same vector.
pub struct FixedEmbedder {
    vector: Vec<f32>,
}

impl FixedEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }
}

impl QueryEmbedder for FixedEmbedder {
    fn embed_query<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
        Box::pin(async move { Ok(self.vector.clone()) })
    }
}
