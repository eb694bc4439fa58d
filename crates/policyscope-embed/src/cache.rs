//! LRU query cache for embedding vectors.
//!
//! Repeated questions in a batch (or across batches) skip the provider call.
//! Default: 512 entries, 1-hour TTL.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use parking_lot::Mutex;

use crate::provider::QueryEmbedder;
use policyscope_core::Result;

struct CachedVector {
    vector: Vec<f32>,
    inserted_at: Instant,
}

/// Thread-safe LRU cache keyed by raw question text.
pub struct QueryCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, CachedVector>,
    order: VecDeque<String>,
    max_size: usize,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: VecDeque::with_capacity(max_size),
                max_size,
                ttl,
            }),
        }
    }

    /// Default sizing: 512 entries, 1-hour TTL.
    pub fn default_cache() -> Self {
        Self::new(512, Duration::from_secs(3600))
    }

    /// Cached vector for a question, or None on miss/expiry.
    pub fn get(&self, question: &str) -> Option<Vec<f32>> {
        let mut inner = self.inner.lock();

        let expired = inner
            .entries
            .get(question)
            .map(|e| e.inserted_at.elapsed() >= inner.ttl)?;

        if expired {
            let key = question.to_string();
            inner.entries.remove(&key);
            inner.order.retain(|k| k != &key);
            return None;
        }

        let vector = inner.entries.get(question).unwrap().vector.clone();
        if let Some(pos) = inner.order.iter().position(|k| k == question) {
            let key = inner.order.remove(pos).unwrap();
            inner.order.push_back(key);
        }
        Some(vector)
    }

    pub fn put(&self, question: String, vector: Vec<f32>) {
        let mut inner = self.inner.lock();

        if inner.entries.contains_key(&question) {
            inner.entries.insert(
                question.clone(),
                CachedVector {
                    vector,
                    inserted_at: Instant::now(),
                },
            );
            inner.order.retain(|k| k != &question);
            inner.order.push_back(question);
            return;
        }

        while inner.entries.len() >= inner.max_size {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }

        inner.order.push_back(question.clone());
        inner.entries.insert(
            question,
            CachedVector {
                vector,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Embedder wrapper that consults the cache before the inner provider.
pub struct CachedEmbedder<E> {
    inner: E,
    cache: QueryCache,
}

impl<E: QueryEmbedder> CachedEmbedder<E> {
    pub fn new(inner: E, cache: QueryCache) -> Self {
        Self { inner, cache }
    }

    pub fn with_defaults(inner: E) -> Self {
        Self::new(inner, QueryCache::default_cache())
    }
}

impl<E: QueryEmbedder> QueryEmbedder for CachedEmbedder<E> {
    fn embed_query<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
        Box::pin(async move {
            if let Some(vector) = self.cache.get(text) {
                return Ok(vector);
            }
            let vector = self.inner.embed_query(text).await?;
            self.cache.put(text.to_string(), vector.clone());
            Ok(vector)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FixedEmbedder;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_hit_miss_and_eviction() {
        let cache = QueryCache::new(2, Duration::from_secs(3600));
        assert!(cache.get("a").is_none());

        cache.put("a".into(), vec![1.0]);
        cache.put("b".into(), vec![2.0]);
        assert_eq!(cache.get("a"), Some(vec![1.0]));

        // "b" is now least recently used
        cache.put("c".into(), vec![3.0]);
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = QueryCache::new(8, Duration::from_millis(1));
        cache.put("q".into(), vec![1.0]);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("q").is_none());
    }

    struct CountingEmbedder {
        inner: FixedEmbedder,
        calls: AtomicUsize,
    }

    impl QueryEmbedder for CountingEmbedder {
        fn embed_query<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.embed_query(text)
        }
    }

    #[tokio::test]
    async fn test_cached_embedder_calls_provider_once() {
        let counting = CountingEmbedder {
            inner: FixedEmbedder::new(vec![0.5, 0.5]),
            calls: AtomicUsize::new(0),
        };
        let embedder = CachedEmbedder::with_defaults(counting);

        let first = embedder.embed_query("same question").await.unwrap();
        let second = embedder.embed_query("same question").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(embedder.inner.calls.load(Ordering::SeqCst), 1);
    }
}
