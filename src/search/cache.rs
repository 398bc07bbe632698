//! LRU cache for query embeddings.
//!
//! Entries are keyed by embedder id and a SHA-256 of the query text, so a
//! cache shared across embedders never returns a vector from the wrong space.
//! All operations are non-blocking (try-lock pattern): a contended lock is
//! treated as a miss and a failed put is dropped.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;
use sha2::{Digest, Sha256};

/// Default cache size for query embeddings (number of queries)
pub const DEFAULT_EMBEDDING_CACHE_SIZE: usize = 512;

/// Cache statistics for monitoring and tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe LRU cache of query embeddings.
pub struct EmbeddingCache {
    entries: Mutex<LruCache<(String, String), Vec<f32>>>,
    stats: Mutex<CacheStats>,
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_CACHE_SIZE)
    }
}

impl EmbeddingCache {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// SHA-256 hex digest of the text being embedded.
    pub fn content_hash(text: &str) -> String {
        hex::encode(Sha256::digest(text.as_bytes()))
    }

    /// Get a cached embedding.
    ///
    /// Returns None if not cached or the cache is locked.
    pub fn get(&self, embedder_id: &str, text: &str) -> Option<Vec<f32>> {
        let key = (embedder_id.to_string(), Self::content_hash(text));
        let mut cache = self.entries.try_lock().ok()?;
        let hit = cache.get(&key).cloned();

        if let Ok(mut stats) = self.stats.try_lock() {
            if hit.is_some() {
                stats.hits += 1;
            } else {
                stats.misses += 1;
            }
        }
        hit
    }

    /// Cache an embedding.
    ///
    /// Silently fails if the cache is locked.
    pub fn put(&self, embedder_id: &str, text: &str, embedding: Vec<f32>) {
        let key = (embedder_id.to_string(), Self::content_hash(text));
        if let Ok(mut cache) = self.entries.try_lock() {
            cache.put(key, embedding);
        }
    }

    /// Return the cached embedding or compute, store and return a new one.
    ///
    /// Errors from `compute` are passed through and nothing is cached.
    pub fn get_or_try_insert<E>(
        &self,
        embedder_id: &str,
        text: &str,
        compute: impl FnOnce() -> Result<Vec<f32>, E>,
    ) -> Result<Vec<f32>, E> {
        if let Some(hit) = self.get(embedder_id, text) {
            return Ok(hit);
        }
        let embedding = compute()?;
        self.put(embedder_id, text, embedding.clone());
        Ok(embedding)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
            .try_lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.try_lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries and reset statistics.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.entries.try_lock() {
            cache.clear();
        }
        if let Ok(mut stats) = self.stats.try_lock() {
            *stats = CacheStats::default();
        }
    }
}
