//! Time-windowed caches for embeddings and ranked results.
//!
//! Invalidation is deliberately coarse: once the window has elapsed since the
//! last sweep, the whole map is cleared on the next access. There is no
//! per-entry TTL — downstream staleness behavior (e.g. after a note edit)
//! depends on this granularity, so keep it.
//!
//! The inner mutex is held only for map operations and never across an
//! await, which makes the caches safe under interleaved async search calls.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::provider::{EmbeddingProvider, ProviderError};
use crate::search::engine::SearchResult;
use crate::search::lexical;

/// A map whose entire contents are dropped once `window` has elapsed.
pub struct TimedCache<V: Clone> {
    inner: Mutex<TimedCacheInner<V>>,
    window: Duration,
}

struct TimedCacheInner<V> {
    entries: HashMap<String, V>,
    last_sweep: Instant,
}

impl<V: Clone> TimedCache<V> {
    pub fn new(window: Duration) -> Self {
        Self {
            inner: Mutex::new(TimedCacheInner {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
            }),
            window,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.lock();
        Self::sweep_if_due(&mut inner, self.window);
        inner.entries.get(key).cloned()
    }

    pub fn put(&self, key: String, value: V) {
        let mut inner = self.lock();
        Self::sweep_if_due(&mut inner, self.window);
        inner.entries.insert(key, value);
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.last_sweep = Instant::now();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep_if_due(inner: &mut TimedCacheInner<V>, window: Duration) {
        if inner.last_sweep.elapsed() >= window {
            inner.entries.clear();
            inner.last_sweep = Instant::now();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TimedCacheInner<V>> {
        // A poisoned lock means a panic mid-insert; the map holds only
        // recomputable values, so continuing is safe.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Memoized text -> embedding lookups, keyed by lowercased exact text.
pub struct EmbeddingCache {
    cache: TimedCache<Vec<f32>>,
}

impl EmbeddingCache {
    pub fn new(window: Duration) -> Self {
        Self {
            cache: TimedCache::new(window),
        }
    }

    /// Return the memoized vector, or call the provider and memoize.
    /// Provider failures propagate — no default vector is substituted.
    pub async fn get_or_compute(
        &self,
        text: &str,
        provider: &dyn EmbeddingProvider,
    ) -> Result<Vec<f32>, ProviderError> {
        let key = text.to_lowercase();
        if let Some(vector) = self.cache.get(&key) {
            log::debug!("embedding cache hit");
            return Ok(vector);
        }

        let vector = provider.generate_embedding(text).await?;
        self.cache.put(key, vector.clone());
        Ok(vector)
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Memoized query -> ranked results, keyed by normalized query plus limit.
pub struct ResultCache {
    cache: TimedCache<Vec<SearchResult>>,
}

impl ResultCache {
    pub fn new(window: Duration) -> Self {
        Self {
            cache: TimedCache::new(window),
        }
    }

    /// Cache key: normalized query text combined with the result limit.
    /// Top-5 and top-20 of the same query are distinct entries.
    pub fn key(query: &str, limit: usize) -> String {
        format!("{}::{}", lexical::normalize(query), limit)
    }

    pub fn get(&self, key: &str) -> Option<Vec<SearchResult>> {
        self.cache.get(key)
    }

    pub fn put(&self, key: String, results: Vec<SearchResult>) {
        self.cache.put(key, results);
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
