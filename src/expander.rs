//! Cache expander - read-through lookup with per-key single-flight loads.

use crate::backend::CacheBackend;
use crate::entity::Cacheable;
use crate::error::{Error, Result};
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::strategy::CacheStrategy;
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

/// Core cache expander - handles cache lookup and upstream fallback.
///
/// Concurrent misses on the same key are coalesced: the first caller runs the
/// loader while the others wait on a per-key gate, then read what it stored.
/// Different keys never block each other.
///
/// ```ignore
/// let expander = CacheExpander::new(InMemoryBackend::new());
///
/// let pokemon: Pokemon = expander
///     .fetch("pokemon:25", CacheStrategy::Refresh, || load_pikachu())
///     .await?;
/// ```
pub struct CacheExpander<B: CacheBackend> {
    backend: B,
    metrics: Box<dyn CacheMetrics>,
    in_flight: DashMap<String, Arc<Mutex<()>>>,
}

impl<B: CacheBackend> CacheExpander<B> {
    /// Create new expander with given backend.
    pub fn new(backend: B) -> Self {
        CacheExpander {
            backend,
            metrics: Box::new(NoOpMetrics),
            in_flight: DashMap::new(),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Look up `key`, falling back to `load` according to `strategy`.
    ///
    /// The loader runs at most once per call and only on a miss (or always,
    /// for `Bypass`/`Invalidate`). A successful load is stored before it is
    /// returned; a failed load stores nothing.
    ///
    /// # Errors
    ///
    /// - `Error::CacheMiss`: `Fresh` strategy and nothing cached
    /// - whatever `load` returns
    /// - `Error::SerializationError` when the loaded value cannot be encoded
    pub async fn fetch<V, F, Fut>(&self, key: &str, strategy: CacheStrategy, load: F) -> Result<V>
    where
        V: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        debug!("» Cache operation for key: {} (strategy: {})", key, strategy);

        match strategy {
            CacheStrategy::Fresh => self.strategy_fresh(key).await,
            CacheStrategy::Refresh => self.strategy_refresh(key, load).await,
            CacheStrategy::Invalidate => {
                self.backend.delete(key).await?;
                debug!("✓ Cache invalidated for {}", key);
                self.strategy_refresh(key, load).await
            }
            CacheStrategy::Bypass => {
                debug!("Bypassing cache read for {}", key);
                let timer = Instant::now();
                self.load_and_store(key, timer, load).await
            }
        }
    }

    /// Fresh strategy: Cache only, no upstream fallback.
    async fn strategy_fresh<V: Cacheable>(&self, key: &str) -> Result<V> {
        let timer = Instant::now();
        match self.lookup(key).await? {
            Some(value) => {
                self.metrics.record_hit(key, timer.elapsed());
                Ok(value)
            }
            None => {
                self.metrics.record_miss(key, timer.elapsed());
                debug!("✗ Cache miss (Fresh strategy) - no fallback");
                Err(Error::CacheMiss)
            }
        }
    }

    /// Refresh strategy: Try cache, fall back to the loader on miss.
    async fn strategy_refresh<V, F, Fut>(&self, key: &str, load: F) -> Result<V>
    where
        V: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let timer = Instant::now();

        if let Some(value) = self.lookup(key).await? {
            self.metrics.record_hit(key, timer.elapsed());
            return Ok(value);
        }

        let gate = self.in_flight.entry(key.to_string()).or_default().clone();
        let result = {
            let _guard = gate.lock().await;

            // Whoever held the gate before us may have filled the entry.
            match self.lookup(key).await? {
                Some(value) => {
                    debug!("✓ Coalesced load for {}", key);
                    self.metrics.record_hit(key, timer.elapsed());
                    Ok(value)
                }
                None => {
                    self.metrics.record_miss(key, timer.elapsed());
                    self.load_and_store(key, timer, load).await
                }
            }
        };

        // Our clone plus the map's; anything more is a waiter still queued.
        self.in_flight
            .remove_if(key, |_, gate| Arc::strong_count(gate) <= 2);

        result
    }

    async fn load_and_store<V, F, Fut>(&self, key: &str, timer: Instant, load: F) -> Result<V>
    where
        V: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let value = match load().await {
            Ok(value) => value,
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                return Err(e);
            }
        };

        let bytes = value.serialize_for_cache()?;
        self.backend.set(key, bytes).await?;
        self.metrics.record_set(key, timer.elapsed());
        info!("✓ Cached {} in {:?}", key, timer.elapsed());

        Ok(value)
    }

    /// Read and decode `key`. Unusable entries are evicted and reported as a miss.
    async fn lookup<V: Cacheable>(&self, key: &str) -> Result<Option<V>> {
        let Some(bytes) = self.backend.get(key).await? else {
            return Ok(None);
        };

        match V::deserialize_from_cache(&bytes).and_then(|value| value.validate().map(|_| value)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_corrupt_entry() => {
                warn!("Evicting unusable cache entry {}: {}", key, e);
                self.backend.delete(key).await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Drop every cached entry.
    pub async fn clear(&self) -> Result<()> {
        self.backend.clear_all().await
    }

    /// Get backend reference (for advanced use).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
