//! Metrics hooks for cache operations.
//!
//! Implement [`CacheMetrics`] to forward hits, misses, writes and upstream
//! failures to a monitoring system, then attach it with
//! [`crate::CacheExpander::with_metrics`]. The default is [`NoOpMetrics`].
//! [`CounterMetrics`] keeps in-process totals, which is enough for a health
//! or stats endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Trait for cache metrics collection.
///
/// The default method bodies log via the `log` crate.
pub trait CacheMetrics: Send + Sync {
    /// Record a cache hit.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// Record a cache miss.
    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// Record a cache write after an upstream load.
    fn record_set(&self, key: &str, duration: Duration) {
        debug!("Cache SET: {} took {:?}", key, duration);
    }

    /// Record a failed load.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_set(&self, _key: &str, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

/// Atomic counters for every cache event.
///
/// Clones share the same counters, so keep one clone and hand the other to
/// the expander.
#[derive(Clone, Default)]
pub struct CounterMetrics {
    inner: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    errors: AtomicU64,
}

/// Point-in-time copy of [`CounterMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub errors: u64,
}

impl CounterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            sets: self.inner.sets.load(Ordering::Relaxed),
            errors: self.inner.errors.load(Ordering::Relaxed),
        }
    }
}

impl CacheMetrics for CounterMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {
        self.inner.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self, _key: &str, _duration: Duration) {
        self.inner.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn record_set(&self, _key: &str, _duration: Duration) {
        self.inner.sets.fetch_add(1, Ordering::Relaxed);
    }

    fn record_error(&self, key: &str, error: &str) {
        self.inner.errors.fetch_add(1, Ordering::Relaxed);
        debug!("Counted cache error for {}: {}", key, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_hit("pokemon:1", Duration::from_secs(1));
        metrics.record_miss("pokemon:1", Duration::from_secs(2));
    }

    #[test]
    fn test_counter_metrics_shared_between_clones() {
        let metrics = CounterMetrics::new();
        let handed_out = metrics.clone();

        handed_out.record_miss("pokemon:1", Duration::ZERO);
        handed_out.record_set("pokemon:1", Duration::ZERO);
        handed_out.record_hit("pokemon:1", Duration::ZERO);
        handed_out.record_hit("pokemon:1", Duration::ZERO);
        handed_out.record_error("pokemon:2", "HTTP 404");

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                hits: 2,
                misses: 1,
                sets: 1,
                errors: 1,
            }
        );
    }
}
