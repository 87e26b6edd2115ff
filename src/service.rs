//! High-level Pokémon service: the entity cache and the batch fetcher.
//!
//! Wraps a [`CacheExpander`] in an `Arc` together with an upstream
//! [`PokemonSource`], so one service can be cloned into request handlers and
//! the background warmer alike.

use crate::backend::CacheBackend;
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::expander::CacheExpander;
use crate::key::CacheKeyBuilder;
use crate::mapper;
use crate::observability::CacheMetrics;
use crate::pokemon::Pokemon;
use crate::strategy::CacheStrategy;
use crate::upstream::PokemonSource;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Read-through Pokémon cache over an upstream source.
///
/// Since `CacheBackend` implementations use interior mutability and
/// `CacheExpander` only needs `&self`, cloning is cheap and every clone sees
/// the same cache.
///
/// ```ignore
/// let source = Arc::new(PokeApiClient::new(ClientConfig::default())?);
/// let service = PokemonService::new(InMemoryBackend::new(), source);
///
/// let pikachu = service.get_by_id(25).await?;
/// let first_page = service.get_batch(0, 20).await;
/// ```
pub struct PokemonService<B: CacheBackend, S: PokemonSource> {
    expander: Arc<CacheExpander<B>>,
    source: Arc<S>,
    config: ServiceConfig,
}

impl<B: CacheBackend, S: PokemonSource> Clone for PokemonService<B, S> {
    fn clone(&self) -> Self {
        PokemonService {
            expander: Arc::clone(&self.expander),
            source: Arc::clone(&self.source),
            config: self.config.clone(),
        }
    }
}

impl<B: CacheBackend, S: PokemonSource> PokemonService<B, S> {
    /// Create a new service with the given backend and upstream source.
    pub fn new(backend: B, source: Arc<S>) -> Self {
        PokemonService {
            expander: Arc::new(CacheExpander::new(backend)),
            source,
            config: ServiceConfig::default(),
        }
    }

    /// Create a new service with custom metrics.
    pub fn with_metrics(backend: B, source: Arc<S>, metrics: Box<dyn CacheMetrics>) -> Self {
        PokemonService {
            expander: Arc::new(CacheExpander::new(backend).with_metrics(metrics)),
            source,
            config: ServiceConfig::default(),
        }
    }

    /// Replace the fan-out configuration.
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get backend reference (for stats and advanced use).
    pub fn backend(&self) -> &B {
        self.expander.backend()
    }

    /// Fetch one Pokémon, serving from cache when possible.
    ///
    /// Equivalent to [`PokemonService::get_by_id_with`] using
    /// [`CacheStrategy::Refresh`].
    pub async fn get_by_id(&self, id: u32) -> Result<Pokemon> {
        self.get_by_id_with(id, CacheStrategy::Refresh).await
    }

    /// Fetch one Pokémon with an explicit cache strategy.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidId`: `id` is 0 (no cache or upstream access)
    /// - `Error::Fetch` / `Error::Mapping`: upstream failed; nothing is cached
    /// - `Error::CacheMiss`: `Fresh` strategy and `id` not cached
    pub async fn get_by_id_with(&self, id: u32, strategy: CacheStrategy) -> Result<Pokemon> {
        if id == 0 {
            return Err(Error::InvalidId(id));
        }

        let key = CacheKeyBuilder::build::<Pokemon>(&id);
        self.expander
            .fetch(&key, strategy, || self.load_one(id))
            .await
    }

    /// Fetch every Pokémon the upstream lists, cached as one entry.
    ///
    /// Equivalent to [`PokemonService::get_all_with`] using
    /// [`CacheStrategy::Refresh`].
    pub async fn get_all(&self) -> Result<Vec<Pokemon>> {
        self.get_all_with(CacheStrategy::Refresh).await
    }

    /// Fetch the full list with an explicit cache strategy.
    ///
    /// On a miss the reference list is resolved (up to `max_pokemon`
    /// entries) and every referenced id is fetched through the per-id cache,
    /// at most `fetch_concurrency` at a time. Unparsable references and
    /// failed ids are logged and left out. The result is ordered by id.
    ///
    /// # Errors
    ///
    /// Only when the reference list itself cannot be fetched. Per-id failures
    /// never fail the whole call.
    pub async fn get_all_with(&self, strategy: CacheStrategy) -> Result<Vec<Pokemon>> {
        let key = CacheKeyBuilder::all::<Pokemon>();
        self.expander.fetch(&key, strategy, || self.load_all()).await
    }

    /// Fetch ids `offset + 1 ..= offset + limit` one after another.
    ///
    /// Best-effort: ids that fail are logged at `warn` and skipped, so the
    /// result may be shorter than `limit`. Output is in id order. A window
    /// starting past `u32::MAX` is empty; one running past it is cut there.
    pub async fn get_batch(&self, offset: u32, limit: u32) -> Vec<Pokemon> {
        if limit == 0 {
            return Vec::new();
        }

        let Some(first) = offset.checked_add(1) else {
            return Vec::new();
        };
        let last = offset.saturating_add(limit);
        let mut batch = Vec::new();

        for id in first..=last {
            match self.get_by_id(id).await {
                Ok(pokemon) => batch.push(pokemon),
                Err(e) => warn!("Failed to fetch Pokémon ID {}: {}", id, e),
            }
        }

        debug!("Batch {}..={} -> {} entities", first, last, batch.len());
        batch
    }

    /// Drop every cached entry.
    pub async fn clear(&self) -> Result<()> {
        info!("Clearing Pokémon cache");
        self.expander.clear().await
    }

    async fn load_one(&self, id: u32) -> Result<Pokemon> {
        let raw = self.source.fetch_by_id(id).await?;
        mapper::to_pokemon(raw)
    }

    async fn load_all(&self) -> Result<Vec<Pokemon>> {
        let references = self.source.fetch_list(self.config.max_pokemon).await?;
        info!("Resolving {} Pokémon references", references.len());

        let ids: Vec<u32> = references
            .iter()
            .filter_map(|reference| match reference.id() {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("Skipping reference {}: {}", reference.name, e);
                    None
                }
            })
            .collect();

        let results: Vec<(u32, Result<Pokemon>)> = stream::iter(ids)
            .map(|id| async move { (id, self.get_by_id(id).await) })
            .buffer_unordered(self.config.fetch_concurrency)
            .collect()
            .await;

        let mut all: Vec<Pokemon> = results
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(pokemon) => Some(pokemon),
                Err(e) => {
                    warn!("Failed to fetch Pokémon ID {}: {}", id, e);
                    None
                }
            })
            .collect();
        all.sort_by_key(|pokemon| pokemon.id);

        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::observability::CounterMetrics;
    use crate::upstream::InMemorySource;

    fn service(source: InMemorySource) -> (PokemonService<InMemoryBackend, InMemorySource>, Arc<InMemorySource>) {
        let source = Arc::new(source);
        (PokemonService::new(InMemoryBackend::new(), Arc::clone(&source)), source)
    }

    #[tokio::test]
    async fn test_get_by_id_caches_after_first_call() {
        let (service, source) = service(InMemorySource::with_range(1..=3));

        let first = service.get_by_id(2).await.expect("Failed to fetch");
        let second = service.get_by_id(2).await.expect("Failed to fetch");

        assert_eq!(first, second);
        assert_eq!(first.name, "Specimen-2");
        assert_eq!(source.calls(), 1);
        assert!(service.backend().get("pokemon:2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_get_by_id_rejects_zero() {
        let (service, source) = service(InMemorySource::with_range(1..=3));

        let result = service.get_by_id(0).await;

        assert!(matches!(result, Err(Error::InvalidId(0))));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_by_id_failure_is_not_cached() {
        let (service, source) = service(InMemorySource::with_range(1..=3).fail_on(2));

        assert!(service.get_by_id(2).await.is_err());
        assert!(service.get_by_id(2).await.is_err());

        assert_eq!(source.calls(), 2);
        assert!(service.backend().is_empty());
    }

    #[tokio::test]
    async fn test_get_batch_skips_failures() {
        let (service, _source) = service(InMemorySource::with_range(1..=5).fail_on(3));

        let ids: Vec<u32> = service.get_batch(0, 5).await.iter().map(|p| p.id).collect();

        assert_eq!(ids, vec![1, 2, 4, 5]);
    }

    #[tokio::test]
    async fn test_get_batch_window_and_empty_limit() {
        let (service, source) = service(InMemorySource::with_range(1..=10));

        let ids: Vec<u32> = service.get_batch(4, 3).await.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 6, 7]);

        assert!(service.get_batch(4, 0).await.is_empty());
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_get_batch_window_at_id_ceiling() {
        let mut source = InMemorySource::with_range([u32::MAX - 1]);
        source.insert(InMemorySource::synthetic(u32::MAX));
        let (service, source) = service(source);

        assert!(service.get_batch(u32::MAX, 5).await.is_empty());
        assert_eq!(source.calls(), 0);

        let ids: Vec<u32> = service.get_batch(u32::MAX - 2, 5).await.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![u32::MAX - 1, u32::MAX]);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_get_all_is_ordered_and_cached() {
        let (service, source) = service(InMemorySource::with_range(1..=40));
        let service = service.with_config(ServiceConfig::default().with_fetch_concurrency(8));

        let all = service.get_all().await.expect("Failed to fetch all");
        let ids: Vec<u32> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=40).collect::<Vec<_>>());

        let again = service.get_all().await.expect("Failed to fetch all");
        assert_eq!(again.len(), 40);
        assert_eq!(source.list_calls(), 1);
        assert_eq!(source.calls(), 40);

        // Per-id entries were populated on the way.
        service.get_by_id(17).await.unwrap();
        assert_eq!(source.calls(), 40);
    }

    #[tokio::test]
    async fn test_get_all_respects_max_pokemon() {
        let (service, _source) = service(InMemorySource::with_range(1..=10));
        let service = service.with_config(ServiceConfig::default().with_max_pokemon(4));

        let all = service.get_all().await.expect("Failed to fetch all");

        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_strategies_through_service() {
        let metrics = CounterMetrics::new();
        let source = Arc::new(InMemorySource::with_range(1..=3));
        let service = PokemonService::with_metrics(
            InMemoryBackend::new(),
            Arc::clone(&source),
            Box::new(metrics.clone()),
        );

        assert!(matches!(
            service.get_by_id_with(1, CacheStrategy::Fresh).await,
            Err(Error::CacheMiss)
        ));
        service.get_by_id(1).await.unwrap();
        service.get_by_id_with(1, CacheStrategy::Fresh).await.unwrap();
        service.get_by_id_with(1, CacheStrategy::Bypass).await.unwrap();

        assert_eq!(source.calls(), 2);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.sets, 2);
    }

    #[tokio::test]
    async fn test_clear_forces_reload() {
        let (service, source) = service(InMemorySource::with_range(1..=3));

        service.get_by_id(1).await.unwrap();
        service.clear().await.unwrap();
        service.get_by_id(1).await.unwrap();

        assert_eq!(source.calls(), 2);
    }
}
