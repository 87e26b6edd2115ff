//! In-process stand-in for PokeAPI.

use super::raw::{NamedResource, RawPokemon, RawSprites, RawStat, RawTypeSlot};
use super::PokemonSource;
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Stub source for tests and offline demos.
///
/// Serves records from a map, counts every call, and can be told to fail
/// specific ids, every n-th call or the list request, or to respond slowly.
///
/// ```ignore
/// let source = Arc::new(InMemorySource::with_range(1..=5).fail_on(3));
/// let service = PokemonService::new(InMemoryBackend::new(), source.clone());
///
/// let batch = service.get_batch(0, 5).await;
/// assert_eq!(batch.len(), 4);
/// assert_eq!(source.calls(), 5);
/// ```
#[derive(Default)]
pub struct InMemorySource {
    records: BTreeMap<u32, RawPokemon>,
    extra_references: Vec<NamedResource>,
    failing_ids: HashSet<u32>,
    fail_every: Option<usize>,
    latency: Option<Duration>,
    list_failing: AtomicBool,
    calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl InMemorySource {
    /// Create an empty source; every id is "not found".
    pub fn new() -> Self {
        Self::default()
    }

    /// Source pre-populated with [`InMemorySource::synthetic`] records.
    pub fn with_range(ids: impl IntoIterator<Item = u32>) -> Self {
        let mut source = Self::new();
        for id in ids {
            source.insert(Self::synthetic(id));
        }
        source
    }

    /// A plausible raw record for `id`, named `specimen-{id}`.
    pub fn synthetic(id: u32) -> RawPokemon {
        let named = |name: &str| NamedResource {
            name: name.to_string(),
            url: String::new(),
        };

        RawPokemon {
            id,
            name: format!("specimen-{}", id),
            types: vec![RawTypeSlot {
                slot: 1,
                kind: Some(named("normal")),
            }],
            sprites: Some(RawSprites {
                front_default: Some(format!("https://sprites.test/{}.png", id)),
                back_default: None,
                other: None,
            }),
            stats: vec![RawStat {
                base_stat: 50,
                effort: 0,
                stat: Some(named("hp")),
            }],
            height: 10,
            weight: 100,
        }
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, raw: RawPokemon) {
        self.records.insert(raw.id, raw);
    }

    /// Fail every request for `id`.
    pub fn fail_on(mut self, id: u32) -> Self {
        self.failing_ids.insert(id);
        self
    }

    /// Fail every `n`-th request (counting from 1 across all ids).
    pub fn fail_every(mut self, n: usize) -> Self {
        self.fail_every = Some(n.max(1));
        self
    }

    /// Fail the list request until [`InMemorySource::set_list_failing`] clears it.
    pub fn fail_list(self) -> Self {
        self.list_failing.store(true, Ordering::SeqCst);
        self
    }

    /// Switch list failures on or off on a shared source.
    pub fn set_list_failing(&self, failing: bool) {
        self.list_failing.store(failing, Ordering::SeqCst);
    }

    /// Delay every response.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Append a reference to the list response verbatim (e.g. a malformed URL).
    pub fn with_reference(mut self, reference: NamedResource) -> Self {
        self.extra_references.push(reference);
        self
    }

    /// Number of `fetch_by_id` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of `fetch_list` calls so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl PokemonSource for InMemorySource {
    async fn fetch_by_id(&self, id: u32) -> Result<RawPokemon> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.simulate_latency().await;

        if self.failing_ids.contains(&id) || self.fail_every.is_some_and(|n| call % n == 0) {
            return Err(Error::fetch(id, "injected failure"));
        }

        self.records
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::fetch(id, "HTTP 404 Not Found"))
    }

    async fn fetch_list(&self, limit: u32) -> Result<Vec<NamedResource>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.list_failing.load(Ordering::SeqCst) {
            return Err(Error::fetch("pokemon list", "injected failure"));
        }

        Ok(self
            .records
            .values()
            .map(|raw| NamedResource {
                name: raw.name.clone(),
                url: format!("https://pokeapi.co/api/v2/pokemon/{}/", raw.id),
            })
            .chain(self.extra_references.iter().cloned())
            .take(limit as usize)
            .collect())
    }
}
