//! Upstream Pokémon data sources.
//!
//! The [`PokemonSource`] trait decouples the cache from PokeAPI itself, so
//! tests (and alternative mirrors) can plug in their own source.
//!
//! - [`PokeApiClient`]: HTTP client for the real API
//! - [`InMemorySource`]: in-process stub with call counting and failure
//!   injection, for tests

use crate::error::Result;
use std::future::Future;

pub mod memory;
pub mod pokeapi;
pub mod raw;

pub use memory::InMemorySource;
pub use pokeapi::PokeApiClient;
pub use raw::{parse_reference_id, NamedResource, RawPokemon, RawPokemonList};

/// Trait for upstream source implementations.
///
/// One call is one upstream request; implementations do not retry.
pub trait PokemonSource: Send + Sync + 'static {
    /// Fetch the raw record for `id`.
    ///
    /// # Errors
    /// `Error::Fetch` on transport failure, non-2xx status or malformed body.
    fn fetch_by_id(&self, id: u32) -> impl Future<Output = Result<RawPokemon>> + Send;

    /// Fetch up to `limit` references, in upstream order.
    ///
    /// # Errors
    /// `Error::Fetch` on transport failure, non-2xx status or malformed body.
    fn fetch_list(&self, limit: u32) -> impl Future<Output = Result<Vec<NamedResource>>> + Send;
}

impl<S: PokemonSource> PokemonSource for std::sync::Arc<S> {
    fn fetch_by_id(&self, id: u32) -> impl Future<Output = Result<RawPokemon>> + Send {
        (**self).fetch_by_id(id)
    }

    fn fetch_list(&self, limit: u32) -> impl Future<Output = Result<Vec<NamedResource>>> + Send {
        (**self).fetch_list(limit)
    }
}
