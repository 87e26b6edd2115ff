//! # pokecache
//!
//! A read-through cache in front of [PokeAPI](https://pokeapi.co).
//!
//! ## Features
//!
//! - **Read-through:** single entities and the full list are fetched once,
//!   then served from cache for the life of the process
//! - **Single-flight:** concurrent misses for the same key share one upstream call
//! - **Best-effort batches:** a failing id is logged and skipped, never fatal
//! - **Background warming:** a scheduled task preloads the first Pokémon
//! - **Pluggable upstream:** anything implementing [`PokemonSource`]; an
//!   in-process [`InMemorySource`] ships for tests
//!
//! ## Quick Start
//!
//! ```ignore
//! use pokecache::{
//!     backend::InMemoryBackend, CacheWarmer, ClientConfig, PokeApiClient, PokemonService,
//!     WarmerConfig,
//! };
//! use std::sync::Arc;
//!
//! let client = Arc::new(PokeApiClient::new(ClientConfig::default())?);
//! let service = PokemonService::new(InMemoryBackend::new(), client);
//!
//! // Preload ids 1..=50 in the background.
//! let warmer = CacheWarmer::new(service.clone(), WarmerConfig::default()).spawn();
//!
//! let pikachu = service.get_by_id(25).await?;
//! let page = service.get_batch(0, 20).await;
//!
//! warmer.shutdown().await;
//! ```
//!
//! ### Lower level
//!
//! [`CacheExpander`] is the generic read-through core and works for any
//! [`Cacheable`] value:
//!
//! ```ignore
//! let expander = CacheExpander::new(InMemoryBackend::new());
//! let value: Pokemon = expander
//!     .fetch("pokemon:25", CacheStrategy::Refresh, || load())
//!     .await?;
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod config;
pub mod entity;
pub mod error;
pub mod expander;
pub mod key;
pub mod mapper;
pub mod observability;
pub mod pokemon;
pub mod serialization;
pub mod service;
pub mod strategy;
pub mod upstream;
pub mod warmer;

pub use backend::CacheBackend;
pub use config::{ClientConfig, ServiceConfig, WarmerConfig};
pub use entity::{CacheEntity, Cacheable};
pub use error::{Error, Result};
pub use expander::CacheExpander;
pub use key::CacheKeyBuilder;
pub use observability::{CacheMetrics, CounterMetrics, NoOpMetrics};
pub use pokemon::{Pokemon, Region, Sprites, Stat};
pub use service::PokemonService;
pub use strategy::CacheStrategy;
pub use upstream::{InMemorySource, PokeApiClient, PokemonSource};
pub use warmer::{CacheWarmer, WarmReport, WarmerHandle};

/// Crate version, also sent in the default user agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
