//! Configuration values.
//!
//! Plain structs with defaults and `with_*` builders. Where the values come
//! from (files, env, flags) is up to the embedding application.

use std::ops::RangeInclusive;
use std::time::Duration;

/// Public PokeAPI v2 root.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Highest National Pokédex number the full-list endpoint is asked for.
pub const DEFAULT_MAX_POKEMON: u32 = 1025;

/// Upstream HTTP client settings.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: format!("pokecache/{}", crate::VERSION),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Settings for the fetch paths of [`crate::PokemonService`].
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// `limit` passed to the list endpoint when loading the full list.
    pub max_pokemon: u32,
    /// Upper bound on in-flight upstream fetches during the full-list fan-out.
    pub fetch_concurrency: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            max_pokemon: DEFAULT_MAX_POKEMON,
            fetch_concurrency: 32,
        }
    }
}

impl ServiceConfig {
    pub fn with_max_pokemon(mut self, max_pokemon: u32) -> Self {
        self.max_pokemon = max_pokemon;
        self
    }

    /// Values below 1 are treated as 1.
    pub fn with_fetch_concurrency(mut self, fetch_concurrency: usize) -> Self {
        self.fetch_concurrency = fetch_concurrency.max(1);
        self
    }
}

/// Schedule of the cache warmer.
///
/// The first pass starts after `initial_delay`; each later pass starts
/// `interval` after the previous one finished.
#[derive(Clone, Debug)]
pub struct WarmerConfig {
    pub initial_delay: Duration,
    pub interval: Duration,
    /// Ids loaded by each pass, in order.
    pub ids: RangeInclusive<u32>,
    /// Pause between consecutive upstream calls within a pass.
    pub politeness_delay: Duration,
}

impl Default for WarmerConfig {
    fn default() -> Self {
        WarmerConfig {
            initial_delay: Duration::from_millis(5_000),
            interval: Duration::from_millis(3_600_000),
            ids: 1..=50,
            politeness_delay: Duration::from_millis(100),
        }
    }
}

impl WarmerConfig {
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_ids(mut self, ids: RangeInclusive<u32>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_politeness_delay(mut self, politeness_delay: Duration) -> Self {
        self.politeness_delay = politeness_delay;
        self
    }
}
