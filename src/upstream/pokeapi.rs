//! PokeAPI HTTP client.

use super::raw::{NamedResource, RawPokemon, RawPokemonList};
use super::PokemonSource;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Client for `GET {base}/pokemon/{id}` and `GET {base}/pokemon?limit={n}`.
///
/// Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: Client,
    base_url: String,
}

impl PokeApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    /// `Error::ConfigError` if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(http, config.base_url))
    }

    /// Use an existing `reqwest::Client`.
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn pokemon_url(&self, id: u32) -> String {
        format!("{}/pokemon/{}", self.base_url, id)
    }

    fn list_url(&self, limit: u32) -> String {
        format!("{}/pokemon?limit={}", self.base_url, limit)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("HTTP {}", status)));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                Error::fetch(url, format!("malformed body: {}", e))
            } else {
                e.into()
            }
        })
    }
}

impl PokemonSource for PokeApiClient {
    async fn fetch_by_id(&self, id: u32) -> Result<RawPokemon> {
        if id == 0 {
            return Err(Error::InvalidId(id));
        }
        info!("Fetching Pokémon data from PokeAPI for ID: {}", id);
        self.get_json(&self.pokemon_url(id)).await
    }

    async fn fetch_list(&self, limit: u32) -> Result<Vec<NamedResource>> {
        info!("Fetching Pokémon reference list (limit {})", limit);
        let list: RawPokemonList = self.get_json(&self.list_url(limit)).await?;
        Ok(list.results)
    }
}
