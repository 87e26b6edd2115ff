//! Normalized Pokémon entity.

use crate::entity::{CacheEntity, Cacheable};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized Pokémon record, built once by the mapper and never mutated.
///
/// Serializes to camelCase JSON for whatever serving layer sits on top.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pokemon {
    pub id: u32,
    /// First letter capitalized, never empty.
    pub name: String,
    pub types: Vec<String>,
    pub region: Region,
    pub weaknesses: Vec<String>,
    pub sprites: Sprites,
    /// Decimetres, as reported upstream.
    pub height: u32,
    /// Hectograms, as reported upstream.
    pub weight: u32,
    pub stats: Vec<Stat>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprites {
    pub front_default: Option<String>,
    pub back_default: Option<String>,
    pub official_artwork: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub name: String,
    pub base_stat: u32,
}

/// Home region, derived from the National Pokédex number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Kanto,
    Johto,
    Hoenn,
    Sinnoh,
    Unova,
    Kalos,
    Alola,
    Galar,
    Paldea,
}

/// Inclusive upper id bound of each region, in Pokédex order.
const REGION_BOUNDS: [(u32, Region); 8] = [
    (151, Region::Kanto),
    (251, Region::Johto),
    (386, Region::Hoenn),
    (493, Region::Sinnoh),
    (649, Region::Unova),
    (721, Region::Kalos),
    (809, Region::Alola),
    (905, Region::Galar),
];

impl Region {
    /// Region for a Pokédex number. Everything past Galar is Paldea.
    pub fn from_id(id: u32) -> Self {
        REGION_BOUNDS
            .iter()
            .find(|(upper, _)| id <= *upper)
            .map(|(_, region)| *region)
            .unwrap_or(Region::Paldea)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Kanto => "Kanto",
            Region::Johto => "Johto",
            Region::Hoenn => "Hoenn",
            Region::Sinnoh => "Sinnoh",
            Region::Unova => "Unova",
            Region::Kalos => "Kalos",
            Region::Alola => "Alola",
            Region::Galar => "Galar",
            Region::Paldea => "Paldea",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Cacheable for Pokemon {
    fn validate(&self) -> Result<()> {
        if self.id == 0 {
            return Err(Error::ValidationError("Pokémon id must be positive".to_string()));
        }
        if self.name.is_empty() {
            return Err(Error::ValidationError(format!(
                "Pokémon {} has an empty name",
                self.id
            )));
        }
        // Same rule the mapper applies, so anything it produces reads back.
        if self.name != crate::mapper::capitalize(&self.name) {
            return Err(Error::ValidationError(format!(
                "Pokémon {} name is not capitalized: {}",
                self.id, self.name
            )));
        }
        Ok(())
    }
}

impl CacheEntity for Pokemon {
    type Key = u32;

    fn cache_prefix() -> &'static str {
        "pokemon"
    }
}
