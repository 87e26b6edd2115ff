//! Raw PokeAPI payloads.
//!
//! Only the fields the mapper reads are modeled; everything else in the
//! upstream JSON is ignored.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// `GET /pokemon/{id}` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<RawTypeSlot>,
    #[serde(default)]
    pub sprites: Option<RawSprites>,
    #[serde(default)]
    pub stats: Vec<RawStat>,
    pub height: u32,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTypeSlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: Option<NamedResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSprites {
    pub front_default: Option<String>,
    pub back_default: Option<String>,
    #[serde(default)]
    pub other: Option<RawOtherSprites>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<RawArtwork>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawArtwork {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStat {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: Option<NamedResource>,
}

/// A `(name, url)` reference to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl NamedResource {
    /// Id of the referenced resource, parsed from its URL.
    pub fn id(&self) -> Result<u32> {
        parse_reference_id(&self.url)
    }
}

/// `GET /pokemon?limit={n}` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPokemonList {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

/// Extract the id from a reference URL such as
/// `https://pokeapi.co/api/v2/pokemon/37/`.
///
/// The id is the last non-empty path segment and must be a positive integer.
pub fn parse_reference_id(url: &str) -> Result<u32> {
    let segment = url
        .split('/')
        .filter(|part| !part.is_empty())
        .last()
        .ok_or_else(|| Error::Parse(format!("Reference URL has no path segments: {:?}", url)))?;

    let id: u32 = segment.parse().map_err(|e| {
        Error::Parse(format!(
            "Reference URL {:?} does not end in a numeric id: {}",
            url, e
        ))
    })?;

    if id == 0 {
        return Err(Error::Parse(format!("Reference URL {:?} has id 0", url)));
    }
    Ok(id)
}
