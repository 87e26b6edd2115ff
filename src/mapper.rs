//! Raw PokeAPI record → [`Pokemon`].

use crate::error::{Error, Result};
use crate::pokemon::{Pokemon, Region, Sprites, Stat};
use crate::upstream::raw::{RawPokemon, RawSprites, RawStat, RawTypeSlot};

/// Every type, in the order PokeAPI numbers them.
pub const ALL_TYPES: [&str; 18] = [
    "Normal", "Fighting", "Flying", "Poison", "Ground", "Rock", "Bug", "Ghost", "Steel", "Fire",
    "Water", "Grass", "Electric", "Psychic", "Ice", "Dragon", "Dark", "Fairy",
];

/// Map a raw upstream record into the normalized entity.
///
/// # Errors
///
/// `Error::Mapping` if the id is 0, the name is empty, or a type/stat wrapper
/// lacks its nested resource. Missing sprite levels are not errors.
pub fn to_pokemon(raw: RawPokemon) -> Result<Pokemon> {
    if raw.id == 0 {
        return Err(Error::Mapping("record has id 0".to_string()));
    }
    if raw.name.is_empty() {
        return Err(Error::Mapping(format!("record {} has an empty name", raw.id)));
    }

    let types = map_types(raw.id, &raw.types)?;
    let stats = map_stats(raw.id, &raw.stats)?;

    Ok(Pokemon {
        id: raw.id,
        name: capitalize(&raw.name),
        region: Region::from_id(raw.id),
        weaknesses: weaknesses(&raw.types),
        sprites: map_sprites(raw.sprites.unwrap_or_default()),
        types,
        height: raw.height,
        weight: raw.weight,
        stats,
    })
}

/// Upper-case the first character; leave the rest untouched.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Weaknesses for a type combination.
///
/// Always the full 18-type list: type effectiveness is not modeled, and
/// callers rely on the list being stable.
pub fn weaknesses(_types: &[RawTypeSlot]) -> Vec<String> {
    ALL_TYPES.iter().map(|t| t.to_string()).collect()
}

fn map_types(id: u32, slots: &[RawTypeSlot]) -> Result<Vec<String>> {
    slots
        .iter()
        .map(|slot| {
            slot.kind
                .as_ref()
                .map(|kind| kind.name.clone())
                .ok_or_else(|| Error::Mapping(format!("record {} has a type slot without a type", id)))
        })
        .collect()
}

fn map_stats(id: u32, stats: &[RawStat]) -> Result<Vec<Stat>> {
    stats
        .iter()
        .map(|raw| {
            let stat = raw
                .stat
                .as_ref()
                .ok_or_else(|| Error::Mapping(format!("record {} has a stat without a name", id)))?;
            Ok(Stat {
                name: stat.name.clone(),
                base_stat: raw.base_stat,
            })
        })
        .collect()
}

fn map_sprites(raw: RawSprites) -> Sprites {
    let official_artwork = raw
        .other
        .and_then(|other| other.official_artwork)
        .and_then(|artwork| artwork.front_default);

    Sprites {
        front_default: raw.front_default,
        back_default: raw.back_default,
        official_artwork,
    }
}
