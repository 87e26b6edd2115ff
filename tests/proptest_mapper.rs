//! Property-based tests for the mapper and cache encoding.
//!
//! # Properties Tested
//!
//! 1. **Region Property**: regions follow Pokédex ranges and never go backwards
//! 2. **Name Property**: capitalization is idempotent and only touches the first char
//! 3. **Weakness Property**: the weakness list does not depend on types
//! 4. **Mapping Property**: well-formed records always map and validate
//! 5. **Reference Property**: ids survive the reference URL format
//! 6. **Envelope Property**: cached bytes carry the header; truncation never panics

use pokecache::mapper::{capitalize, to_pokemon, weaknesses, ALL_TYPES};
use pokecache::serialization::{CACHE_MAGIC, CURRENT_SCHEMA_VERSION};
use pokecache::upstream::parse_reference_id;
use pokecache::upstream::raw::{
    NamedResource, RawArtwork, RawOtherSprites, RawPokemon, RawSprites, RawStat, RawTypeSlot,
};
use pokecache::{Cacheable, Pokemon, Region};
use proptest::prelude::*;

const REGION_ORDER: [Region; 9] = [
    Region::Kanto,
    Region::Johto,
    Region::Hoenn,
    Region::Sinnoh,
    Region::Unova,
    Region::Kalos,
    Region::Alola,
    Region::Galar,
    Region::Paldea,
];

fn region_rank(region: Region) -> usize {
    REGION_ORDER
        .iter()
        .position(|r| *r == region)
        .expect("every region is ranked")
}

// ============================================================================
// Arbitrary Implementations (for property-based testing)
// ============================================================================

fn arb_named() -> impl Strategy<Value = NamedResource> {
    ("[a-z][a-z-]{0,11}", 1u32..2000).prop_map(|(name, id)| NamedResource {
        url: format!("https://pokeapi.co/api/v2/resource/{}/", id),
        name,
    })
}

fn arb_type_slots() -> impl Strategy<Value = Vec<RawTypeSlot>> {
    prop::collection::vec(arb_named(), 0..3).prop_map(|kinds| {
        kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| RawTypeSlot {
                slot: i as u8 + 1,
                kind: Some(kind),
            })
            .collect()
    })
}

fn arb_sprites() -> impl Strategy<Value = Option<RawSprites>> {
    proptest::option::of((
        proptest::option::of("https://[a-z]{1,8}\\.test/[0-9]{1,4}\\.png"),
        proptest::option::of("https://[a-z]{1,8}\\.test/[0-9]{1,4}\\.png"),
        proptest::option::of(proptest::option::of(proptest::option::of(
            "https://[a-z]{1,8}\\.test/[0-9]{1,4}\\.png",
        ))),
    ))
    .prop_map(|sprites| {
        sprites.map(|(front, back, other)| RawSprites {
            front_default: front,
            back_default: back,
            other: other.map(|artwork| RawOtherSprites {
                official_artwork: artwork.map(|front_default| RawArtwork { front_default }),
            }),
        })
    })
}

/// Generate a well-formed raw record
fn arb_raw_pokemon() -> impl Strategy<Value = RawPokemon> {
    (
        1u32..2000,
        "[a-z][a-z0-9-]{0,15}",
        arb_type_slots(),
        arb_sprites(),
        prop::collection::vec((0u32..256, 0u32..4, arb_named()), 0..7),
        any::<u32>(),
        any::<u32>(),
    )
        .prop_map(|(id, name, types, sprites, stats, height, weight)| RawPokemon {
            id,
            name,
            types,
            sprites,
            stats: stats
                .into_iter()
                .map(|(base_stat, effort, stat)| RawStat {
                    base_stat,
                    effort,
                    stat: Some(stat),
                })
                .collect(),
            height,
            weight,
        })
}

// ============================================================================
// Property 1: Region
// ============================================================================

proptest! {
    /// Property: region never moves backwards as the id grows
    #[test]
    fn prop_region_is_monotonic(a in 1u32..3000, b in 1u32..3000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(region_rank(Region::from_id(low)) <= region_rank(Region::from_id(high)));
    }

    /// Property: the first 151 are always Kanto
    #[test]
    fn prop_kanto_range(id in 1u32..=151) {
        prop_assert_eq!(Region::from_id(id), Region::Kanto);
    }

    /// Property: everything past Galar is Paldea
    #[test]
    fn prop_paldea_tail(id in 906u32..=u32::MAX) {
        prop_assert_eq!(Region::from_id(id), Region::Paldea);
    }
}

// ============================================================================
// Property 2: Name capitalization
// ============================================================================

proptest! {
    /// Property: capitalize(capitalize(x)) == capitalize(x)
    #[test]
    fn prop_capitalize_idempotent(name in "[a-zA-Z][a-z0-9-]{0,20}") {
        let once = capitalize(&name);
        prop_assert_eq!(capitalize(&once), once);
    }

    /// Property: only the first character changes
    #[test]
    fn prop_capitalize_keeps_tail(name in "[a-z][a-z0-9-]{0,20}") {
        let capitalized = capitalize(&name);
        prop_assert_eq!(&capitalized[1..], &name[1..]);
        prop_assert!(capitalized.chars().next().unwrap().is_uppercase());
    }
}

// ============================================================================
// Property 3: Weaknesses
// ============================================================================

proptest! {
    /// Property: any type combination yields the fixed 18-type list
    #[test]
    fn prop_weaknesses_fixed(types in arb_type_slots()) {
        let list = weaknesses(&types);
        prop_assert_eq!(list.len(), 18);
        prop_assert!(list.iter().zip(ALL_TYPES.iter()).all(|(a, b)| a == b));
    }
}

// ============================================================================
// Property 4: Mapping
// ============================================================================

proptest! {
    /// Property: well-formed records map, keep their order, and validate
    #[test]
    fn prop_well_formed_records_map(raw in arb_raw_pokemon()) {
        let pokemon = to_pokemon(raw.clone()).expect("well-formed record should map");

        prop_assert_eq!(pokemon.id, raw.id);
        prop_assert_eq!(pokemon.region, Region::from_id(raw.id));
        prop_assert_eq!(pokemon.types.len(), raw.types.len());
        prop_assert_eq!(pokemon.stats.len(), raw.stats.len());
        for (stat, raw_stat) in pokemon.stats.iter().zip(raw.stats.iter()) {
            prop_assert_eq!(stat.base_stat, raw_stat.base_stat);
        }

        let artwork = raw
            .sprites
            .as_ref()
            .and_then(|s| s.other.as_ref())
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|a| a.front_default.clone());
        prop_assert_eq!(&pokemon.sprites.official_artwork, &artwork);

        prop_assert!(pokemon.validate().is_ok());
    }

    /// Property: a stat wrapper without its stat never maps
    #[test]
    fn prop_missing_stat_is_mapping_error(mut raw in arb_raw_pokemon(), base in 0u32..256) {
        raw.stats.push(RawStat { base_stat: base, effort: 0, stat: None });
        prop_assert!(matches!(to_pokemon(raw), Err(pokecache::Error::Mapping(_))));
    }
}

// ============================================================================
// Property 5: Reference URLs
// ============================================================================

proptest! {
    /// Property: the id at the end of a reference URL is recovered
    #[test]
    fn prop_reference_id_roundtrip(id in 1u32..=u32::MAX, trailing in any::<bool>()) {
        let url = format!(
            "https://pokeapi.co/api/v2/pokemon/{}{}",
            id,
            if trailing { "/" } else { "" }
        );
        prop_assert_eq!(parse_reference_id(&url).unwrap(), id);
    }

    /// Property: a non-numeric tail is always a Parse error
    #[test]
    fn prop_reference_non_numeric(tail in "[a-z]{1,10}") {
        let url = format!("https://pokeapi.co/api/v2/pokemon/{}/", tail);
        prop_assert!(matches!(parse_reference_id(&url), Err(pokecache::Error::Parse(_))));
    }
}

// ============================================================================
// Property 6: Envelope
// ============================================================================

proptest! {
    /// Property: every cached entity starts with magic + version
    #[test]
    fn prop_envelope_header(raw in arb_raw_pokemon()) {
        let pokemon = to_pokemon(raw).unwrap();
        let bytes = pokemon.serialize_for_cache().unwrap();

        prop_assert_eq!(&bytes[0..4], &CACHE_MAGIC);
        let (version, _) = postcard::take_from_bytes::<u32>(&bytes[4..]).unwrap();
        prop_assert_eq!(version, CURRENT_SCHEMA_VERSION);

        prop_assert_eq!(Pokemon::deserialize_from_cache(&bytes).unwrap(), pokemon);
    }

    /// Property: any strict prefix of a cached entry is rejected, not panicked on
    #[test]
    fn prop_truncated_entry_rejected(raw in arb_raw_pokemon(), cut in any::<prop::sample::Index>()) {
        let bytes = to_pokemon(raw).unwrap().serialize_for_cache().unwrap();
        let len = cut.index(bytes.len());

        prop_assert!(Pokemon::deserialize_from_cache(&bytes[..len]).is_err());
    }
}
