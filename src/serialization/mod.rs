//! Versioned binary envelopes for cached values.
//!
//! Every cached value is stored as:
//!
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│VERSION (4 bytes)│POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────────────────┘
//!   "PKMN"              u32                postcard::to_allocvec(T)
//! ```
//!
//! Entries with the wrong magic or an older schema version are rejected, and
//! the read-through path evicts and reloads them.
//!
//! ```rust
//! use pokecache::serialization::{deserialize_from_cache, serialize_for_cache};
//!
//! # fn main() -> pokecache::Result<()> {
//! let bytes = serialize_for_cache(&vec![1u32, 4, 7])?;
//! assert_eq!(&bytes[0..4], b"PKMN");
//!
//! let ids: Vec<u32> = deserialize_from_cache(&bytes)?;
//! assert_eq!(ids, vec![1, 4, 7]);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Magic header for cache entries.
pub const CACHE_MAGIC: [u8; 4] = *b"PKMN";

/// Current schema version.
///
/// Bump when `Pokemon` (or anything nested in it) changes shape.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Envelope wrapped around every cached payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheEnvelope<T> {
    pub magic: [u8; 4],
    pub version: u32,
    pub payload: T,
}

impl<T> CacheEnvelope<T> {
    /// Wrap `payload` with the current magic and version.
    pub fn new(payload: T) -> Self {
        Self {
            magic: CACHE_MAGIC,
            version: CURRENT_SCHEMA_VERSION,
            payload,
        }
    }
}

/// Encode a value for cache storage.
///
/// # Errors
///
/// Returns `Error::SerializationError` if postcard encoding fails.
pub fn serialize_for_cache<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let envelope = CacheEnvelope::new(value);
    postcard::to_allocvec(&envelope).map_err(|e| {
        error!("Cache serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Decode a cached value, checking magic and schema version first.
///
/// # Errors
///
/// - `Error::InvalidCacheEntry`: header is not `PKMN`
/// - `Error::VersionMismatch`: written by another schema version
/// - `Error::DeserializationError`: payload is corrupt or truncated
pub fn deserialize_from_cache<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T> {
    check_header(bytes)?;

    let envelope: CacheEnvelope<T> = postcard::from_bytes(bytes).map_err(|e| {
        warn!("Cache payload could not be decoded: {}", e);
        Error::DeserializationError(e.to_string())
    })?;

    Ok(envelope.payload)
}

/// Validate the fixed-size header without touching the payload.
///
/// Postcard encodes `[u8; 4]` as four raw bytes and `u32` as a varint, so the
/// magic can be compared directly and the version decoded from the rest.
fn check_header(bytes: &[u8]) -> Result<()> {
    if bytes.len() < CACHE_MAGIC.len() || bytes[..CACHE_MAGIC.len()] != CACHE_MAGIC {
        let found = &bytes[..bytes.len().min(CACHE_MAGIC.len())];
        warn!("Invalid cache entry: magic {:?}", found);
        return Err(Error::InvalidCacheEntry(format!(
            "Invalid magic: expected {:?}, got {:?}",
            CACHE_MAGIC, found
        )));
    }

    let (version, _) = postcard::take_from_bytes::<u32>(&bytes[CACHE_MAGIC.len()..])
        .map_err(|e| Error::DeserializationError(format!("Truncated cache header: {}", e)))?;

    if version != CURRENT_SCHEMA_VERSION {
        warn!(
            "Cache version mismatch: expected {}, got {}",
            CURRENT_SCHEMA_VERSION, version
        );
        return Err(Error::VersionMismatch {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }

    Ok(())
}
