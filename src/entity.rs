//! Traits for values stored in the cache.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::hash::Hash;

/// Anything the cache can store under a key.
///
/// Encoding goes through [`crate::serialization`]; implementors only decide
/// what "valid" means after a value comes back out of the store.
pub trait Cacheable: Serialize + DeserializeOwned + Send + Sync {
    /// Encode for cache storage.
    fn serialize_for_cache(&self) -> Result<Vec<u8>> {
        crate::serialization::serialize_for_cache(self)
    }

    /// Decode from cache storage, validating the envelope.
    fn deserialize_from_cache(bytes: &[u8]) -> Result<Self> {
        crate::serialization::deserialize_from_cache(bytes)
    }

    /// Optional: check invariants after a cache read.
    ///
    /// A failing entry is evicted and reloaded from upstream.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// A single keyed entity.
///
/// # Example
///
/// ```
/// use pokecache::{CacheEntity, Cacheable};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct Berry {
///     id: u32,
///     name: String,
/// }
///
/// impl Cacheable for Berry {}
///
/// impl CacheEntity for Berry {
///     type Key = u32;
///     fn cache_prefix() -> &'static str { "berry" }
/// }
/// ```
pub trait CacheEntity: Cacheable + Clone {
    /// Type of the entity's identifier.
    type Key: Display + Clone + Send + Sync + Eq + Hash + 'static;

    /// Namespace for keys of this type; final keys look like `"{prefix}:{key}"`.
    fn cache_prefix() -> &'static str;
}

/// Lists of entities are cached as a single value (the full-list sentinel).
impl<T: CacheEntity> Cacheable for Vec<T> {
    fn validate(&self) -> Result<()> {
        self.iter().try_for_each(|item| item.validate())
    }
}
