//! Cache key construction.

use crate::entity::CacheEntity;

/// Suffix of the sentinel key holding the full entity list.
pub const ALL_SENTINEL: &str = "all";

/// Builder for cache keys.
pub struct CacheKeyBuilder;

impl CacheKeyBuilder {
    /// Key for a single entity: `"{prefix}:{id}"`.
    pub fn build<T: CacheEntity>(id: &T::Key) -> String {
        format!("{}:{}", T::cache_prefix(), id)
    }

    /// Sentinel key for the full list of `T`: `"{prefix}:all"`.
    ///
    /// Entity ids are numeric, so the sentinel never collides with them.
    pub fn all<T: CacheEntity>() -> String {
        format!("{}:{}", T::cache_prefix(), ALL_SENTINEL)
    }
}
