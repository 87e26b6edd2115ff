//! Cache backend implementations.

use crate::error::Result;
use std::future::Future;

pub mod inmemory;

pub use inmemory::InMemoryBackend;

/// Trait for cache backend implementations.
///
/// Stores encoded values by string key. Entries never expire on their own;
/// removal happens through [`CacheBackend::delete`] or
/// [`CacheBackend::clear_all`].
///
/// All methods take `&self`; implementations use interior mutability. The
/// returned futures are `Send` so cache calls can run inside spawned tasks
/// such as the warmer.
pub trait CacheBackend: Send + Sync + Clone + 'static {
    /// Retrieve value from cache by key.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value found in cache
    /// - `Ok(None)` - Cache miss
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Store value in cache, replacing any previous value (last writer wins).
    fn set(&self, key: &str, value: Vec<u8>) -> impl Future<Output = Result<()>> + Send;

    /// Remove value from cache.
    fn delete(&self, key: &str) -> impl Future<Output = Result<()>> + Send;

    /// Check if key exists in cache.
    fn exists(&self, key: &str) -> impl Future<Output = Result<bool>> + Send {
        async move { Ok(self.get(key).await?.is_some()) }
    }

    /// Clear every entry.
    ///
    /// # Errors
    /// Returns `Err` if the backend does not support it.
    fn clear_all(&self) -> impl Future<Output = Result<()>> + Send {
        async {
            Err(crate::error::Error::NotImplemented(
                "clear_all not implemented for this backend".to_string(),
            ))
        }
    }
}
