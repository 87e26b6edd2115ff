//! Error types for the Pokémon cache.

use std::fmt;

/// Result type for cache and upstream operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Pokémon cache.
///
/// Single-entity lookups propagate these to the caller. Batch fetches, the
/// full-list fan-out and the warmer log them per item and carry on.
#[derive(Debug, Clone)]
pub enum Error {
    /// Upstream request failed.
    ///
    /// Covers transport failures, non-2xx statuses and bodies that do not
    /// deserialize. `target` is the requested URL (or id for stub sources).
    Fetch {
        /// What was being fetched
        target: String,
        /// Underlying cause, rendered
        cause: String,
    },

    /// Upstream payload was well-formed JSON but is missing required nested
    /// objects, or carries values the entity cannot hold (id 0, empty name).
    Mapping(String),

    /// A reference URL did not end in a numeric path segment.
    Parse(String),

    /// Identifiers are positive; `0` is rejected before any upstream call.
    InvalidId(u32),

    /// Entity could not be encoded for cache storage.
    SerializationError(String),

    /// Cached bytes could not be decoded.
    ///
    /// **Recovery:** the read-through path evicts the entry and reloads.
    DeserializationError(String),

    /// Cache envelope header is not ours.
    InvalidCacheEntry(String),

    /// Cached entry was written by a different schema version.
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from cached entry)
        found: u32,
    },

    /// Entity failed its invariants after being read from cache.
    ValidationError(String),

    /// Key not present and the strategy forbids falling back upstream.
    CacheMiss,

    /// Invalid configuration (e.g. the HTTP client could not be built).
    ConfigError(String),

    /// Operation not supported by this backend.
    NotImplemented(String),
}

impl Error {
    /// Build a [`Error::Fetch`] for `target` from any displayable cause.
    pub fn fetch(target: impl fmt::Display, cause: impl fmt::Display) -> Self {
        Error::Fetch {
            target: target.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Whether the failure originated upstream (network, status, or payload).
    ///
    /// A serving layer maps these to not-found / upstream-unavailable responses.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Fetch { .. } | Error::Mapping(_))
    }

    /// Whether the failure means the cached bytes are unusable.
    pub(crate) fn is_corrupt_entry(&self) -> bool {
        matches!(
            self,
            Error::DeserializationError(_)
                | Error::InvalidCacheEntry(_)
                | Error::VersionMismatch { .. }
                | Error::ValidationError(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Fetch { target, cause } => write!(f, "Fetch of {} failed: {}", target, cause),
            Error::Mapping(msg) => write!(f, "Mapping error: {}", msg),
            Error::Parse(msg) => write!(f, "Parse error: {}", msg),
            Error::InvalidId(id) => write!(f, "Invalid Pokémon id: {}", id),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::InvalidCacheEntry(msg) => write!(f, "Invalid cache entry: {}", msg),
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Cache version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::CacheMiss => write!(f, "Cache miss"),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        let target = e
            .url()
            .map(|url| url.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        Error::fetch(target, e)
    }
}
