//! Cache access strategies.
//!
//! | Strategy | Cache Hit | Cache Miss | Use Case |
//! |----------|-----------|-----------|----------|
//! | **Refresh** | Return | Upstream, store | Default read-through |
//! | **Fresh** | Return | `Error::CacheMiss` | Peek without touching upstream |
//! | **Invalidate** | Delete, reload | Upstream, store | Force a reload of one key |
//! | **Bypass** | Ignore | Upstream, store | Always ask upstream, still warm the cache |

/// Strategy enum controlling cache lookup behavior.
///
/// ```
/// use pokecache::CacheStrategy;
///
/// assert_eq!(CacheStrategy::default(), CacheStrategy::Refresh);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CacheStrategy {
    /// Cache only; a miss is reported as `Error::CacheMiss`.
    Fresh,

    /// Cache first, upstream on miss, store the result.
    #[default]
    Refresh,

    /// Drop the cached value, then behave like `Refresh`.
    Invalidate,

    /// Skip the cache read, load upstream, store the result.
    Bypass,
}

impl std::fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheStrategy::Fresh => write!(f, "Fresh"),
            CacheStrategy::Refresh => write!(f, "Refresh"),
            CacheStrategy::Invalidate => write!(f, "Invalidate"),
            CacheStrategy::Bypass => write!(f, "Bypass"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_display() {
        assert_eq!(CacheStrategy::Fresh.to_string(), "Fresh");
        assert_eq!(CacheStrategy::Refresh.to_string(), "Refresh");
        assert_eq!(CacheStrategy::Invalidate.to_string(), "Invalidate");
        assert_eq!(CacheStrategy::Bypass.to_string(), "Bypass");
    }

    #[test]
    fn test_strategy_default() {
        assert_eq!(CacheStrategy::default(), CacheStrategy::Refresh);
    }
}
