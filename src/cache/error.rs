use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors returned by the response cache.
pub enum CacheError {
    /// A previous holder panicked while holding the lock. The cache has been reset.
    #[error("response cache lock poisoned; cache was reset")]
    Poisoned,
}

/// Convenience result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
