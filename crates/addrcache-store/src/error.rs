/// Errors from raw store operations and cache configuration.
///
/// Corrupt or stale cache entries are not errors; they are reported through
/// [`crate::Validity`] and [`crate::LookupStatus`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure reported by a storage backend.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Invalid or unreadable cache configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
