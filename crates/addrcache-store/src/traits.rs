use std::sync::Arc;

use crate::error::StoreResult;

/// Raw key-value byte store.
///
/// This is the collaborator a [`crate::ValidatingStore`] layers integrity
/// and freshness checks on top of. Implementations must satisfy:
/// - Last write wins per key. No other ordering or atomicity is assumed.
/// - The store never interprets values; they are opaque bytes.
/// - All I/O errors are propagated, never silently ignored.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Store `data` under `key`, replacing any previous value.
    fn write(&self, key: &str, data: &[u8]) -> StoreResult<()>;

    /// Delete `key`. Returns `true` if it existed.
    fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Check whether `key` exists.
    ///
    /// Default implementation reads the value. Backends may override with a
    /// cheaper metadata lookup.
    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.read(key)?.is_some())
    }
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, data: &[u8]) -> StoreResult<()> {
        (**self).write(key, data)
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        (**self).exists(key)
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, data: &[u8]) -> StoreResult<()> {
        (**self).write(key, data)
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        (**self).exists(key)
    }
}
