use std::fmt;
use std::sync::Arc;

use addrcache_types::{Clock, SystemClock};
use tracing::{debug, warn};

use crate::config::ValidationConfig;
use crate::envelope::{self, Validity};
use crate::error::StoreResult;
use crate::traits::Storage;

/// How a [`ValidatingStore::lookup`] resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LookupStatus {
    /// Intact and fresh.
    Valid,
    /// Intact but past the staleness threshold. Data is still returned.
    Stale,
    /// Stored bytes failed parsing or checksum verification.
    Corrupt,
    /// Nothing stored under the key.
    Missing,
    /// The raw store returned an error.
    Failed,
}

impl From<Validity> for LookupStatus {
    fn from(validity: Validity) -> Self {
        match validity {
            Validity::Valid => Self::Valid,
            Validity::Stale => Self::Stale,
            Validity::Corrupt => Self::Corrupt,
        }
    }
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Stale => write!(f, "stale"),
            Self::Corrupt => write!(f, "corrupt"),
            Self::Missing => write!(f, "missing"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Result of a cache read.
///
/// `success` is `true` only for [`LookupStatus::Valid`]. `data` is empty on
/// every failure except [`LookupStatus::Stale`], which carries the intact
/// payload so callers can serve it while refreshing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lookup {
    pub success: bool,
    pub key: String,
    pub data: Vec<u8>,
    pub status: LookupStatus,
}

impl Lookup {
    fn new(key: &str, status: LookupStatus, data: Vec<u8>) -> Self {
        Self {
            success: status == LookupStatus::Valid,
            key: key.to_string(),
            data,
            status,
        }
    }
}

/// Key-value cache that checksums and timestamps every entry.
///
/// Writes wrap the payload in an [`envelope`]; reads unwrap and validate it
/// before anything reaches the caller. The store is key-agnostic: keys are
/// usually [`addrcache_types::LookupKey`] strings but any string works.
///
/// The raw store is owned. To share it with other consumers, pass an
/// `Arc<S>`, which also implements [`Storage`].
///
/// `ValidatingStore` holds no mutable state of its own, so concurrent
/// `get`/`put` calls are safe; races on the same key resolve however the
/// raw store resolves them.
pub struct ValidatingStore<S: Storage> {
    store: S,
    config: ValidationConfig,
    clock: Arc<dyn Clock>,
}

impl<S: Storage> ValidatingStore<S> {
    /// Wrap `store` with the default policy and the system clock.
    pub fn new(store: S) -> Self {
        Self::with_config(store, ValidationConfig::default(), Arc::new(SystemClock))
    }

    pub fn with_config(store: S, config: ValidationConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    /// The underlying raw store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Wrap `payload` with the current time and a checksum, then write it
    /// under `key`, replacing any previous entry.
    ///
    /// Raw store errors are returned as-is.
    pub fn put(&self, key: &str, payload: &[u8]) -> StoreResult<()> {
        let now = self.clock.now_secs();
        let wrapped = envelope::wrap(payload, now, self.config.algorithm);
        debug!(key, len = payload.len(), timestamp = now, "cache put");
        self.store.write(key, &wrapped)
    }

    /// Read and validate the entry under `key`.
    pub fn lookup(&self, key: &str) -> Lookup {
        let bytes = match self.store.read(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key, "cache miss");
                return Lookup::new(key, LookupStatus::Missing, Vec::new());
            }
            Err(e) => {
                warn!(key, error = %e, "raw store read failed");
                return Lookup::new(key, LookupStatus::Failed, Vec::new());
            }
        };

        let unwrapped = envelope::unwrap(
            &bytes,
            self.clock.now_secs(),
            self.config.stale_threshold(),
            self.config.algorithm,
        );
        let status = LookupStatus::from(unwrapped.validity);
        match status {
            LookupStatus::Corrupt => warn!(key, len = bytes.len(), "discarding corrupt cache entry"),
            LookupStatus::Stale => debug!(key, "cache entry is stale"),
            _ => debug!(key, "cache hit"),
        }
        Lookup::new(key, status, unwrapped.payload.unwrap_or_default())
    }

    /// Read `key` and report the outcome through `on_complete(success, key, data)`.
    ///
    /// `on_complete` is called exactly once on every path. See [`Lookup`] for
    /// what `success` and `data` hold.
    pub fn get<F>(&self, key: &str, on_complete: F)
    where
        F: FnOnce(bool, &str, &[u8]),
    {
        let lookup = self.lookup(key);
        on_complete(lookup.success, &lookup.key, &lookup.data);
    }

    /// Remove `key` from the raw store. Returns `true` if it existed.
    pub fn delete(&self, key: &str) -> StoreResult<bool> {
        self.store.delete(key)
    }
}

impl<S: Storage + fmt::Debug> fmt::Debug for ValidatingStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatingStore")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish()
    }
}
