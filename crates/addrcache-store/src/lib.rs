//! Self-validating key-value cache for address metadata.
//!
//! A [`ValidatingStore`] sits in front of any raw byte store and guards it
//! against corruption and staleness. Every value is written as a wrapped
//! entry carrying its write time and a checksum of the payload; every read
//! re-verifies both before data reaches the caller.
//!
//! # Read outcomes
//!
//! - **Valid** -- intact and fresh; returned with `success = true`
//! - **Stale** -- intact but older than the configured threshold; returned
//!   with `success = false` so callers can serve it while refreshing
//! - **Corrupt** -- unparseable or checksum mismatch; never returned
//! - **Missing** / **Failed** -- nothing stored, or the raw store errored
//!
//! # Storage Backends
//!
//! All backends implement the [`Storage`] trait:
//!
//! - [`InMemoryStorage`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Corrupt data never reaches the caller.
//! 2. `get` completes exactly once on every path.
//! 3. The validating layer holds no mutable state; wrapping is pure.
//! 4. Raw store errors are propagated on write and reported on read, never retried.

pub mod config;
pub mod envelope;
pub mod error;
pub mod memory;
pub mod traits;
pub mod validating;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{ValidationConfig, DEFAULT_STALE_THRESHOLD_SECS};
pub use envelope::{unwrap, wrap, Envelope, EnvelopeError, Unwrapped, Validity};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStorage;
pub use traits::Storage;
pub use validating::{Lookup, LookupStatus, ValidatingStore};
