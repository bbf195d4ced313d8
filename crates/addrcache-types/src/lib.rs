//! Foundation types for addrcache.
//!
//! Address metadata is cached per address prefix. This crate defines the
//! pieces needed to name such a prefix deterministically, plus the clock
//! abstraction the cache uses for freshness checks.
//!
//! # Key Types
//!
//! - [`AddressField`] — One level of the fixed address hierarchy
//! - [`AddressData`] — A (possibly partial) address record
//! - [`LookupKey`] — Hierarchical key derived from an address
//! - [`Clock`] — Wall-clock source in whole seconds

pub mod address;
pub mod clock;
pub mod error;
pub mod field;
pub mod lookup_key;

pub use address::AddressData;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::TypeError;
pub use field::AddressField;
pub use lookup_key::LookupKey;
