//! Payload checksums for addrcache.
//!
//! Cached entries carry a 128-bit digest of their payload, rendered as 32
//! lowercase hex characters. The digest algorithm is a deployment choice;
//! see [`ChecksumAlgorithm`].
//!
//! All digests wrap established libraries — no custom cryptography.

pub mod checksum;

pub use checksum::{Checksum, ChecksumAlgorithm, ChecksumError, CHECKSUM_HEX_LEN, CHECKSUM_LEN};
