use std::fmt;
use std::str::FromStr;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// Length of a checksum digest in bytes.
pub const CHECKSUM_LEN: usize = 16;

/// Length of a checksum rendered as hex.
pub const CHECKSUM_HEX_LEN: usize = CHECKSUM_LEN * 2;

/// Digest algorithm used to checksum cached payloads.
///
/// Both algorithms produce 128-bit digests so the wrapped entry format stays
/// the same regardless of which one a deployment picks. `Md5` matches
/// entries written by existing address data caches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    #[default]
    Md5,
    /// BLAKE3 extended output truncated to 128 bits.
    Blake3,
}

impl ChecksumAlgorithm {
    /// Checksum `data`.
    pub fn digest(&self, data: &[u8]) -> Checksum {
        let mut out = [0u8; CHECKSUM_LEN];
        match self {
            Self::Md5 => out.copy_from_slice(&Md5::digest(data)),
            Self::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(data);
                hasher.finalize_xof().fill(&mut out);
            }
        }
        Checksum(out)
    }

    /// Checksum `data` and render it as 32 lowercase hex characters.
    pub fn digest_hex(&self, data: &[u8]) -> String {
        self.digest(data).to_hex()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "blake3" => Ok(Self::Blake3),
            _ => Err(ChecksumError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// A 128-bit payload digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; CHECKSUM_LEN]);

impl Checksum {
    pub const fn from_bytes(bytes: [u8; CHECKSUM_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; CHECKSUM_LEN] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse the canonical rendering: exactly 32 lowercase hex characters.
    pub fn from_hex(s: &str) -> Result<Self, ChecksumError> {
        if s.len() != CHECKSUM_HEX_LEN {
            return Err(ChecksumError::InvalidLength {
                expected: CHECKSUM_HEX_LEN,
                actual: s.len(),
            });
        }
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(ChecksumError::InvalidHex(s.to_string()));
        }
        let mut out = [0u8; CHECKSUM_LEN];
        hex::decode_to_slice(s, &mut out)
            .map_err(|_| ChecksumError::InvalidHex(s.to_string()))?;
        Ok(Self(out))
    }

    /// Returns `true` if `data` hashes to this checksum under `algorithm`.
    pub fn verify(&self, algorithm: ChecksumAlgorithm, data: &[u8]) -> bool {
        algorithm.digest(data) == *self
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({})", self.to_hex())
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Errors from checksum parsing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChecksumError {
    #[error("unknown checksum algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("invalid checksum length: expected {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid checksum hex: {0:?}")]
    InvalidHex(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_known_vectors() {
        assert_eq!(
            ChecksumAlgorithm::Md5.digest_hex(b""),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            ChecksumAlgorithm::Md5.digest_hex(b"{'foo': 'bar'}"),
            "dd63dafcbd4d5b28badfcaf86fb6fcdb"
        );
    }

    #[test]
    fn blake3_is_truncated_hash() {
        let full = blake3::hash(b"payload");
        let truncated = ChecksumAlgorithm::Blake3.digest(b"payload");
        assert_eq!(truncated.as_bytes(), &full.as_bytes()[..CHECKSUM_LEN]);
        assert_eq!(
            ChecksumAlgorithm::Blake3.digest_hex(b""),
            "af1349b9f5f9a1a6a0404dea36dcc949"
        );
    }

    #[test]
    fn digest_is_deterministic() {
        for algorithm in [ChecksumAlgorithm::Md5, ChecksumAlgorithm::Blake3] {
            let a = algorithm.digest(b"hello world");
            let b = algorithm.digest(b"hello world");
            assert_eq!(a, b);
            assert_ne!(a, algorithm.digest(b"hello world!"));
        }
    }

    #[test]
    fn algorithms_differ() {
        assert_ne!(
            ChecksumAlgorithm::Md5.digest(b"same"),
            ChecksumAlgorithm::Blake3.digest(b"same")
        );
    }

    #[test]
    fn hex_is_lowercase_and_fixed_width() {
        let hex = ChecksumAlgorithm::Blake3.digest_hex(b"abc");
        assert_eq!(hex.len(), CHECKSUM_HEX_LEN);
        assert!(hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }

    #[test]
    fn from_hex_roundtrip() {
        let sum = ChecksumAlgorithm::Md5.digest(b"data");
        assert_eq!(Checksum::from_hex(&sum.to_hex()).unwrap(), sum);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert_eq!(
            Checksum::from_hex("abcd"),
            Err(ChecksumError::InvalidLength {
                expected: 32,
                actual: 4
            })
        );
        assert!(matches!(
            Checksum::from_hex("DD63DAFCBD4D5B28BADFCAF86FB6FCDB"),
            Err(ChecksumError::InvalidHex(_))
        ));
        assert!(matches!(
            Checksum::from_hex("zz63dafcbd4d5b28badfcaf86fb6fcdb"),
            Err(ChecksumError::InvalidHex(_))
        ));
    }

    #[test]
    fn verify_detects_tampering() {
        let sum = ChecksumAlgorithm::Md5.digest(b"original");
        assert!(sum.verify(ChecksumAlgorithm::Md5, b"original"));
        assert!(!sum.verify(ChecksumAlgorithm::Md5, b"tampered"));
        assert!(!sum.verify(ChecksumAlgorithm::Blake3, b"original"));
    }

    #[test]
    fn algorithm_names() {
        assert_eq!("md5".parse::<ChecksumAlgorithm>().unwrap(), ChecksumAlgorithm::Md5);
        assert_eq!("BLAKE3".parse::<ChecksumAlgorithm>().unwrap(), ChecksumAlgorithm::Blake3);
        assert!("sha1".parse::<ChecksumAlgorithm>().is_err());
        assert_eq!(ChecksumAlgorithm::default(), ChecksumAlgorithm::Md5);
        assert_eq!(serde_json::to_string(&ChecksumAlgorithm::Blake3).unwrap(), "\"blake3\"");
    }
}
