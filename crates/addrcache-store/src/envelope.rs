//! Wrapped cache entry codec.
//!
//! Every value written through a [`crate::ValidatingStore`] is stored as:
//!
//! ```text
//! timestamp=<decimal seconds since epoch>\n
//! checksum=<32 lowercase hex characters>\n
//! <payload bytes, verbatim>
//! ```
//!
//! The two header lines have fixed names and order, so the payload needs no
//! escaping: everything after the second newline is payload, including any
//! further newlines.

use std::time::Duration;

use addrcache_crypto::{Checksum, ChecksumAlgorithm, ChecksumError};

const TIMESTAMP_FIELD: &str = "timestamp";
const CHECKSUM_FIELD: &str = "checksum";

/// Outcome of validating a wrapped entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Validity {
    /// Intact and within the staleness threshold.
    Valid,
    /// Intact but older than the staleness threshold.
    Stale,
    /// Malformed header or checksum mismatch.
    Corrupt,
}

impl std::fmt::Display for Validity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Stale => write!(f, "stale"),
            Self::Corrupt => write!(f, "corrupt"),
        }
    }
}

/// Structural decoding failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("missing {0} header line")]
    MissingHeader(&'static str),

    #[error("expected {expected} header, found {found:?}")]
    UnexpectedHeader {
        expected: &'static str,
        found: String,
    },

    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("invalid checksum: {0}")]
    InvalidChecksum(#[from] ChecksumError),
}

/// A decoded wrapped entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Write time, seconds since the UNIX epoch.
    pub timestamp: u64,
    /// Checksum of `payload` recorded at write time.
    pub checksum: Checksum,
    pub payload: Vec<u8>,
}

impl Envelope {
    /// Build an envelope for `payload` written at `now`.
    pub fn seal(payload: &[u8], now: u64, algorithm: ChecksumAlgorithm) -> Self {
        Self {
            timestamp: now,
            checksum: algorithm.digest(payload),
            payload: payload.to_vec(),
        }
    }

    /// Serialize to the stored byte layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let header = format!(
            "{TIMESTAMP_FIELD}={}\n{CHECKSUM_FIELD}={}\n",
            self.timestamp, self.checksum
        );
        let mut out = Vec::with_capacity(header.len() + self.payload.len());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Decode the stored byte layout. Does not verify the checksum.
    pub fn parse(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let (timestamp, rest) = split_header(bytes, TIMESTAMP_FIELD)?;
        let (checksum, payload) = split_header(rest, CHECKSUM_FIELD)?;

        if timestamp.is_empty() || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EnvelopeError::InvalidTimestamp(timestamp.to_string()));
        }
        let timestamp = timestamp
            .parse::<u64>()
            .map_err(|_| EnvelopeError::InvalidTimestamp(timestamp.to_string()))?;
        let checksum = Checksum::from_hex(checksum)?;

        Ok(Self {
            timestamp,
            checksum,
            payload: payload.to_vec(),
        })
    }

    /// Returns `true` if the payload still matches the recorded checksum.
    pub fn is_intact(&self, algorithm: ChecksumAlgorithm) -> bool {
        self.checksum.verify(algorithm, &self.payload)
    }

    /// Seconds elapsed since the entry was written. Entries stamped in the
    /// future have age zero.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }

    /// Check integrity and freshness.
    ///
    /// An entry is stale only when its age is strictly greater than
    /// `stale_threshold`.
    pub fn validate(
        &self,
        now: u64,
        stale_threshold: Duration,
        algorithm: ChecksumAlgorithm,
    ) -> Validity {
        if !self.is_intact(algorithm) {
            return Validity::Corrupt;
        }
        if Duration::from_secs(self.age(now)) > stale_threshold {
            Validity::Stale
        } else {
            Validity::Valid
        }
    }
}

/// Split `name=value\n` off the front of `bytes`.
fn split_header<'a>(
    bytes: &'a [u8],
    name: &'static str,
) -> Result<(&'a str, &'a [u8]), EnvelopeError> {
    let newline = bytes
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(EnvelopeError::MissingHeader(name))?;
    let line = &bytes[..newline];
    let rest = &bytes[newline + 1..];

    let unexpected = || EnvelopeError::UnexpectedHeader {
        expected: name,
        found: String::from_utf8_lossy(line).into_owned(),
    };
    let line = std::str::from_utf8(line).map_err(|_| unexpected())?;
    let value = line
        .strip_prefix(name)
        .and_then(|tail| tail.strip_prefix('='))
        .ok_or_else(unexpected)?;
    Ok((value, rest))
}

/// Result of [`unwrap`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unwrapped {
    pub validity: Validity,
    /// The payload for `Valid` and `Stale` entries; `None` when corrupt.
    pub payload: Option<Vec<u8>>,
}

/// Wrap `payload` with a write timestamp and checksum.
///
/// Deterministic for a given payload, timestamp and algorithm.
pub fn wrap(payload: &[u8], now: u64, algorithm: ChecksumAlgorithm) -> Vec<u8> {
    Envelope::seal(payload, now, algorithm).to_bytes()
}

/// Decode and validate a wrapped entry.
///
/// Corrupt entries never surface a payload. Stale entries passed the
/// integrity check, so their payload is returned alongside the `Stale`
/// status.
pub fn unwrap(
    bytes: &[u8],
    now: u64,
    stale_threshold: Duration,
    algorithm: ChecksumAlgorithm,
) -> Unwrapped {
    let envelope = match Envelope::parse(bytes) {
        Ok(envelope) => envelope,
        Err(_) => {
            return Unwrapped {
                validity: Validity::Corrupt,
                payload: None,
            }
        }
    };
    match envelope.validate(now, stale_threshold, algorithm) {
        Validity::Corrupt => Unwrapped {
            validity: Validity::Corrupt,
            payload: None,
        },
        validity => Unwrapped {
            validity,
            payload: Some(envelope.payload),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DATA: &[u8] = b"{'foo': 'bar'}";
    const MD5_OF_DATA: &str = "dd63dafcbd4d5b28badfcaf86fb6fcdb";
    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[test]
    fn wrap_layout_is_exact() {
        let wrapped = wrap(DATA, 1_400_000_000, ChecksumAlgorithm::Md5);
        let expected = format!("timestamp=1400000000\nchecksum={MD5_OF_DATA}\n{{'foo': 'bar'}}");
        assert_eq!(wrapped, expected.as_bytes());
    }

    #[test]
    fn empty_payload_has_empty_third_line() {
        let wrapped = wrap(b"", 7, ChecksumAlgorithm::Md5);
        assert_eq!(
            wrapped,
            b"timestamp=7\nchecksum=d41d8cd98f00b204e9800998ecf8427e\n".as_slice()
        );
        let unwrapped = unwrap(&wrapped, 7, DAY, ChecksumAlgorithm::Md5);
        assert_eq!(unwrapped.validity, Validity::Valid);
        assert_eq!(unwrapped.payload, Some(Vec::new()));
    }

    #[test]
    fn wrap_is_deterministic() {
        let a = wrap(DATA, 42, ChecksumAlgorithm::Blake3);
        let b = wrap(DATA, 42, ChecksumAlgorithm::Blake3);
        assert_eq!(a, b);
    }

    #[test]
    fn payload_with_newlines_and_header_text() {
        let payload = b"line one\nchecksum=00000000000000000000000000000000\n\ntimestamp=1\n";
        let wrapped = wrap(payload, 100, ChecksumAlgorithm::Md5);
        let unwrapped = unwrap(&wrapped, 100, DAY, ChecksumAlgorithm::Md5);
        assert_eq!(unwrapped.validity, Validity::Valid);
        assert_eq!(unwrapped.payload.as_deref(), Some(payload.as_slice()));
    }

    #[test]
    fn parse_reads_fields() {
        let envelope = Envelope::parse(&wrap(DATA, 99, ChecksumAlgorithm::Md5)).unwrap();
        assert_eq!(envelope.timestamp, 99);
        assert_eq!(envelope.checksum.to_hex(), MD5_OF_DATA);
        assert_eq!(envelope.payload, DATA);
    }

    #[test]
    fn garbage_is_corrupt() {
        let unwrapped = unwrap(b"garbage", 0, DAY, ChecksumAlgorithm::Md5);
        assert_eq!(unwrapped.validity, Validity::Corrupt);
        assert!(unwrapped.payload.is_none());
        assert_eq!(
            Envelope::parse(b"garbage"),
            Err(EnvelopeError::MissingHeader("timestamp"))
        );
    }

    #[test]
    fn malformed_headers_are_rejected() {
        let checksum = format!("checksum={MD5_OF_DATA}\n");
        let cases: Vec<(Vec<u8>, EnvelopeError)> = vec![
            (
                format!("{checksum}timestamp=1\n").into_bytes(),
                EnvelopeError::UnexpectedHeader {
                    expected: "timestamp",
                    found: format!("checksum={MD5_OF_DATA}"),
                },
            ),
            (
                format!("timestamp=\n{checksum}").into_bytes(),
                EnvelopeError::InvalidTimestamp(String::new()),
            ),
            (
                format!("timestamp=-5\n{checksum}").into_bytes(),
                EnvelopeError::InvalidTimestamp("-5".into()),
            ),
            (
                format!("timestamp= 5\n{checksum}").into_bytes(),
                EnvelopeError::InvalidTimestamp(" 5".into()),
            ),
            (
                b"timestamp=5\n".to_vec(),
                EnvelopeError::MissingHeader("checksum"),
            ),
            (
                b"timestamp=5\nchecksum=abc\n".to_vec(),
                EnvelopeError::InvalidChecksum(ChecksumError::InvalidLength {
                    expected: 32,
                    actual: 3,
                }),
            ),
            (
                format!("timestamps=5\n{checksum}").into_bytes(),
                EnvelopeError::UnexpectedHeader {
                    expected: "timestamp",
                    found: "timestamps=5".into(),
                },
            ),
        ];
        for (bytes, expected) in cases {
            assert_eq!(Envelope::parse(&bytes), Err(expected));
            let unwrapped = unwrap(&bytes, 0, DAY, ChecksumAlgorithm::Md5);
            assert_eq!(unwrapped.validity, Validity::Corrupt);
            assert!(unwrapped.payload.is_none());
        }
    }

    #[test]
    fn checksum_mismatch_is_corrupt() {
        let mut wrapped = wrap(DATA, 10, ChecksumAlgorithm::Md5);
        let last = wrapped.len() - 1;
        wrapped[last] ^= 0x01;
        let unwrapped = unwrap(&wrapped, 10, DAY, ChecksumAlgorithm::Md5);
        assert_eq!(unwrapped.validity, Validity::Corrupt);
        assert!(unwrapped.payload.is_none());
    }

    #[test]
    fn algorithm_mismatch_is_corrupt() {
        let wrapped = wrap(DATA, 10, ChecksumAlgorithm::Blake3);
        let unwrapped = unwrap(&wrapped, 10, DAY, ChecksumAlgorithm::Md5);
        assert_eq!(unwrapped.validity, Validity::Corrupt);
    }

    #[test]
    fn staleness_boundary() {
        let threshold = Duration::from_secs(100);
        let wrapped = wrap(DATA, 1_000, ChecksumAlgorithm::Md5);

        let at_threshold = unwrap(&wrapped, 1_100, threshold, ChecksumAlgorithm::Md5);
        assert_eq!(at_threshold.validity, Validity::Valid);

        let past_threshold = unwrap(&wrapped, 1_101, threshold, ChecksumAlgorithm::Md5);
        assert_eq!(past_threshold.validity, Validity::Stale);
        assert_eq!(past_threshold.payload.as_deref(), Some(DATA));
    }

    #[test]
    fn future_timestamp_is_fresh() {
        let wrapped = wrap(DATA, 5_000, ChecksumAlgorithm::Md5);
        let unwrapped = unwrap(&wrapped, 1_000, Duration::ZERO, ChecksumAlgorithm::Md5);
        assert_eq!(unwrapped.validity, Validity::Valid);
        assert_eq!(Envelope::parse(&wrapped).unwrap().age(1_000), 0);
    }

    #[test]
    fn stale_reference_entry() {
        let wrapped = format!("timestamp=0\nchecksum={MD5_OF_DATA}\n{{'foo': 'bar'}}");
        let unwrapped = unwrap(
            wrapped.as_bytes(),
            1_400_000_000,
            30 * DAY,
            ChecksumAlgorithm::Md5,
        );
        assert_eq!(unwrapped.validity, Validity::Stale);
        assert_eq!(unwrapped.payload.as_deref(), Some(DATA));
    }

    #[test]
    fn validity_display() {
        assert_eq!(Validity::Valid.to_string(), "valid");
        assert_eq!(Validity::Stale.to_string(), "stale");
        assert_eq!(Validity::Corrupt.to_string(), "corrupt");
    }

    proptest! {
        #[test]
        fn arbitrary_payloads_survive(
            payload in proptest::collection::vec(any::<u8>(), 0..256),
            now in 0u64..4_000_000_000,
        ) {
            let wrapped = wrap(&payload, now, ChecksumAlgorithm::Md5);
            let unwrapped = unwrap(&wrapped, now, DAY, ChecksumAlgorithm::Md5);
            prop_assert_eq!(unwrapped.validity, Validity::Valid);
            prop_assert_eq!(unwrapped.payload, Some(payload));
        }

        #[test]
        fn single_byte_flip_never_leaks(
            payload in proptest::collection::vec(any::<u8>(), 1..64),
            flip in any::<prop::sample::Index>(),
        ) {
            let mut wrapped = wrap(&payload, 1_000, ChecksumAlgorithm::Blake3);
            let header_len = wrapped.len() - payload.len();
            let i = header_len + flip.index(payload.len());
            wrapped[i] = wrapped[i].wrapping_add(1);
            let unwrapped = unwrap(&wrapped, 1_000, DAY, ChecksumAlgorithm::Blake3);
            prop_assert_eq!(unwrapped.validity, Validity::Corrupt);
            prop_assert!(unwrapped.payload.is_none());
        }
    }
}
