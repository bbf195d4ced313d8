use std::path::Path;
use std::time::Duration;

use addrcache_crypto::ChecksumAlgorithm;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Entries older than this are reported stale by default (30 days).
pub const DEFAULT_STALE_THRESHOLD_SECS: u64 = 30 * 24 * 60 * 60;

/// Integrity and freshness policy for a [`crate::ValidatingStore`].
///
/// Loadable from TOML:
///
/// ```toml
/// stale_threshold_secs = 86400
/// algorithm = "blake3"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum entry age, in seconds, before it is reported stale.
    pub stale_threshold_secs: u64,
    /// Digest used for payload checksums.
    pub algorithm: ChecksumAlgorithm,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            stale_threshold_secs: DEFAULT_STALE_THRESHOLD_SECS,
            algorithm: ChecksumAlgorithm::default(),
        }
    }
}

impl ValidationConfig {
    pub fn stale_threshold(&self) -> Duration {
        Duration::from_secs(self.stale_threshold_secs)
    }

    pub fn with_stale_threshold(mut self, threshold: Duration) -> Self {
        self.stale_threshold_secs = threshold.as_secs();
        self
    }

    pub fn with_algorithm(mut self, algorithm: ChecksumAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Parse a TOML document. Missing keys take their default values.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Load a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> StoreResult<String> {
        toml::to_string(self).map_err(|e| StoreError::Config(e.to_string()))
    }
}
