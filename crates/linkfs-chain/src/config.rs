use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};

/// Default number of payload bytes per node.
pub const CHUNK_SIZE: usize = 900;

/// Default upper bound on a stored or fetched file, in bytes.
pub const MAX_FILE_SIZE: u64 = 100 * 1024;

/// Default wait before the single retry of a failed read.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Tunables shared by the chain builder and reader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Maximum payload bytes per node.
    pub chunk_size: usize,
    /// Largest file accepted for storing or produced by fetching.
    pub max_file_size: u64,
    /// Wait before retrying a failed `get`.
    pub retry_delay: Duration,
    /// Re-hash every fetched node and compare it with the requested address.
    ///
    /// The reader hashes with `NodeHasher::NODE` unless given another one via
    /// `ChainReader::with_hasher`. Turn this off for a store whose addresses
    /// come from a hash function linkfs cannot reproduce.
    pub verify_reads: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            max_file_size: MAX_FILE_SIZE,
            retry_delay: RETRY_DELAY,
            verify_reads: true,
        }
    }
}

impl ChainConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> ChainResult<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| ChainError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> ChainResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values the chunker and reader cannot work with.
    pub fn validate(&self) -> ChainResult<()> {
        if self.chunk_size == 0 {
            return Err(ChainError::InvalidConfig(
                "chunk_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
