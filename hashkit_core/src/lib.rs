//! Hashkit Core Library
//!
//! This is the core library for hashkit, a multi-algorithm streaming hash
//! engine: one input stream is fanned out to a fixed bank of 512-bit hash
//! algorithms, finalized exactly once, and either checked against a match
//! policy or returned as a full digest set.

pub mod api;
pub mod buffer;
pub mod digest_set;
pub mod engine;
pub mod error;
pub mod handles;
pub mod hashing;
pub mod policy;

// Re-export main types
pub use api::{check_bytes, check_reader, feed_reader, hash_bytes, hash_reader};
pub use buffer::{DEFAULT_CHUNK_SIZE, DEFAULT_MEMORY_LIMIT, MemoryTracker};
pub use digest_set::DigestSet;
pub use engine::{EngineState, HashEngine};
pub use error::{Error, ErrorKind, Result};
pub use handles::{EngineGuard, EngineHandle, EngineRegistry};
pub use hashing::{Algorithm, AlgorithmRegistry, Digest, HashAlgorithmImpl, StreamingHasher};
pub use policy::{
    DEEP_WEB_HASH, MatchOutcome, MatchPolicy, NeverMatch, ReferenceTablePolicy, TargetDigestPolicy,
};

use error::ValidationError;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Algorithms to run, in the order they are fed
    pub algorithms: Vec<Algorithm>,
    /// Budget for the summed hasher state of one engine
    pub memory_limit: usize,
    /// Read size used when streaming from a reader
    pub chunk_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            algorithms: Algorithm::ALL.to_vec(),
            memory_limit: DEFAULT_MEMORY_LIMIT,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl EngineConfig {
    /// Create a test configuration
    pub fn test() -> Self {
        Self {
            algorithms: Algorithm::ALL.to_vec(),
            memory_limit: 4 * 1024 * 1024, // 4MB for tests
            chunk_size: 1024,              // 1KB chunks for faster tests
        }
    }

    /// Configuration running only the given algorithms
    pub fn with_algorithms(algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        Self {
            algorithms: algorithms.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Check the configuration before an engine is built from it
    pub fn validate(&self) -> Result<()> {
        if self.algorithms.is_empty() {
            return Err(ValidationError::EmptyAlgorithmSet.into());
        }
        for (i, algorithm) in self.algorithms.iter().enumerate() {
            if self.algorithms[..i].contains(algorithm) {
                return Err(ValidationError::duplicate_algorithm(algorithm.id()).into());
            }
        }
        if self.chunk_size == 0 {
            return Err(ValidationError::invalid_configuration("chunk_size must be non-zero").into());
        }
        Ok(())
    }
}
