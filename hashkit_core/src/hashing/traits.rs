//! Core traits for the algorithm adapter contract

use super::{Algorithm, Digest};
use crate::Result;

/// Core trait that all hash algorithms must implement
pub trait HashAlgorithmImpl: Send + Sync {
    /// Which bank entry this adapter implements
    fn algorithm(&self) -> Algorithm;

    /// Unique identifier for this algorithm
    fn id(&self) -> &'static str {
        self.algorithm().id()
    }

    /// Display name for user interfaces
    fn display_name(&self) -> &'static str;

    /// Digest length in bytes, fixed before any input is seen
    fn digest_len(&self) -> usize;

    /// Estimated memory held by one hasher instance
    fn state_size(&self) -> usize;

    /// Create a new streaming hasher instance
    ///
    /// Fails only when the hasher's state cannot be allocated.
    fn create_hasher(&self) -> Result<Box<dyn StreamingHasher>>;

    /// Calculate the digest of in-memory data
    fn hash_bytes(&self, data: &[u8]) -> Result<Digest> {
        let mut hasher = self.create_hasher()?;
        hasher.update(data);
        Ok(hasher.finalize())
    }
}

/// Trait for streaming hash calculation
///
/// `update` may be called any number of times with chunks of any size,
/// including empty ones. The digest depends only on the concatenated input.
pub trait StreamingHasher: Send {
    /// Absorb the next chunk of input
    fn update(&mut self, data: &[u8]);

    /// Finish the computation and return the digest
    fn finalize(self: Box<Self>) -> Digest;
}
