//! Resource exhaustion error types

use crate::hashing::Algorithm;
use std::collections::TryReserveError;
use thiserror::Error;

/// Memory could not be obtained for an engine or its results
#[derive(Error, Debug)]
pub enum ResourceError {
    /// Building an algorithm slot would exceed the engine's memory budget
    #[error(
        "Allocation exhausted for algorithm '{algorithm}': {requested} bytes requested, budget is {limit} bytes"
    )]
    AllocationExhausted {
        algorithm: String,
        requested: usize,
        limit: usize,
    },

    /// The digest set could not be allocated at finalize time
    #[error("Failed to allocate digest collection for {count} algorithms")]
    DigestCollection { count: usize },

    /// The allocator refused a reservation
    #[error("Out of memory: {message}")]
    OutOfMemory { message: String },
}

impl ResourceError {
    /// Create an allocation exhausted error
    pub fn allocation_exhausted(algorithm: Algorithm, requested: usize, limit: usize) -> Self {
        Self::AllocationExhausted {
            algorithm: algorithm.id().to_string(),
            requested,
            limit,
        }
    }

    /// Create a digest collection error
    pub fn digest_collection(count: usize) -> Self {
        Self::DigestCollection { count }
    }
}

impl From<TryReserveError> for ResourceError {
    fn from(err: TryReserveError) -> Self {
        Self::OutOfMemory {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_exhausted_error() {
        let error = ResourceError::allocation_exhausted(Algorithm::Lsh, 2048, 512);
        assert!(error.to_string().contains("Allocation exhausted"));
        assert!(error.to_string().contains("lsh"));
        assert!(error.to_string().contains("2048"));
        assert!(error.to_string().contains("512"));
    }

    #[test]
    fn test_digest_collection_error() {
        let error = ResourceError::digest_collection(18);
        assert!(error.to_string().contains("digest collection"));
        assert!(error.to_string().contains("18"));
    }
}
