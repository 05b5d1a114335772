//! Validation related error types

use thiserror::Error;

/// Validation and configuration errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Handle not issued by the registry, or already released
    #[error("Invalid engine handle {handle}: not produced by create or already released")]
    InvalidHandle { handle: u64 },

    /// Algorithm id not present in the bank
    #[error("Unknown hash algorithm: {name}")]
    UnknownAlgorithm { name: String },

    /// Reference digest that cannot be used for matching
    #[error("Invalid digest '{value}': {reason}")]
    InvalidDigest { value: String, reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// An engine needs at least one algorithm
    #[error("Algorithm set is empty")]
    EmptyAlgorithmSet,

    /// The same algorithm was configured twice
    #[error("Algorithm '{name}' appears more than once in the algorithm set")]
    DuplicateAlgorithm { name: String },
}

impl ValidationError {
    /// Create an invalid handle error
    pub fn invalid_handle(handle: u64) -> Self {
        Self::InvalidHandle { handle }
    }

    /// Create an unknown algorithm error
    pub fn unknown_algorithm(name: &str) -> Self {
        Self::UnknownAlgorithm {
            name: name.to_string(),
        }
    }

    /// Create an invalid digest error
    pub fn invalid_digest(value: &str, reason: &str) -> Self {
        Self::InvalidDigest {
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: &str) -> Self {
        Self::InvalidConfiguration {
            message: message.to_string(),
        }
    }

    /// Create a duplicate algorithm error
    pub fn duplicate_algorithm(name: &str) -> Self {
        Self::DuplicateAlgorithm {
            name: name.to_string(),
        }
    }
}
