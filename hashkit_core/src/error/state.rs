//! Engine lifecycle error types

use thiserror::Error;

/// Operations attempted against an engine that left the active state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Update or finalize after the one-shot finalize transition
    #[error("Engine is already finalized; '{operation}' is not allowed")]
    AlreadyFinalized { operation: String },
}

impl StateError {
    /// Create an already finalized error for the named operation
    pub fn already_finalized(operation: &str) -> Self {
        Self::AlreadyFinalized {
            operation: operation.to_string(),
        }
    }
}
