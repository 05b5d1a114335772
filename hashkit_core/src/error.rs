//! Error types for the hashkit core library
//!
//! Errors are split by what the caller can do about them. Resource errors
//! mean the engine could not get the memory it needed; state and handle
//! errors are programming errors on the caller's side; internal errors are
//! faults inside an algorithm adapter and are not expected in practice.

use thiserror::Error;

pub mod internal;
pub mod resource;
pub mod state;
pub mod validation;

pub use internal::InternalError;
pub use resource::ResourceError;
pub use state::StateError;
pub use validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the hashkit core library
#[derive(Error, Debug)]
pub enum Error {
    /// Allocation or memory budget exhaustion
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Operation on an engine that is no longer active
    #[error(transparent)]
    State(#[from] StateError),

    /// Invalid handles, parameters and configuration
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Faults raised inside an algorithm adapter
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// I/O failure while streaming input from a reader
    #[error("I/O error while reading input: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Memory could not be obtained
    Exhaustion,
    /// The engine was already finalized
    InvalidState,
    /// The handle was never issued, or was released
    InvalidHandle,
    /// Other caller-side validation failures
    Validation,
    /// Adapter faults and I/O failures
    Internal,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Resource(_) => ErrorKind::Exhaustion,
            Self::State(_) => ErrorKind::InvalidState,
            Self::Validation(ValidationError::InvalidHandle { .. }) => ErrorKind::InvalidHandle,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Internal(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }

    /// Whether retrying later could succeed
    ///
    /// Only exhaustion qualifies; every other kind is deterministic.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Resource(_))
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(err: std::collections::TryReserveError) -> Self {
        Self::Resource(ResourceError::from(err))
    }
}
