//! Memory budget tracking for engine construction
//!
//! Each engine gets a budget for the summed state of its hashers. Slots
//! reserve their estimated size before they are built, so an engine that
//! would exceed the budget fails during `create` with nothing left behind.

use crate::Result;
use crate::error::ResourceError;
use crate::hashing::Algorithm;

/// Default read size for streaming input (64KB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Default per-engine memory budget (16MB)
pub const DEFAULT_MEMORY_LIMIT: usize = 16 * 1024 * 1024;

/// Memory tracker for one engine's hasher state
#[derive(Debug, Clone)]
pub struct MemoryTracker {
    /// Current memory reserved
    memory_used: usize,
    /// Memory limit
    memory_limit: usize,
}

impl Default for MemoryTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_LIMIT)
    }
}

impl MemoryTracker {
    /// Create a new memory tracker with the specified limit
    pub fn new(limit: usize) -> Self {
        Self {
            memory_used: 0,
            memory_limit: limit,
        }
    }

    /// Get the current memory limit
    pub fn limit(&self) -> usize {
        self.memory_limit
    }

    /// Get current memory usage
    pub fn used(&self) -> usize {
        self.memory_used
    }

    /// Reserve `size` bytes on behalf of `algorithm`
    pub fn reserve(&mut self, algorithm: Algorithm, size: usize) -> Result<()> {
        let requested = self.memory_used.saturating_add(size);
        if requested > self.memory_limit {
            return Err(
                ResourceError::allocation_exhausted(algorithm, requested, self.memory_limit).into(),
            );
        }
        self.memory_used = requested;
        Ok(())
    }

    /// Give back a reservation
    pub fn release(&mut self, size: usize) {
        self.memory_used = self.memory_used.saturating_sub(size);
    }
}
