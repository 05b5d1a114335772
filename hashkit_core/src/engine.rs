//! Multi-algorithm streaming hash engine
//!
//! A `HashEngine` owns one slot per configured algorithm and broadcasts every
//! chunk to all of them in engine order. It is finalized exactly once, by
//! either `finalize_match` or `finalize_digests`; afterwards every call fails
//! with an invalid-state error.

use crate::buffer::MemoryTracker;
use crate::digest_set::DigestSet;
use crate::error::{InternalError, ResourceError, StateError};
use crate::hashing::{Algorithm, AlgorithmRegistry, StreamingHasher};
use crate::policy::{MatchOutcome, MatchPolicy};
use crate::{EngineConfig, Result};
use log::{debug, trace, warn};
use std::fmt;

/// Lifecycle state of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Active,
    Finalized,
}

/// One algorithm's streaming state
struct AlgorithmSlot {
    algorithm: Algorithm,
    digest_len: usize,
    hasher: Box<dyn StreamingHasher>,
}

/// Slots only exist while the engine is active
enum Lifecycle {
    Active(Vec<AlgorithmSlot>),
    Finalized,
}

/// Streaming engine feeding one input into many hash algorithms
pub struct HashEngine {
    algorithms: Vec<Algorithm>,
    lifecycle: Lifecycle,
    memory: MemoryTracker,
    bytes_processed: u64,
}

impl fmt::Debug for HashEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashEngine")
            .field("algorithms", &self.algorithms)
            .field("state", &self.state())
            .field("memory_limit", &self.memory.limit())
            .field("memory_used", &self.memory.used())
            .field("bytes_processed", &self.bytes_processed)
            .finish()
    }
}

impl HashEngine {
    /// Create an engine running the full bank with the default budget
    pub fn new() -> Result<Self> {
        Self::with_config(&EngineConfig::default())
    }

    /// Create an engine running only `algorithms`, in the given order
    pub fn with_algorithms(algorithms: impl IntoIterator<Item = Algorithm>) -> Result<Self> {
        Self::with_config(&EngineConfig::with_algorithms(algorithms))
    }

    /// Create an engine from a configuration
    ///
    /// Fails with an exhaustion error if any slot cannot be allocated or the
    /// summed state would exceed `memory_limit`. Slots built before the
    /// failure are dropped, so no partial engine escapes.
    pub fn with_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        let registry = AlgorithmRegistry::global();
        let mut memory = MemoryTracker::new(config.memory_limit);

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(config.algorithms.len())
            .map_err(ResourceError::from)?;

        for &algorithm in &config.algorithms {
            let adapter = registry.get(algorithm).ok_or_else(|| {
                InternalError::assertion(format!("no adapter registered for {algorithm}"))
            })?;

            if let Err(e) = memory.reserve(algorithm, adapter.state_size()) {
                warn!(
                    "Engine creation aborted at {algorithm}: {e} ({} slots released)",
                    slots.len()
                );
                return Err(e);
            }

            slots.push(AlgorithmSlot {
                algorithm,
                digest_len: adapter.digest_len(),
                hasher: adapter.create_hasher()?,
            });
        }

        debug!(
            "Created hash engine with {} algorithms ({} of {} bytes budget)",
            slots.len(),
            memory.used(),
            memory.limit()
        );

        Ok(Self {
            algorithms: config.algorithms.clone(),
            lifecycle: Lifecycle::Active(slots),
            memory,
            bytes_processed: 0,
        })
    }

    /// Feed the next chunk to every algorithm
    ///
    /// An empty chunk is a successful no-op.
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        let Lifecycle::Active(slots) = &mut self.lifecycle else {
            warn!("Rejected update of {} bytes on a finalized engine", data.len());
            return Err(StateError::already_finalized("update").into());
        };

        trace!("Engine update with {} bytes", data.len());
        for slot in slots.iter_mut() {
            slot.hasher.update(data);
        }
        self.bytes_processed = self.bytes_processed.saturating_add(data.len() as u64);
        Ok(())
    }

    /// Finalize, evaluate `policy` over the digests, and discard them
    pub fn finalize_match(&mut self, policy: &dyn MatchPolicy) -> Result<MatchOutcome> {
        let digests = self.drain("finalize_match")?;
        let outcome = policy.evaluate(&digests);
        debug!("Engine finalized for match: {outcome}");
        Ok(outcome)
    }

    /// Finalize and return every digest in engine order
    pub fn finalize_digests(&mut self) -> Result<DigestSet> {
        let digests = self.drain("finalize_digests")?;
        debug!("Engine finalized with {} digests", digests.len());
        Ok(digests)
    }

    pub fn state(&self) -> EngineState {
        match self.lifecycle {
            Lifecycle::Active(_) => EngineState::Active,
            Lifecycle::Finalized => EngineState::Finalized,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.state() == EngineState::Finalized
    }

    /// Algorithms fed by this engine, in engine order
    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    /// Total bytes accepted by `update`
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_processed
    }

    /// Budget reserved by this engine's slots
    pub fn memory_used(&self) -> usize {
        self.memory.used()
    }

    /// Take every slot, leaving the engine finalized even if draining fails
    fn drain(&mut self, operation: &str) -> Result<DigestSet> {
        let slots = match std::mem::replace(&mut self.lifecycle, Lifecycle::Finalized) {
            Lifecycle::Active(slots) => slots,
            Lifecycle::Finalized => {
                warn!("Rejected {operation} on a finalized engine");
                return Err(StateError::already_finalized(operation).into());
            }
        };
        self.memory.release(self.memory.used());

        let mut digests = DigestSet::with_capacity(slots.len())?;
        for slot in slots {
            let digest = slot.hasher.finalize();
            if digest.len() != slot.digest_len {
                return Err(InternalError::hash_calculation(
                    slot.algorithm.id(),
                    &format!(
                        "produced {} bytes, expected {}",
                        digest.len(),
                        slot.digest_len
                    ),
                )
                .into());
            }
            digests.push(slot.algorithm, digest);
        }
        Ok(digests)
    }
}
