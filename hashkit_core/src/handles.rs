//! Opaque engine handles and their registry
//!
//! Callers that cannot hold a `HashEngine` directly work through an
//! `EngineRegistry`: `create` returns an `EngineHandle`, every later call
//! names the engine by that handle, and `release` forgets it. Handles are
//! never reused. Finalized engines stay registered until released, so reuse
//! of a finalized handle reports an invalid-state error while unknown or
//! released handles report an invalid-handle error. Callers that do not
//! release explicitly can hold an `EngineGuard`, which releases on drop.

use crate::digest_set::DigestSet;
use crate::engine::{EngineState, HashEngine};
use crate::error::{InternalError, ValidationError};
use crate::policy::{MatchOutcome, MatchPolicy, TargetDigestPolicy};
use crate::{EngineConfig, Error, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Opaque, non-zero engine identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineHandle(NonZeroU64);

impl EngineHandle {
    /// Reinterpret a raw value received from outside, e.g. across a binding
    ///
    /// Zero is never issued and is rejected here; other values are checked
    /// against the registry when used.
    pub fn from_raw(raw: u64) -> Result<Self> {
        NonZeroU64::new(raw)
            .map(Self)
            .ok_or_else(|| ValidationError::invalid_handle(raw).into())
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type SharedEngine = Arc<Mutex<HashEngine>>;

// Process-wide registry
lazy_static::lazy_static! {
    static ref GLOBAL_REGISTRY: EngineRegistry =
        EngineRegistry::new(TargetDigestPolicy::deep_web_hash());
}

/// Registry owning engines behind opaque handles
pub struct EngineRegistry {
    engines: RwLock<HashMap<EngineHandle, SharedEngine>>,
    next_handle_id: AtomicU64,
    policy: Arc<dyn MatchPolicy>,
    config: EngineConfig,
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.len())
            .field("next_handle_id", &self.next_handle_id.load(Ordering::Relaxed))
            .field("config", &self.config)
            .finish()
    }
}

impl EngineRegistry {
    /// Create a registry whose `finalize` evaluates `policy`
    pub fn new(policy: impl MatchPolicy + 'static) -> Self {
        Self::with_config(policy, EngineConfig::default())
    }

    /// Create a registry with a default engine configuration for `create`
    pub fn with_config(policy: impl MatchPolicy + 'static, config: EngineConfig) -> Self {
        Self {
            engines: RwLock::new(HashMap::new()),
            next_handle_id: AtomicU64::new(1),
            policy: Arc::new(policy),
            config,
        }
    }

    /// Process-wide registry matching against the Deep Web Hash
    pub fn global() -> &'static Self {
        &GLOBAL_REGISTRY
    }

    /// Create an engine with the registry's configuration
    pub fn create(&self) -> Result<EngineHandle> {
        self.create_with(&self.config)
    }

    /// Create an engine with an explicit configuration
    pub fn create_with(&self, config: &EngineConfig) -> Result<EngineHandle> {
        let engine = HashEngine::with_config(config)?;

        let raw = self.next_handle_id.fetch_add(1, Ordering::Relaxed);
        let handle = NonZeroU64::new(raw)
            .map(EngineHandle)
            .ok_or_else(|| InternalError::assertion("engine handle space exhausted"))?;

        self.engines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle, Arc::new(Mutex::new(engine)));
        debug!("Registered engine {handle}");
        Ok(handle)
    }

    /// Feed a chunk to the engine behind `handle`
    pub fn update(&self, handle: EngineHandle, data: &[u8]) -> Result<()> {
        let engine = self.lookup(handle)?;
        let mut engine = lock_engine(&engine, handle)?;
        engine.update(data)
    }

    /// Create an engine whose handle is released when the guard drops
    pub fn create_guarded(&self) -> Result<EngineGuard<'_>> {
        Ok(EngineGuard {
            registry: self,
            handle: self.create()?,
        })
    }

    /// Finalize and evaluate the registry's match policy
    ///
    /// The finalized engine stays registered until `release`.
    pub fn finalize(&self, handle: EngineHandle) -> Result<MatchOutcome> {
        self.finalize_with(handle, self.policy.as_ref())
    }

    /// Finalize and evaluate an explicit match policy
    pub fn finalize_with(
        &self,
        handle: EngineHandle,
        policy: &dyn MatchPolicy,
    ) -> Result<MatchOutcome> {
        let engine = self.lookup(handle)?;
        let mut engine = lock_engine(&engine, handle)?;
        engine.finalize_match(policy)
    }

    /// Finalize and return every digest
    ///
    /// The engine is consumed even when collecting the digests fails, but
    /// the handle stays registered until `release`.
    pub fn finalize_hashes(&self, handle: EngineHandle) -> Result<DigestSet> {
        let engine = self.lookup(handle)?;
        let mut engine = lock_engine(&engine, handle)?;
        engine.finalize_digests()
    }

    /// Lifecycle state of the engine behind `handle`
    pub fn state(&self, handle: EngineHandle) -> Result<EngineState> {
        let engine = self.lookup(handle)?;
        let engine = lock_engine(&engine, handle)?;
        Ok(engine.state())
    }

    /// Forget `handle`, discarding the engine whether or not it was finalized
    pub fn release(&self, handle: EngineHandle) -> Result<()> {
        if self.forget(handle) {
            debug!("Released engine {handle}");
            Ok(())
        } else {
            warn!("Release of unknown engine handle {handle}");
            Err(ValidationError::invalid_handle(handle.get()).into())
        }
    }

    /// Remove `handle` if present, without treating absence as an error
    fn forget(&self, handle: EngineHandle) -> bool {
        self.engines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle)
            .is_some()
    }

    pub fn contains(&self, handle: EngineHandle) -> bool {
        self.engines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&handle)
    }

    /// Number of registered engines, finalized ones included
    pub fn len(&self) -> usize {
        self.engines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, handle: EngineHandle) -> Result<SharedEngine> {
        let engines = self.engines.read().unwrap_or_else(PoisonError::into_inner);
        engines.get(&handle).cloned().ok_or_else(|| {
            warn!("Unknown engine handle {handle}");
            Error::from(ValidationError::invalid_handle(handle.get()))
        })
    }
}

/// Scoped handle that releases its engine on drop
#[derive(Debug)]
pub struct EngineGuard<'a> {
    registry: &'a EngineRegistry,
    handle: EngineHandle,
}

impl EngineGuard<'_> {
    pub fn handle(&self) -> EngineHandle {
        self.handle
    }
}

impl Drop for EngineGuard<'_> {
    fn drop(&mut self) {
        if self.registry.forget(self.handle) {
            debug!("Released engine {} on drop", self.handle);
        }
    }
}

/// A poisoned engine panicked mid-update and can no longer be trusted
fn lock_engine(engine: &SharedEngine, handle: EngineHandle) -> Result<MutexGuard<'_, HashEngine>> {
    engine.lock().map_err(|_| {
        InternalError::assertion(format!("engine {handle} was poisoned by a panic")).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::hashing::Algorithm;
    use crate::policy::NeverMatch;

    fn small_config() -> EngineConfig {
        EngineConfig::with_algorithms([Algorithm::Sha512, Algorithm::Fnv1a])
    }

    #[test]
    fn test_handles_are_unique_and_non_zero() {
        let registry = EngineRegistry::with_config(NeverMatch, small_config());
        let a = registry.create().unwrap();
        let b = registry.create().unwrap();
        assert_ne!(a, b);
        assert!(a.get() > 0 && b.get() > 0);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_zero_handle_is_invalid() {
        let err = EngineHandle::from_raw(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidHandle);
    }

    #[test]
    fn test_foreign_handle_is_invalid() {
        let registry = EngineRegistry::with_config(NeverMatch, small_config());
        let foreign = EngineHandle::from_raw(9_999).unwrap();

        for err in [
            registry.update(foreign, b"x").unwrap_err(),
            registry.finalize(foreign).unwrap_err(),
            registry.finalize_hashes(foreign).unwrap_err(),
            registry.release(foreign).unwrap_err(),
        ] {
            assert_eq!(err.kind(), ErrorKind::InvalidHandle);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_finalized_handle_is_a_tombstone() {
        let registry = EngineRegistry::with_config(NeverMatch, small_config());
        let handle = registry.create().unwrap();
        registry.update(handle, b"data").unwrap();
        assert_eq!(registry.finalize(handle).unwrap(), MatchOutcome::NoMatch);

        assert_eq!(registry.state(handle).unwrap(), EngineState::Finalized);
        assert_eq!(
            registry.update(handle, b"more").unwrap_err().kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            registry.finalize_hashes(handle).unwrap_err().kind(),
            ErrorKind::InvalidState
        );

        registry.release(handle).unwrap();
        assert!(!registry.contains(handle));
        assert_eq!(
            registry.update(handle, b"more").unwrap_err().kind(),
            ErrorKind::InvalidHandle
        );
    }

    #[test]
    fn test_release_of_active_engine() {
        let registry = EngineRegistry::with_config(NeverMatch, small_config());
        let handle = registry.create().unwrap();
        registry.update(handle, b"partial").unwrap();
        registry.release(handle).unwrap();
        assert_eq!(
            registry.finalize(handle).unwrap_err().kind(),
            ErrorKind::InvalidHandle
        );
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let registry = EngineRegistry::with_config(NeverMatch, small_config());
        let handle = {
            let guard = registry.create_guarded().unwrap();
            registry.update(guard.handle(), b"data").unwrap();
            registry.finalize(guard.handle()).unwrap();
            assert!(registry.contains(guard.handle()));
            guard.handle()
        };
        assert!(!registry.contains(handle));
        assert!(registry.is_empty());

        // An explicit release before the drop is fine
        let guard = registry.create_guarded().unwrap();
        registry.release(guard.handle()).unwrap();
        drop(guard);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_global_registry_is_shared() {
        let handle = EngineRegistry::global().create().unwrap();
        assert!(EngineRegistry::global().contains(handle));
        EngineRegistry::global().release(handle).unwrap();
    }
}
