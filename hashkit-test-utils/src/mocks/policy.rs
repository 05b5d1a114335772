//! Recording match policy for testing

use hashkit_core::{DigestSet, MatchOutcome, MatchPolicy, NeverMatch};
use std::sync::{Arc, Mutex};

/// Match policy that records every digest set it is asked to evaluate
///
/// The decision itself is delegated to an inner policy.
///
/// # Examples
///
/// ```
/// use hashkit_core::{HashEngine, MatchOutcome};
/// use hashkit_test_utils::RecordingPolicy;
///
/// let policy = RecordingPolicy::new();
/// let mut engine = HashEngine::new().unwrap();
/// engine.update(b"data").unwrap();
/// assert_eq!(engine.finalize_match(&policy).unwrap(), MatchOutcome::NoMatch);
/// assert_eq!(policy.evaluations(), 1);
/// ```
#[derive(Clone)]
pub struct RecordingPolicy {
    inner: Arc<dyn MatchPolicy>,
    seen: Arc<Mutex<Vec<DigestSet>>>,
}

impl Default for RecordingPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPolicy {
    /// Record evaluations and never match
    pub fn new() -> Self {
        Self::wrapping(NeverMatch)
    }

    /// Record evaluations and answer with `inner`
    pub fn wrapping(inner: impl MatchPolicy + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of times `evaluate` was called
    pub fn evaluations(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// The most recent digest set evaluated
    pub fn last_seen(&self) -> Option<DigestSet> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl MatchPolicy for RecordingPolicy {
    fn evaluate(&self, digests: &DigestSet) -> MatchOutcome {
        self.seen.lock().unwrap().push(digests.clone());
        self.inner.evaluate(digests)
    }
}
