//! Match policies evaluated over a finalized digest set

use crate::digest_set::DigestSet;
use crate::error::ValidationError;
use crate::hashing::{Algorithm, Digest};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The Deep Web Hash, the 512-bit target the bank was originally built to hunt
pub const DEEP_WEB_HASH: &str = "36367763ab73783c7af284446c59466b4cd653239a311cb7116d4618dee09a8425893dc7500b464fdaf1672d7bef5e891c6e2274568926a49fb4f45132c2a8b4";

/// Result of a match-finalize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    NoMatch,
    /// The first algorithm, in engine order, whose digest satisfied the policy
    Matched(Algorithm),
}

impl MatchOutcome {
    /// Integer outcome code: 0 for no match, else the algorithm's 1-based position
    pub fn code(self) -> u32 {
        match self {
            MatchOutcome::NoMatch => 0,
            MatchOutcome::Matched(algorithm) => algorithm.position(),
        }
    }

    /// Decode an integer outcome code
    pub fn from_code(code: u32) -> Option<Self> {
        if code == 0 {
            return Some(MatchOutcome::NoMatch);
        }
        Algorithm::from_position(code).map(MatchOutcome::Matched)
    }

    pub fn is_match(self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }

    pub fn algorithm(self) -> Option<Algorithm> {
        match self {
            MatchOutcome::NoMatch => None,
            MatchOutcome::Matched(algorithm) => Some(algorithm),
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::NoMatch => f.write_str("no match"),
            MatchOutcome::Matched(algorithm) => write!(f, "match ({algorithm})"),
        }
    }
}

/// Decides whether a finalized digest set matches a target condition
///
/// Implementations must be pure: the same digest set and reference data
/// always give the same outcome.
pub trait MatchPolicy: Send + Sync {
    fn evaluate(&self, digests: &DigestSet) -> MatchOutcome;
}

impl<P: MatchPolicy + ?Sized> MatchPolicy for &P {
    fn evaluate(&self, digests: &DigestSet) -> MatchOutcome {
        (**self).evaluate(digests)
    }
}

impl<P: MatchPolicy + ?Sized> MatchPolicy for Box<P> {
    fn evaluate(&self, digests: &DigestSet) -> MatchOutcome {
        (**self).evaluate(digests)
    }
}

impl<P: MatchPolicy + ?Sized> MatchPolicy for std::sync::Arc<P> {
    fn evaluate(&self, digests: &DigestSet) -> MatchOutcome {
        (**self).evaluate(digests)
    }
}

/// Matches when any computed digest equals any of the targets
#[derive(Debug, Clone, Default)]
pub struct TargetDigestPolicy {
    targets: Vec<Digest>,
}

impl TargetDigestPolicy {
    pub fn new(targets: impl IntoIterator<Item = Digest>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }

    /// Build from hex strings, rejecting anything that is not valid hex
    pub fn from_hex<S: AsRef<str>>(targets: impl IntoIterator<Item = S>) -> Result<Self> {
        let targets = targets
            .into_iter()
            .map(|hex| Digest::from_hex(hex.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { targets })
    }

    /// Policy hunting for the Deep Web Hash under every algorithm
    pub fn deep_web_hash() -> Self {
        Self::from_hex([DEEP_WEB_HASH]).unwrap_or_default()
    }

    pub fn targets(&self) -> &[Digest] {
        &self.targets
    }
}

impl MatchPolicy for TargetDigestPolicy {
    fn evaluate(&self, digests: &DigestSet) -> MatchOutcome {
        digests
            .iter()
            .find(|(_, digest)| self.targets.contains(digest))
            .map_or(MatchOutcome::NoMatch, |(algorithm, _)| {
                MatchOutcome::Matched(algorithm)
            })
    }
}

/// Matches when an algorithm's digest equals the reference recorded for it
#[derive(Debug, Clone, Default)]
pub struct ReferenceTablePolicy {
    references: HashMap<Algorithm, Digest>,
}

impl ReferenceTablePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reference digest for one algorithm, replacing any earlier one
    pub fn with_reference(mut self, algorithm: Algorithm, digest: Digest) -> Self {
        self.references.insert(algorithm, digest);
        self
    }

    /// Build from `(algorithm id, hex digest)` pairs
    pub fn from_hex_table<'a>(
        table: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self> {
        let mut policy = Self::new();
        for (name, hex) in table {
            let algorithm: Algorithm = name.parse()?;
            let digest = Digest::from_hex(hex)?;
            let expected = algorithm
                .to_impl()
                .map(|adapter| adapter.digest_len())
                .unwrap_or(digest.len());
            if digest.len() != expected {
                return Err(Error::Validation(ValidationError::invalid_digest(
                    hex,
                    &format!("{name} digests are {expected} bytes"),
                )));
            }
            policy.references.insert(algorithm, digest);
        }
        Ok(policy)
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

impl MatchPolicy for ReferenceTablePolicy {
    fn evaluate(&self, digests: &DigestSet) -> MatchOutcome {
        digests
            .iter()
            .find(|(algorithm, digest)| self.references.get(algorithm) == Some(*digest))
            .map_or(MatchOutcome::NoMatch, |(algorithm, _)| {
                MatchOutcome::Matched(algorithm)
            })
    }
}

/// Never matches
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverMatch;

impl MatchPolicy for NeverMatch {
    fn evaluate(&self, _digests: &DigestSet) -> MatchOutcome {
        MatchOutcome::NoMatch
    }
}
