//! Ordered collection of finalized digests

use crate::Result;
use crate::error::ResourceError;
use crate::hashing::{Algorithm, Digest};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Every digest produced by one engine, in engine order
///
/// Produced once at finalize time and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSet {
    entries: Vec<(Algorithm, Digest)>,
}

impl DigestSet {
    /// Allocate an empty set able to hold `count` digests
    pub(crate) fn with_capacity(count: usize) -> Result<Self> {
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(count)
            .map_err(|_| ResourceError::digest_collection(count))?;
        Ok(Self { entries })
    }

    pub(crate) fn push(&mut self, algorithm: Algorithm, digest: Digest) {
        self.entries.push((algorithm, digest));
    }

    /// Digest computed by `algorithm`, if it was part of the engine
    pub fn get(&self, algorithm: Algorithm) -> Option<&Digest> {
        self.entries
            .iter()
            .find(|(a, _)| *a == algorithm)
            .map(|(_, digest)| digest)
    }

    /// Digest by algorithm ID (exact match on the canonical ID)
    pub fn get_by_name(&self, name: &str) -> Option<&Digest> {
        self.entries
            .iter()
            .find(|(a, _)| a.id() == name)
            .map(|(_, digest)| digest)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Algorithm, &Digest)> {
        self.entries.iter().map(|(a, digest)| (*a, digest))
    }

    pub fn algorithms(&self) -> impl Iterator<Item = Algorithm> + '_ {
        self.entries.iter().map(|(a, _)| *a)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Algorithm ID to lowercase hex, in engine order
    pub fn to_hex_map(&self) -> Vec<(&'static str, String)> {
        self.entries
            .iter()
            .map(|(a, digest)| (a.id(), digest.to_hex()))
            .collect()
    }
}

impl Serialize for DigestSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (algorithm, digest) in &self.entries {
            map.serialize_entry(algorithm.id(), &digest.to_hex())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DigestSet {
        let mut set = DigestSet::with_capacity(2).unwrap();
        set.push(Algorithm::Sha512, Digest::new(vec![0xab; 4]));
        set.push(Algorithm::WhirlpoolT, Digest::new(vec![0x01, 0x02]));
        set
    }

    #[test]
    fn test_lookup() {
        let set = sample();
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
        assert_eq!(set.get(Algorithm::Sha512).unwrap().to_hex(), "abababab");
        assert_eq!(set.get_by_name("whirlpoolT").unwrap().to_hex(), "0102");
        assert!(set.get(Algorithm::Md6).is_none());
        assert!(set.get_by_name("whirlpoolt").is_none());
    }

    #[test]
    fn test_order_is_preserved() {
        let set = sample();
        let order: Vec<Algorithm> = set.algorithms().collect();
        assert_eq!(order, vec![Algorithm::Sha512, Algorithm::WhirlpoolT]);

        let hex = set.to_hex_map();
        assert_eq!(hex[0], ("sha512", "abababab".to_string()));
        assert_eq!(hex[1], ("whirlpoolT", "0102".to_string()));
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"sha512":"abababab","whirlpoolT":"0102"}"#);
    }

    #[test]
    fn test_huge_capacity_is_exhaustion() {
        let err = DigestSet::with_capacity(usize::MAX).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Exhaustion);
    }
}
