//! Hash algorithm bank for the hashkit core library
//!
//! This module contains the fixed set of algorithms an engine can fan input
//! out to, the uniform adapter traits, and the digest value type.

use crate::{Error, Result, error::ValidationError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

mod algorithms;
mod registry;
mod traits;

pub use registry::AlgorithmRegistry;
pub use traits::{HashAlgorithmImpl, StreamingHasher};

/// Digest length shared by every algorithm in the default bank
pub const DIGEST_LEN_512: usize = 64;

/// Hash algorithms in the bank, in canonical engine order
///
/// The declaration order is the engine order. Match outcome codes are the
/// 1-based position in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Algorithm {
    /// SHA-512
    Sha512,
    /// BLAKE2b-512
    Blake2b,
    /// GOST R 34.11-2012 (Streebog), 512-bit
    Streebog,
    /// SHA3-512
    Sha3,
    /// FNV-0, 512-bit
    Fnv0,
    /// FNV-1, 512-bit
    Fnv1,
    /// FNV-1a, 512-bit
    Fnv1a,
    /// Grøstl-512
    Grostl,
    /// MD6-512
    Md6,
    /// JH-512
    Jh,
    /// BLAKE-512 (SHA-3 finalist)
    Blake512,
    /// LSH-512-512
    Lsh,
    /// Skein-512-512
    Skein,
    /// Keccak-512 with the original padding
    Keccak3,
    /// CubeHash16/32-512
    Cubehash,
    /// Whirlpool
    Whirlpool,
    /// Whirlpool-0
    Whirlpool0,
    /// Whirlpool-T
    WhirlpoolT,
}

impl Algorithm {
    /// Every algorithm, in engine order
    pub const ALL: [Algorithm; 18] = [
        Algorithm::Sha512,
        Algorithm::Blake2b,
        Algorithm::Streebog,
        Algorithm::Sha3,
        Algorithm::Fnv0,
        Algorithm::Fnv1,
        Algorithm::Fnv1a,
        Algorithm::Grostl,
        Algorithm::Md6,
        Algorithm::Jh,
        Algorithm::Blake512,
        Algorithm::Lsh,
        Algorithm::Skein,
        Algorithm::Keccak3,
        Algorithm::Cubehash,
        Algorithm::Whirlpool,
        Algorithm::Whirlpool0,
        Algorithm::WhirlpoolT,
    ];

    /// Stable identifier, used as the digest set key
    pub const fn id(self) -> &'static str {
        match self {
            Algorithm::Sha512 => "sha512",
            Algorithm::Blake2b => "blake2b",
            Algorithm::Streebog => "streebog",
            Algorithm::Sha3 => "sha3",
            Algorithm::Fnv0 => "fnv0",
            Algorithm::Fnv1 => "fnv1",
            Algorithm::Fnv1a => "fnv1a",
            Algorithm::Grostl => "grostl",
            Algorithm::Md6 => "md6",
            Algorithm::Jh => "jh",
            Algorithm::Blake512 => "blake512",
            Algorithm::Lsh => "lsh",
            Algorithm::Skein => "skein",
            Algorithm::Keccak3 => "keccak3",
            Algorithm::Cubehash => "cubehash",
            Algorithm::Whirlpool => "whirlpool",
            Algorithm::Whirlpool0 => "whirlpool0",
            Algorithm::WhirlpoolT => "whirlpoolT",
        }
    }

    /// 1-based position in engine order
    pub const fn position(self) -> u32 {
        self as u32 + 1
    }

    /// Look up an algorithm by its 1-based engine position
    pub fn from_position(position: u32) -> Option<Self> {
        let index = usize::try_from(position.checked_sub(1)?).ok()?;
        Self::ALL.get(index).copied()
    }

    /// Get the adapter registered for this algorithm
    pub fn to_impl(self) -> Option<Arc<dyn HashAlgorithmImpl>> {
        AlgorithmRegistry::global().get(self)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Validation(ValidationError::unknown_algorithm(s)))
    }
}

impl From<Algorithm> for String {
    fn from(algorithm: Algorithm) -> Self {
        algorithm.id().to_string()
    }
}

impl TryFrom<String> for Algorithm {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Finalized output of one hash algorithm
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// Wrap raw digest bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parse a digest from a hex string (either case)
    pub fn from_hex(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation(ValidationError::invalid_digest(
                value,
                "digest is empty",
            )));
        }
        hex::decode(trimmed).map(Self).map_err(|e| {
            Error::Validation(ValidationError::invalid_digest(value, &e.to_string()))
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex encoding
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Digest {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Digest::from_hex(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_algorithm_order_matches_ids() {
        let ids: Vec<&str> = Algorithm::ALL.iter().map(|a| a.id()).collect();
        assert_eq!(
            ids,
            vec![
                "sha512",
                "blake2b",
                "streebog",
                "sha3",
                "fnv0",
                "fnv1",
                "fnv1a",
                "grostl",
                "md6",
                "jh",
                "blake512",
                "lsh",
                "skein",
                "keccak3",
                "cubehash",
                "whirlpool",
                "whirlpool0",
                "whirlpoolT",
            ]
        );
    }

    #[test]
    fn test_positions_are_one_based() {
        assert_eq!(Algorithm::Sha512.position(), 1);
        assert_eq!(Algorithm::Md6.position(), 9);
        assert_eq!(Algorithm::WhirlpoolT.position(), 18);
        assert_eq!(Algorithm::from_position(0), None);
        assert_eq!(Algorithm::from_position(19), None);
        for algorithm in Algorithm::ALL {
            assert_eq!(Algorithm::from_position(algorithm.position()), Some(algorithm));
        }
    }

    #[test]
    fn test_algorithm_from_str_ignores_case() {
        assert_eq!("whirlpoolT".parse::<Algorithm>().unwrap(), Algorithm::WhirlpoolT);
        assert_eq!("whirlpoolt".parse::<Algorithm>().unwrap(), Algorithm::WhirlpoolT);
        assert_eq!("SHA512".parse::<Algorithm>().unwrap(), Algorithm::Sha512);

        let err = "md5".parse::<Algorithm>().unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownAlgorithm { .. })
        ));
    }

    #[test]
    fn test_algorithm_serde_uses_ids() {
        let json = serde_json::to_string(&Algorithm::WhirlpoolT).unwrap();
        assert_eq!(json, "\"whirlpoolT\"");
        let parsed: Algorithm = serde_json::from_str("\"keccak3\"").unwrap();
        assert_eq!(parsed, Algorithm::Keccak3);
        assert!(serde_json::from_str::<Algorithm>("\"crc32\"").is_err());
    }

    #[test]
    fn test_every_algorithm_is_registered() {
        for algorithm in Algorithm::ALL {
            let adapter = algorithm.to_impl().unwrap();
            assert_eq!(adapter.algorithm(), algorithm);
            assert_eq!(adapter.id(), algorithm.id());
            assert_eq!(adapter.digest_len(), DIGEST_LEN_512);
        }
    }

    #[test]
    fn test_digest_hex() {
        let digest = Digest::from_hex("00FFab").unwrap();
        assert_eq!(digest.as_bytes(), &[0x00, 0xff, 0xab]);
        assert_eq!(digest.to_hex(), "00ffab");
        assert_eq!(format!("{digest}"), "00ffab");
        assert_eq!(format!("{digest:?}"), "Digest(00ffab)");

        assert!(Digest::from_hex("").is_err());
        assert!(Digest::from_hex("  ").is_err());
        assert!(Digest::from_hex("\t\n").is_err());
        assert_eq!(Digest::from_hex(" ab ").unwrap().as_bytes(), &[0xab]);
        assert!(Digest::from_hex("abc").is_err());
        assert!(Digest::from_hex("zz").is_err());
    }

    proptest! {
        #[test]
        fn test_digest_hex_is_lossless(bytes: Vec<u8>) {
            prop_assume!(!bytes.is_empty());
            let digest = Digest::new(bytes.clone());
            let parsed = Digest::from_hex(&digest.to_hex()).unwrap();
            prop_assert_eq!(parsed.as_bytes(), bytes.as_slice());
        }
    }
}
