//! One-shot convenience API
//!
//! Wrappers that build an engine, feed it, and finalize it in one call, for
//! in-memory data and for any `std::io::Read` source.
//!
//! # Examples
//!
//! ```
//! use hashkit_core::{Algorithm, hash_bytes};
//!
//! let digests = hash_bytes(b"hashkit").unwrap();
//! assert_eq!(digests.len(), Algorithm::ALL.len());
//! assert_eq!(digests.get(Algorithm::Sha512).unwrap().len(), 64);
//! ```

use crate::digest_set::DigestSet;
use crate::engine::HashEngine;
use crate::error::ResourceError;
use crate::policy::{MatchOutcome, MatchPolicy};
use crate::{EngineConfig, Result};
use log::debug;
use std::io::{ErrorKind, Read};

/// Every digest of `data` under the full bank
pub fn hash_bytes(data: &[u8]) -> Result<DigestSet> {
    let mut engine = HashEngine::new()?;
    engine.update(data)?;
    engine.finalize_digests()
}

/// Evaluate `policy` over the digests of `data` under the full bank
///
/// ```
/// use hashkit_core::{MatchOutcome, TargetDigestPolicy, check_bytes};
///
/// let outcome = check_bytes(b"hashkit", &TargetDigestPolicy::deep_web_hash()).unwrap();
/// assert_eq!(outcome, MatchOutcome::NoMatch);
/// ```
pub fn check_bytes(data: &[u8], policy: &dyn MatchPolicy) -> Result<MatchOutcome> {
    let mut engine = HashEngine::new()?;
    engine.update(data)?;
    engine.finalize_match(policy)
}

/// Stream `reader` through an engine built from `config`
pub fn hash_reader<R: Read>(reader: R, config: &EngineConfig) -> Result<DigestSet> {
    let mut engine = HashEngine::with_config(config)?;
    feed_reader(&mut engine, reader, config.chunk_size)?;
    engine.finalize_digests()
}

/// Stream `reader` through an engine and evaluate `policy`
pub fn check_reader<R: Read>(
    reader: R,
    config: &EngineConfig,
    policy: &dyn MatchPolicy,
) -> Result<MatchOutcome> {
    let mut engine = HashEngine::with_config(config)?;
    feed_reader(&mut engine, reader, config.chunk_size)?;
    engine.finalize_match(policy)
}

/// Read `reader` to the end in `chunk_size` pieces, feeding each to `engine`
pub fn feed_reader<R: Read>(
    engine: &mut HashEngine,
    mut reader: R,
    chunk_size: usize,
) -> Result<u64> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(chunk_size)
        .map_err(ResourceError::from)?;
    buffer.resize(chunk_size, 0);

    let mut total = 0u64;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        engine.update(&buffer[..read])?;
        total += read as u64;
    }

    debug!("Streamed {total} bytes in chunks of {chunk_size}");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::Algorithm;
    use crate::policy::{NeverMatch, TargetDigestPolicy};
    use crate::{Error, ErrorKind as HashkitErrorKind};
    use std::io::Cursor;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn test_reader_matches_bytes() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 256) as u8).collect();
        let config = EngineConfig {
            chunk_size: 333,
            ..EngineConfig::default()
        };

        let from_reader = hash_reader(Cursor::new(&data), &config).unwrap();
        let from_bytes = hash_bytes(&data).unwrap();
        assert_eq!(from_reader, from_bytes);
    }

    #[test]
    fn test_check_reader_finds_target() {
        let data = b"find me";
        let sha3 = hash_bytes(data).unwrap().get(Algorithm::Sha3).unwrap().clone();
        let policy = TargetDigestPolicy::new([sha3]);

        let outcome = check_reader(Cursor::new(data), &EngineConfig::test(), &policy).unwrap();
        assert_eq!(outcome, MatchOutcome::Matched(Algorithm::Sha3));
        assert_eq!(outcome.code(), 4);

        let outcome = check_bytes(b"not me", &policy).unwrap();
        assert_eq!(outcome, MatchOutcome::NoMatch);
    }

    #[test]
    fn test_reader_error_is_surfaced() {
        let err = check_reader(FailingReader, &EngineConfig::test(), &NeverMatch).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), HashkitErrorKind::Internal);
    }

    #[test]
    fn test_feed_reader_counts_bytes() {
        let mut engine = HashEngine::with_algorithms([Algorithm::Fnv1]).unwrap();
        let total = feed_reader(&mut engine, Cursor::new(vec![1u8; 2500]), 1000).unwrap();
        assert_eq!(total, 2500);
        assert_eq!(engine.bytes_processed(), 2500);
    }
}
