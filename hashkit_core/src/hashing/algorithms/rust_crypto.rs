//! Adapter for algorithms provided by the RustCrypto `digest` 0.10 family

use crate::Result;
use crate::hashing::traits::{HashAlgorithmImpl, StreamingHasher};
use crate::hashing::{Algorithm, Digest};
use digest::Digest as _;
use std::marker::PhantomData;

/// One adapter type for every `digest::Digest` implementation in the bank
pub struct DigestAlgorithm<D> {
    algorithm: Algorithm,
    display_name: &'static str,
    _hasher: PhantomData<fn() -> D>,
}

impl<D> DigestAlgorithm<D> {
    pub fn new(algorithm: Algorithm, display_name: &'static str) -> Self {
        Self {
            algorithm,
            display_name,
            _hasher: PhantomData,
        }
    }
}

/// Streaming wrapper around a RustCrypto hasher
struct DigestStreamingHasher<D> {
    hasher: D,
}

impl<D> StreamingHasher for DigestStreamingHasher<D>
where
    D: digest::Digest + Send,
{
    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finalize(self: Box<Self>) -> Digest {
        Digest::new(self.hasher.finalize().to_vec())
    }
}

impl<D> HashAlgorithmImpl for DigestAlgorithm<D>
where
    D: digest::Digest + Send + 'static,
{
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn display_name(&self) -> &'static str {
        self.display_name
    }

    fn digest_len(&self) -> usize {
        <D as digest::Digest>::output_size()
    }

    fn state_size(&self) -> usize {
        std::mem::size_of::<DigestStreamingHasher<D>>()
    }

    fn create_hasher(&self) -> Result<Box<dyn StreamingHasher>> {
        Ok(Box::new(DigestStreamingHasher { hasher: D::new() }))
    }
}
