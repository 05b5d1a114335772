//! BLAKE-512 (SHA-3 finalist) hash algorithm implementation
//!
//! `blake-hash` still implements the `digest` 0.9 traits, so this adapter
//! drives it through the `digest09` alias rather than the shared adapter.

use crate::Result;
use crate::hashing::traits::{HashAlgorithmImpl, StreamingHasher};
use crate::hashing::{Algorithm, DIGEST_LEN_512, Digest};
use blake_hash::Blake512;
use digest09::Digest as _;

pub struct Blake512Algorithm;

/// BLAKE-512 streaming hasher
struct Blake512StreamingHasher {
    hasher: Blake512,
}

impl StreamingHasher for Blake512StreamingHasher {
    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finalize(self: Box<Self>) -> Digest {
        Digest::new(self.hasher.finalize().to_vec())
    }
}

impl HashAlgorithmImpl for Blake512Algorithm {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Blake512
    }

    fn display_name(&self) -> &'static str {
        "BLAKE-512"
    }

    fn digest_len(&self) -> usize {
        DIGEST_LEN_512
    }

    fn state_size(&self) -> usize {
        std::mem::size_of::<Blake512StreamingHasher>()
    }

    fn create_hasher(&self) -> Result<Box<dyn StreamingHasher>> {
        Ok(Box::new(Blake512StreamingHasher {
            hasher: Blake512::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{hash_hex, hash_in_chunks};
    use super::*;

    #[test]
    fn test_blake512_empty_vector() {
        assert_eq!(
            hash_hex(&Blake512Algorithm, b""),
            "a8cfbbd73726062df0c6864dda65defe58ef0cc52a5625090fa17601e1eecd1b628e94f396ae402a00acc9eab77b4d4c2e852aaaa25a636d80af3fc7913ef5b8"
        );
    }

    #[test]
    fn test_blake512_chunking() {
        let data = vec![0x5au8; 300];
        let whole = hash_hex(&Blake512Algorithm, &data);
        assert_eq!(hash_in_chunks(&Blake512Algorithm, &data, 1), whole);
        assert_eq!(hash_in_chunks(&Blake512Algorithm, &data, 128), whole);
        assert_eq!(whole.len(), DIGEST_LEN_512 * 2);
    }
}
