//! CubeHash16/32-512 hash algorithm implementation

use crate::Result;
use crate::hashing::traits::{HashAlgorithmImpl, StreamingHasher};
use crate::hashing::{Algorithm, DIGEST_LEN_512, Digest};

/// Rounds per message block
const ROUNDS: usize = 16;
/// Bytes per message block
const BLOCK_SIZE: usize = 32;
/// Initialization and finalization each run ten times the block rounds
const EXTRA_ROUNDS: usize = 10 * ROUNDS;

pub struct CubeHashAlgorithm;

/// CubeHash streaming hasher
struct CubeHashStreamingHasher {
    state: [u32; 32],
    buffer: [u8; BLOCK_SIZE],
    buffered: usize,
}

impl CubeHashStreamingHasher {
    fn new() -> Self {
        let mut state = [0u32; 32];
        state[0] = DIGEST_LEN_512 as u32;
        state[1] = BLOCK_SIZE as u32;
        state[2] = ROUNDS as u32;
        permute(&mut state, EXTRA_ROUNDS);
        Self {
            state,
            buffer: [0; BLOCK_SIZE],
            buffered: 0,
        }
    }

    fn absorb_block(&mut self) {
        for (word, bytes) in self.state.iter_mut().zip(self.buffer.chunks_exact(4)) {
            *word ^= u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }
        permute(&mut self.state, ROUNDS);
        self.buffered = 0;
    }
}

fn permute(x: &mut [u32; 32], rounds: usize) {
    for _ in 0..rounds {
        for i in 0..16 {
            x[i + 16] = x[i + 16].wrapping_add(x[i]);
        }
        for word in x.iter_mut().take(16) {
            *word = word.rotate_left(7);
        }
        for i in 0..8 {
            x.swap(i, i + 8);
        }
        for i in 0..16 {
            x[i] ^= x[i + 16];
        }
        for i in (16..32).filter(|i| i & 2 == 0) {
            x.swap(i, i ^ 2);
        }
        for i in 0..16 {
            x[i + 16] = x[i + 16].wrapping_add(x[i]);
        }
        for word in x.iter_mut().take(16) {
            *word = word.rotate_left(11);
        }
        for i in (0..16).filter(|i| i & 4 == 0) {
            x.swap(i, i ^ 4);
        }
        for i in 0..16 {
            x[i] ^= x[i + 16];
        }
        for i in (16..32).filter(|i| i & 1 == 0) {
            x.swap(i, i ^ 1);
        }
    }
}

impl StreamingHasher for CubeHashStreamingHasher {
    fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let take = (BLOCK_SIZE - self.buffered).min(data.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];
            if self.buffered == BLOCK_SIZE {
                self.absorb_block();
            }
        }
    }

    fn finalize(mut self: Box<Self>) -> Digest {
        let used = self.buffered;
        self.buffer[used] = 0x80;
        self.buffer[used + 1..].fill(0);
        self.absorb_block();

        self.state[31] ^= 1;
        permute(&mut self.state, EXTRA_ROUNDS);

        let bytes = self
            .state
            .iter()
            .take(DIGEST_LEN_512 / 4)
            .flat_map(|word| word.to_le_bytes())
            .collect();
        Digest::new(bytes)
    }
}

impl HashAlgorithmImpl for CubeHashAlgorithm {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Cubehash
    }

    fn display_name(&self) -> &'static str {
        "CubeHash16/32-512"
    }

    fn digest_len(&self) -> usize {
        DIGEST_LEN_512
    }

    fn state_size(&self) -> usize {
        std::mem::size_of::<CubeHashStreamingHasher>()
    }

    fn create_hasher(&self) -> Result<Box<dyn StreamingHasher>> {
        Ok(Box::new(CubeHashStreamingHasher::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{hash_hex, hash_in_chunks};
    use super::*;

    #[test]
    fn test_cubehash_empty_vector() {
        assert_eq!(
            hash_hex(&CubeHashAlgorithm, b""),
            "4a1d00bbcfcb5a9562fb981e7f7db3350fe2658639d948b9d57452c22328bb32f468b072208450bad5ee178271408be0b16e5633ac8a1e3cf9864cfbfc8e043a"
        );
    }

    #[test]
    fn test_cubehash_block_boundaries() {
        // 31, 32 and 33 bytes straddle the padding block
        for len in [31usize, 32, 33, 64] {
            let data = vec![0xa5u8; len];
            let whole = hash_hex(&CubeHashAlgorithm, &data);
            assert_eq!(hash_in_chunks(&CubeHashAlgorithm, &data, 1), whole);
            assert_eq!(hash_in_chunks(&CubeHashAlgorithm, &data, 5), whole);
        }
    }

    #[test]
    fn test_cubehash_distinguishes_trailing_zero() {
        assert_ne!(
            hash_hex(&CubeHashAlgorithm, b""),
            hash_hex(&CubeHashAlgorithm, &[0])
        );
    }
}
