//! LSH-512-512 hash algorithm implementation (KS X 3262)

use crate::Result;
use crate::error::ResourceError;
use crate::hashing::traits::{HashAlgorithmImpl, StreamingHasher};
use crate::hashing::{Algorithm, DIGEST_LEN_512, Digest};

const BLOCK_SIZE: usize = 256;
const STEPS: usize = 28;

const GAMMA: [u32; 8] = [0, 16, 32, 48, 8, 24, 40, 56];
const TAU: [usize; 8] = [3, 2, 0, 1, 7, 4, 5, 6];
const SIGMA: [usize; 16] = [6, 4, 5, 7, 12, 15, 14, 13, 2, 0, 1, 3, 8, 11, 10, 9];

const STEP_CONSTANTS: [[u64; 8]; STEPS] = step_constants();

/// SC_0 is fixed, SC_j = SC_{j-1} + (SC_{j-1} <<< 8)
const fn step_constants() -> [[u64; 8]; STEPS] {
    let mut table = [[0u64; 8]; STEPS];
    table[0] = [
        0x97884283c938982a,
        0xba1fca93533e2355,
        0xc519a2e87aeb1c03,
        0x9a0fc95462af17b1,
        0xfc3dda8ab019a82b,
        0x02825d079a895407,
        0x79f2d0a7ee06a6f7,
        0xd76d15eed9fdf5fe,
    ];
    let mut j = 1;
    while j < STEPS {
        let mut l = 0;
        while l < 8 {
            let prev = table[j - 1][l];
            table[j][l] = prev.wrapping_add(prev.rotate_left(8));
            l += 1;
        }
        j += 1;
    }
    table
}

const INITIAL_CV: [u64; 16] = initial_chaining_value();

/// The IV is the compression of (64, 512, 0, ...) with an all-zero block
const fn initial_chaining_value() -> [u64; 16] {
    let mut cv = [0u64; 16];
    cv[0] = 64;
    cv[1] = (DIGEST_LEN_512 * 8) as u64;
    compress(&mut cv, &[0; 32]);
    cv
}

const fn step(t: &mut [u64; 16], msg: &[u64; 16], j: usize) {
    let (alpha, beta) = if j % 2 == 0 { (23, 59) } else { (7, 3) };
    let mut l = 0;
    while l < 16 {
        t[l] ^= msg[l];
        l += 1;
    }

    let mut l = 0;
    while l < 8 {
        let mut x = t[l];
        let mut y = t[l + 8];
        x = x.wrapping_add(y).rotate_left(alpha) ^ STEP_CONSTANTS[j][l];
        y = x.wrapping_add(y).rotate_left(beta);
        x = x.wrapping_add(y);
        y = y.rotate_left(GAMMA[l]);
        t[l] = x;
        t[l + 8] = y;
        l += 1;
    }

    let source = *t;
    let mut l = 0;
    while l < 16 {
        t[l] = source[SIGMA[l]];
        l += 1;
    }
}

/// M_j[l] = M_{j-1}[l] + M_{j-2}[tau(l)]
const fn expand(prev: &[u64; 16], prev2: &[u64; 16]) -> [u64; 16] {
    let mut next = [0u64; 16];
    let mut l = 0;
    while l < 16 {
        next[l] = prev[l].wrapping_add(prev2[TAU[l % 8] + (l / 8) * 8]);
        l += 1;
    }
    next
}

const fn compress(cv: &mut [u64; 16], block: &[u64; 32]) {
    let mut m0 = [0u64; 16];
    let mut m1 = [0u64; 16];
    let mut l = 0;
    while l < 16 {
        m0[l] = block[l];
        m1[l] = block[l + 16];
        l += 1;
    }

    let mut j = 0;
    while j < STEPS {
        step(cv, &m0, j);
        let next = expand(&m1, &m0);
        m0 = m1;
        m1 = next;
        j += 1;
    }

    let mut l = 0;
    while l < 16 {
        cv[l] ^= m0[l];
        l += 1;
    }
}

pub struct LshAlgorithm;

/// LSH-512 streaming hasher
struct LshStreamingHasher {
    cv: [u64; 16],
    buffer: Vec<u8>,
}

impl LshStreamingHasher {
    fn new() -> Result<Self> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(BLOCK_SIZE)
            .map_err(ResourceError::from)?;
        Ok(Self {
            cv: INITIAL_CV,
            buffer,
        })
    }

    fn compress_buffer(&mut self) {
        let mut words = [0u64; 32];
        for (word, bytes) in words.iter_mut().zip(self.buffer.chunks_exact(8)) {
            let mut le = [0u8; 8];
            le.copy_from_slice(bytes);
            *word = u64::from_le_bytes(le);
        }
        compress(&mut self.cv, &words);
        self.buffer.clear();
    }
}

impl StreamingHasher for LshStreamingHasher {
    fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let take = (BLOCK_SIZE - self.buffer.len()).min(data.len());
            self.buffer.extend_from_slice(&data[..take]);
            data = &data[take..];
            if self.buffer.len() == BLOCK_SIZE {
                self.compress_buffer();
            }
        }
    }

    fn finalize(mut self: Box<Self>) -> Digest {
        self.buffer.push(0x80);
        self.buffer.resize(BLOCK_SIZE, 0);
        self.compress_buffer();

        let bytes = (0..8)
            .flat_map(|l| (self.cv[l] ^ self.cv[l + 8]).to_le_bytes())
            .collect();
        Digest::new(bytes)
    }
}

impl HashAlgorithmImpl for LshAlgorithm {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Lsh
    }

    fn display_name(&self) -> &'static str {
        "LSH-512-512"
    }

    fn digest_len(&self) -> usize {
        DIGEST_LEN_512
    }

    fn state_size(&self) -> usize {
        std::mem::size_of::<LshStreamingHasher>() + BLOCK_SIZE
    }

    fn create_hasher(&self) -> Result<Box<dyn StreamingHasher>> {
        Ok(Box::new(LshStreamingHasher::new()?))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{hash_hex, hash_in_chunks};
    use super::*;

    #[test]
    fn test_initial_chaining_value() {
        assert_eq!(INITIAL_CV[0], 0xadd50f3c7f07094e);
        assert_eq!(INITIAL_CV[1], 0xe3f3cee8f9418a4f);
    }

    #[test]
    fn test_lsh_vectors() {
        assert_eq!(
            hash_hex(&LshAlgorithm, b"abc"),
            "a3d93cfe60dc1aacdd3bd4bef0a6985381a396c7d49d9fd177795697c3535208b5c57224bef21084d42083e95a4bd8eb33e869812b65031c428819a1e7ce596d"
        );
        assert_eq!(
            hash_hex(&LshAlgorithm, b""),
            "118a2ff2a99e3b2134125e2baf20ebe3bdd034d5a69b29c22fc4995063340b46697801d7f7fb0070568f78e8ed514215fc70af27d6f27b01aa8a1da72b14ce7c"
        );
    }

    #[test]
    fn test_lsh_block_boundaries() {
        for len in [255usize, 256, 257, 600] {
            let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let whole = hash_hex(&LshAlgorithm, &data);
            assert_eq!(hash_in_chunks(&LshAlgorithm, &data, 3), whole);
            assert_eq!(hash_in_chunks(&LshAlgorithm, &data, 256), whole);
        }
    }
}
