//! MD6-512 hash algorithm implementation
//!
//! Unkeyed, default mode control L = 64, so hashing is always a 4-ary tree:
//! level 1 holds 512-byte leaves, every higher level packs four 128-byte
//! chaining values into one block.

use crate::Result;
use crate::error::ResourceError;
use crate::hashing::traits::{HashAlgorithmImpl, StreamingHasher};
use crate::hashing::{Algorithm, DIGEST_LEN_512, Digest};

/// Compression input length in words
const N: usize = 89;
/// Compression output length in words
const C: usize = 16;
/// Block length in words
const B: usize = 64;
const BLOCK_BYTES: usize = B * 8;
const BLOCK_BITS: usize = B * 64;
/// Digest length in bits
const D: usize = DIGEST_LEN_512 * 8;
/// Rounds for d = 512
const ROUNDS: usize = 40 + D / 4;
/// Mode control
const L: u64 = 64;

/// Fractional part of sqrt(6)
const Q: [u64; 15] = [
    0x7311c2812425cfa0,
    0x6432286434aac8e7,
    0xb60450e9ef68b7c1,
    0xe8fb23908d9f06f1,
    0xdd2e76cba691e5bf,
    0x0cd0d63b2c30bc41,
    0x1f8ccf6823058f8a,
    0x54e5ed5b88e3775d,
    0x4ad12aae0a6d6031,
    0x3e7f16bb88222e0d,
    0x8af8671d3fb50c2c,
    0x995ad1178bd25c31,
    0xc878c1dd04c4b633,
    0x3b72066c7a1552ac,
    0x0d6f3522631effcb,
];

const RIGHT_SHIFTS: [u32; C] = [10, 5, 13, 10, 11, 12, 2, 7, 14, 15, 7, 13, 11, 7, 6, 12];
const LEFT_SHIFTS: [u32; C] = [11, 24, 9, 16, 15, 9, 27, 15, 6, 2, 29, 8, 15, 5, 31, 9];

const S0: u64 = 0x0123456789abcdef;
const S_MASK: u64 = 0x7311c2812425cfa0;

/// Tap positions, counted back from the word being computed
const T0: usize = 17;
const T1: usize = 18;
const T2: usize = 21;
const T3: usize = 31;
const T4: usize = 67;

/// One tree level waiting to be compressed
#[derive(Clone)]
struct Level {
    words: [u64; B],
    bits: usize,
    index: u64,
}

impl Level {
    fn new() -> Self {
        Self {
            words: [0; B],
            bits: 0,
            index: 0,
        }
    }
}

pub struct Md6Algorithm;

/// MD6 streaming hasher
struct Md6StreamingHasher {
    leaf: Vec<u8>,
    levels: Vec<Level>,
    /// Highest level that has received data, 1-based
    top: usize,
    /// Compression working array, reused across blocks
    scratch: Vec<u64>,
}

impl Md6StreamingHasher {
    fn new() -> Result<Self> {
        let mut leaf = Vec::new();
        leaf.try_reserve_exact(BLOCK_BYTES)
            .map_err(ResourceError::from)?;

        let scratch_len = N + ROUNDS * C;
        let mut scratch = Vec::new();
        scratch
            .try_reserve_exact(scratch_len)
            .map_err(ResourceError::from)?;
        scratch.resize(scratch_len, 0);

        Ok(Self {
            leaf,
            levels: vec![Level::new()],
            top: 1,
            scratch,
        })
    }

    fn level_mut(&mut self, ell: usize) -> &mut Level {
        while self.levels.len() < ell {
            self.levels.push(Level::new());
        }
        &mut self.levels[ell - 1]
    }

    /// Move the buffered leaf bytes into level 1 as big-endian words
    fn load_leaf(&mut self) {
        let bits = self.leaf.len() * 8;
        let mut words = [0u64; B];
        for (word, bytes) in words.iter_mut().zip(self.leaf.chunks(8)) {
            let mut be = [0u8; 8];
            be[..bytes.len()].copy_from_slice(bytes);
            *word = u64::from_be_bytes(be);
        }
        let level = self.level_mut(1);
        level.words = words;
        level.bits = bits;
        self.leaf.clear();
    }

    /// Compress level `ell` if it is full (or if finalizing) and push the
    /// chaining value upward. Returns the root chaining value once reached.
    fn process(&mut self, mut ell: usize, last: bool) -> Option<[u64; C]> {
        loop {
            let top = self.top;
            let level = self.level_mut(ell);
            if !last && level.bits < BLOCK_BITS {
                return None;
            }

            let is_root = last && ell == top;
            let padding = (BLOCK_BITS - level.bits) as u64;
            let unique_id = ((ell as u64) << 56) | level.index;
            let control = ((ROUNDS as u64) << 48)
                | (L << 40)
                | (u64::from(is_root) << 36)
                | (padding << 20)
                | D as u64;
            let block = level.words;
            level.words = [0; B];
            level.bits = 0;
            level.index += 1;

            let chaining = compress(&mut self.scratch, unique_id, control, &block);
            if is_root {
                return Some(chaining);
            }

            let parent = self.level_mut(ell + 1);
            let pos = parent.bits / 64;
            parent.words[pos..pos + C].copy_from_slice(&chaining);
            parent.bits += C * 64;
            ell += 1;
            self.top = self.top.max(ell);
        }
    }
}

/// The MD6 compression function over the input N = Q || K || U || V || B
fn compress(a: &mut [u64], unique_id: u64, control: u64, block: &[u64; B]) -> [u64; C] {
    a[..15].copy_from_slice(&Q);
    a[15..23].fill(0);
    a[23] = unique_id;
    a[24] = control;
    a[25..N].copy_from_slice(block);

    let mut s = S0;
    let mut i = N;
    for _ in 0..ROUNDS {
        for step in 0..C {
            let mut x = s ^ a[i - N] ^ a[i - T0];
            x ^= (a[i - T1] & a[i - T2]) ^ (a[i - T3] & a[i - T4]);
            x ^= x >> RIGHT_SHIFTS[step];
            a[i] = x ^ (x << LEFT_SHIFTS[step]);
            i += 1;
        }
        s = s.rotate_left(1) ^ (s & S_MASK);
    }

    let mut out = [0u64; C];
    out.copy_from_slice(&a[i - C..i]);
    out
}

impl StreamingHasher for Md6StreamingHasher {
    fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            // A full leaf is only compressed once more input shows it is not the last
            if self.leaf.len() == BLOCK_BYTES {
                self.load_leaf();
                self.process(1, false);
            }
            let take = (BLOCK_BYTES - self.leaf.len()).min(data.len());
            self.leaf.extend_from_slice(&data[..take]);
            data = &data[take..];
        }
    }

    fn finalize(mut self: Box<Self>) -> Digest {
        self.load_leaf();
        let start = if self.top == 1 {
            1
        } else {
            (1..=self.top)
                .find(|&ell| self.levels[ell - 1].bits > 0)
                .unwrap_or(self.top)
        };

        // process always reaches the root when finalizing
        let root = self.process(start, true).unwrap_or([0; C]);
        let bytes: Vec<u8> = root.iter().flat_map(|word| word.to_be_bytes()).collect();
        Digest::new(bytes[bytes.len() - DIGEST_LEN_512..].to_vec())
    }
}

impl HashAlgorithmImpl for Md6Algorithm {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Md6
    }

    fn display_name(&self) -> &'static str {
        "MD6-512"
    }

    fn digest_len(&self) -> usize {
        DIGEST_LEN_512
    }

    fn state_size(&self) -> usize {
        std::mem::size_of::<Md6StreamingHasher>()
            + BLOCK_BYTES
            + (N + ROUNDS * C) * 8
            + std::mem::size_of::<Level>()
    }

    fn create_hasher(&self) -> Result<Box<dyn StreamingHasher>> {
        Ok(Box::new(Md6StreamingHasher::new()?))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{hash_hex, hash_in_chunks};
    use super::*;

    #[test]
    fn test_md6_empty_vector() {
        assert_eq!(
            hash_hex(&Md6Algorithm, b""),
            "6b7f33821a2c060ecdd81aefddea2fd3c4720270e18654f4cb08ece49ccb469f8beeee7c831206bd577f9f2630d9177979203a9489e47e04df4e6deaa0f8e0c0"
        );
    }

    #[test]
    fn test_md6_fox_vector() {
        assert_eq!(
            hash_hex(&Md6Algorithm, b"The quick brown fox jumps over the lazy dog"),
            "dcba0c6593fbd83a0f5f148588baa79530579c1f5e7f19d500fe282d137bff465106f25c9f0619b4082a730683d5f58311c0c1913068e91b0ebdf9ace3ff5b9e"
        );
    }

    #[test]
    fn test_md6_three_level_tree_vector() {
        // Five leaves: level 2 fills once and the root sits at level 3
        let data: Vec<u8> = (0..9).flat_map(|_| 0..=255u8).collect();
        assert_eq!(data.len(), 2304);
        let expected = "f66343c7f9b998296faeee9b3fa20599c5f4b09d608c8a850ae0ca8c2d54c1401d44079b741c27390f68b2ed192ae8562a7eecf5866bc0340d461c256b7ba9a5";
        assert_eq!(hash_hex(&Md6Algorithm, &data), expected);
        assert_eq!(hash_in_chunks(&Md6Algorithm, &data, 100), expected);
    }

    #[test]
    fn test_md6_tree_levels_ignore_chunking() {
        // One leaf, exactly full, one byte over, and enough leaves to fill level 2
        for len in [512usize, 513, 2048, 2560, 9 * 512 + 7] {
            let data: Vec<u8> = (0..len).map(|i| (i % 253) as u8).collect();
            let whole = hash_hex(&Md6Algorithm, &data);
            assert_eq!(hash_in_chunks(&Md6Algorithm, &data, 1), whole, "len {len}");
            assert_eq!(hash_in_chunks(&Md6Algorithm, &data, 512), whole, "len {len}");
            assert_eq!(hash_in_chunks(&Md6Algorithm, &data, 1000), whole, "len {len}");
        }
    }

    #[test]
    fn test_md6_full_leaf_differs_from_two_leaves() {
        let one = hash_hex(&Md6Algorithm, &[7u8; 512]);
        let two = hash_hex(&Md6Algorithm, &[7u8; 513]);
        assert_ne!(one, two);
    }
}
