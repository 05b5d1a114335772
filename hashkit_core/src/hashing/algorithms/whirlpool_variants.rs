//! Whirlpool-0 and Whirlpool-T hash algorithm implementations
//!
//! Both earlier Whirlpool revisions share the 2003 construction (Miyaguchi-
//! Preneel over the W block cipher, 10 rounds, 256-bit length padding) and
//! differ only in the substitution box and diffusion matrix: Whirlpool-0
//! uses a randomly generated S-box, Whirlpool-T the structured one, and the
//! final revision (from the `whirlpool` crate) also changes the matrix. This
//! module implements the generic round so each revision is a table of
//! parameters.

use crate::Result;
use crate::hashing::traits::{HashAlgorithmImpl, StreamingHasher};
use crate::hashing::{Algorithm, DIGEST_LEN_512, Digest};

const BLOCK_SIZE: usize = 64;
const ROUNDS: usize = 10;
/// Reduction polynomial x^8 + x^4 + x^3 + x^2 + 1
const POLY: u16 = 0x11d;

/// Circulant matrix row shared by Whirlpool-0 and Whirlpool-T
const MATRIX_ORIGINAL: [u8; 8] = [1, 1, 3, 1, 5, 8, 9, 5];

const MINI_E: [u8; 16] = [
    0x1, 0xB, 0x9, 0xC, 0xD, 0x6, 0xF, 0x3, 0xE, 0x8, 0x7, 0x4, 0xA, 0x2, 0x5, 0x0,
];
const MINI_R: [u8; 16] = [
    0x7, 0xC, 0xB, 0xD, 0xE, 0x4, 0x9, 0xF, 0x6, 0x3, 0x8, 0xA, 0x2, 0x5, 0x1, 0x0,
];

/// The 8-bit S-box built from the E, E^-1 and R mini-boxes
const STRUCTURED_SBOX: [u8; 256] = structured_sbox();

const fn structured_sbox() -> [u8; 256] {
    let mut e_inv = [0u8; 16];
    let mut i = 0;
    while i < 16 {
        e_inv[MINI_E[i] as usize] = i as u8;
        i += 1;
    }

    let mut sbox = [0u8; 256];
    let mut u = 0;
    while u < 256 {
        let a = MINI_E[u >> 4];
        let b = e_inv[u & 0xf];
        let r = MINI_R[(a ^ b) as usize];
        sbox[u] = (MINI_E[(a ^ r) as usize] << 4) | e_inv[(b ^ r) as usize];
        u += 1;
    }
    sbox
}

/// Whirlpool-0 S-box, generated pseudo-randomly rather than from mini-boxes
const RANDOM_SBOX: [u8; 256] = [
    0x68, 0xd0, 0xeb, 0x2b, 0x48, 0x9d, 0x6a, 0xe4, 0xe3, 0xa3, 0x56, 0x81, 0x7d, 0xf1, 0x85, 0x9e,
    0x2c, 0x8e, 0x78, 0xca, 0x17, 0xa9, 0x61, 0xd5, 0x5d, 0x0b, 0x8c, 0x3c, 0x77, 0x51, 0x22, 0x42,
    0x3f, 0x54, 0x41, 0x80, 0xcc, 0x86, 0xb3, 0x18, 0x2e, 0x57, 0x06, 0x62, 0xf4, 0x36, 0xd1, 0x6b,
    0x1b, 0x65, 0x75, 0x10, 0xda, 0x49, 0x26, 0xf9, 0xcb, 0x66, 0xe7, 0xba, 0xae, 0x50, 0x52, 0xab,
    0x05, 0xf0, 0x0d, 0x73, 0x3b, 0x04, 0x20, 0xfe, 0xdd, 0xf5, 0xb4, 0x5f, 0x0a, 0xb5, 0xc0, 0xa0,
    0x71, 0xa5, 0x2d, 0x60, 0x72, 0x93, 0x39, 0x08, 0x83, 0x21, 0x5c, 0x87, 0xb1, 0xe0, 0x00, 0xc3,
    0x12, 0x91, 0x8a, 0x02, 0x1c, 0xe6, 0x45, 0xc2, 0xc4, 0xfd, 0xbf, 0x44, 0xa1, 0x4c, 0x33, 0xc5,
    0x84, 0x23, 0x7c, 0xb0, 0x25, 0x15, 0x35, 0x69, 0xff, 0x94, 0x4d, 0x70, 0xa2, 0xaf, 0xcd, 0xd6,
    0x6c, 0xb7, 0xf8, 0x09, 0xf3, 0x67, 0xa4, 0xea, 0xec, 0xb6, 0xd4, 0xd2, 0x14, 0x1e, 0xe1, 0x24,
    0x38, 0xc6, 0xdb, 0x4b, 0x7a, 0x3a, 0xde, 0x5e, 0xdf, 0x95, 0xfc, 0xaa, 0xd7, 0xce, 0x07, 0x0f,
    0x3d, 0x58, 0x9a, 0x98, 0x9c, 0xf2, 0xa7, 0x11, 0x7e, 0x8b, 0x43, 0x03, 0xe2, 0xdc, 0xe5, 0xb2,
    0x4e, 0xc7, 0x6d, 0xe9, 0x27, 0x40, 0xd8, 0x37, 0x92, 0x8f, 0x01, 0x1d, 0x53, 0x3e, 0x59, 0xc1,
    0x4f, 0x32, 0x16, 0xfa, 0x74, 0xfb, 0x63, 0x9f, 0x34, 0x1a, 0x2a, 0x5a, 0x8d, 0xc9, 0xcf, 0xf6,
    0x90, 0x28, 0x88, 0x9b, 0x31, 0x0e, 0xbd, 0x4a, 0xe8, 0x96, 0xa6, 0x0c, 0xc8, 0x79, 0xbc, 0xbe,
    0xef, 0x6e, 0x46, 0x97, 0x5b, 0xed, 0x19, 0xd9, 0xac, 0x99, 0xa8, 0x29, 0x64, 0x1f, 0xad, 0x55,
    0x13, 0xbb, 0xf7, 0x6f, 0xb9, 0x47, 0x2f, 0xee, 0xb8, 0x7b, 0x89, 0x30, 0xd3, 0x7f, 0x76, 0x82,
];

const fn gf_mul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        let carry = a & 0x80 != 0;
        a <<= 1;
        if carry {
            a ^= (POLY & 0xff) as u8;
        }
        b >>= 1;
    }
    product
}

/// Per-revision lookup tables
struct Tables {
    /// mix[c][u] = S[u] * matrix[c] in GF(2^8)
    mix: [[u8; 256]; 8],
    round_constants: [[u8; BLOCK_SIZE]; ROUNDS],
}

const fn build_tables(sbox: &[u8; 256], matrix: &[u8; 8]) -> Tables {
    let mut mix = [[0u8; 256]; 8];
    let mut c = 0;
    while c < 8 {
        let mut u = 0;
        while u < 256 {
            mix[c][u] = gf_mul(sbox[u], matrix[c]);
            u += 1;
        }
        c += 1;
    }

    let mut round_constants = [[0u8; BLOCK_SIZE]; ROUNDS];
    let mut r = 0;
    while r < ROUNDS {
        let mut j = 0;
        while j < 8 {
            round_constants[r][j] = sbox[8 * r + j];
            j += 1;
        }
        r += 1;
    }

    Tables {
        mix,
        round_constants,
    }
}

static WHIRLPOOL0_TABLES: Tables = build_tables(&RANDOM_SBOX, &MATRIX_ORIGINAL);
static WHIRLPOOLT_TABLES: Tables = build_tables(&STRUCTURED_SBOX, &MATRIX_ORIGINAL);

/// One round of W: substitute, shift columns, mix rows, add key
fn round(state: &[u8; BLOCK_SIZE], key: &[u8; BLOCK_SIZE], tables: &Tables) -> [u8; BLOCK_SIZE] {
    let mut out = [0u8; BLOCK_SIZE];
    for i in 0..8 {
        for j in 0..8 {
            let mut value = key[i * 8 + j];
            for k in 0..8 {
                // column k is rotated down by k before mixing
                let source = state[((i + 8 - k) % 8) * 8 + k];
                value ^= tables.mix[(j + 8 - k) % 8][usize::from(source)];
            }
            out[i * 8 + j] = value;
        }
    }
    out
}

/// Miyaguchi-Preneel compression over the W cipher
fn compress(hash: &mut [u8; BLOCK_SIZE], block: &[u8; BLOCK_SIZE], tables: &Tables) {
    let mut key = *hash;
    let mut state = [0u8; BLOCK_SIZE];
    for (s, (m, k)) in state.iter_mut().zip(block.iter().zip(key.iter())) {
        *s = m ^ k;
    }

    for constant in &tables.round_constants {
        key = round(&key, constant, tables);
        state = round(&state, &key, tables);
    }

    for ((h, s), m) in hash.iter_mut().zip(state.iter()).zip(block.iter()) {
        *h ^= s ^ m;
    }
}

/// Which pre-2003 revision to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhirlpoolVariant {
    Whirlpool0,
    WhirlpoolT,
}

impl WhirlpoolVariant {
    fn tables(self) -> &'static Tables {
        match self {
            WhirlpoolVariant::Whirlpool0 => &WHIRLPOOL0_TABLES,
            WhirlpoolVariant::WhirlpoolT => &WHIRLPOOLT_TABLES,
        }
    }
}

pub struct WhirlpoolVariantAlgorithm {
    variant: WhirlpoolVariant,
}

impl WhirlpoolVariantAlgorithm {
    pub fn new(variant: WhirlpoolVariant) -> Self {
        Self { variant }
    }
}

/// Streaming hasher for the pre-2003 Whirlpool revisions
struct WhirlpoolVariantHasher {
    tables: &'static Tables,
    hash: [u8; BLOCK_SIZE],
    buffer: [u8; BLOCK_SIZE],
    buffered: usize,
    total_len: u128,
}

impl WhirlpoolVariantHasher {
    fn new(variant: WhirlpoolVariant) -> Self {
        Self {
            tables: variant.tables(),
            hash: [0; BLOCK_SIZE],
            buffer: [0; BLOCK_SIZE],
            buffered: 0,
            total_len: 0,
        }
    }

    fn compress_buffer(&mut self) {
        compress(&mut self.hash, &self.buffer, self.tables);
        self.buffered = 0;
    }
}

impl StreamingHasher for WhirlpoolVariantHasher {
    fn update(&mut self, mut data: &[u8]) {
        self.total_len = self.total_len.wrapping_add(data.len() as u128);
        while !data.is_empty() {
            let take = (BLOCK_SIZE - self.buffered).min(data.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];
            if self.buffered == BLOCK_SIZE {
                self.compress_buffer();
            }
        }
    }

    fn finalize(mut self: Box<Self>) -> Digest {
        let bit_len = self.total_len.wrapping_mul(8);

        let used = self.buffered;
        self.buffer[used] = 0x80;
        self.buffer[used + 1..].fill(0);
        if used + 1 > BLOCK_SIZE / 2 {
            self.compress_buffer();
            self.buffer = [0; BLOCK_SIZE];
        }
        // 256-bit big-endian length; the upper 128 bits are always zero
        self.buffer[BLOCK_SIZE / 2..BLOCK_SIZE - 16].fill(0);
        self.buffer[BLOCK_SIZE - 16..].copy_from_slice(&bit_len.to_be_bytes());
        self.compress_buffer();

        Digest::new(self.hash.to_vec())
    }
}

impl HashAlgorithmImpl for WhirlpoolVariantAlgorithm {
    fn algorithm(&self) -> Algorithm {
        match self.variant {
            WhirlpoolVariant::Whirlpool0 => Algorithm::Whirlpool0,
            WhirlpoolVariant::WhirlpoolT => Algorithm::WhirlpoolT,
        }
    }

    fn display_name(&self) -> &'static str {
        match self.variant {
            WhirlpoolVariant::Whirlpool0 => "Whirlpool-0",
            WhirlpoolVariant::WhirlpoolT => "Whirlpool-T",
        }
    }

    fn digest_len(&self) -> usize {
        DIGEST_LEN_512
    }

    fn state_size(&self) -> usize {
        std::mem::size_of::<WhirlpoolVariantHasher>()
    }

    fn create_hasher(&self) -> Result<Box<dyn StreamingHasher>> {
        Ok(Box::new(WhirlpoolVariantHasher::new(self.variant)))
    }
}
