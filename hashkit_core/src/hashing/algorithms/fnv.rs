//! 512-bit Fowler–Noll–Vo hash algorithm implementations
//!
//! The state is a 512-bit integer held as eight little-endian `u64` limbs.
//! The prime is 2^344 + 0x157, so a multiplication is a shift plus a small
//! multiply-accumulate, all modulo 2^512.

use crate::Result;
use crate::hashing::traits::{HashAlgorithmImpl, StreamingHasher};
use crate::hashing::{Algorithm, DIGEST_LEN_512, Digest};

const LIMBS: usize = 8;

/// Low part of the FNV-512 prime (the high part is 2^344)
const PRIME_LOW: u64 = 0x157;

/// FNV-512 offset basis, least significant limb first
const OFFSET_BASIS: [u64; LIMBS] = [
    0xac982aac4afe9fd9,
    0x182036415f56e34b,
    0x2ea79bc942dbe7ce,
    0xe948f68a34c192f6,
    0x0000000000000d21,
    0xac87d059c9000000,
    0xdca1e50f309990ac,
    0xb86db0b1171f4416,
];

/// Which FNV flavour to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FnvVariant {
    /// Zero offset basis, multiply then xor
    Fnv0,
    /// Standard offset basis, multiply then xor
    Fnv1,
    /// Standard offset basis, xor then multiply
    Fnv1a,
}

pub struct FnvAlgorithm {
    variant: FnvVariant,
}

impl FnvAlgorithm {
    pub fn new(variant: FnvVariant) -> Self {
        Self { variant }
    }
}

/// FNV-512 streaming hasher
struct FnvStreamingHasher {
    state: [u64; LIMBS],
    xor_first: bool,
}

impl FnvStreamingHasher {
    fn new(variant: FnvVariant) -> Self {
        let state = match variant {
            FnvVariant::Fnv0 => [0; LIMBS],
            FnvVariant::Fnv1 | FnvVariant::Fnv1a => OFFSET_BASIS,
        };
        Self {
            state,
            xor_first: variant == FnvVariant::Fnv1a,
        }
    }

    /// state = state * (2^344 + 0x157) mod 2^512
    fn multiply_by_prime(&mut self) {
        let h = self.state;

        // h << 344 is a five limb shift followed by a 24 bit shift
        let mut shifted = [0u64; LIMBS];
        for i in 0..LIMBS - 5 {
            shifted[i + 5] |= h[i] << 24;
            if i + 6 < LIMBS {
                shifted[i + 6] |= h[i] >> 40;
            }
        }

        let mut carry: u128 = 0;
        for i in 0..LIMBS {
            let sum = u128::from(h[i]) * u128::from(PRIME_LOW) + u128::from(shifted[i]) + carry;
            self.state[i] = sum as u64;
            carry = sum >> 64;
        }
    }
}

impl StreamingHasher for FnvStreamingHasher {
    fn update(&mut self, data: &[u8]) {
        for &byte in data {
            if self.xor_first {
                self.state[0] ^= u64::from(byte);
                self.multiply_by_prime();
            } else {
                self.multiply_by_prime();
                self.state[0] ^= u64::from(byte);
            }
        }
    }

    fn finalize(self: Box<Self>) -> Digest {
        let bytes = self
            .state
            .iter()
            .rev()
            .flat_map(|limb| limb.to_be_bytes())
            .collect();
        Digest::new(bytes)
    }
}

impl HashAlgorithmImpl for FnvAlgorithm {
    fn algorithm(&self) -> Algorithm {
        match self.variant {
            FnvVariant::Fnv0 => Algorithm::Fnv0,
            FnvVariant::Fnv1 => Algorithm::Fnv1,
            FnvVariant::Fnv1a => Algorithm::Fnv1a,
        }
    }

    fn display_name(&self) -> &'static str {
        match self.variant {
            FnvVariant::Fnv0 => "FNV-0 (512-bit)",
            FnvVariant::Fnv1 => "FNV-1 (512-bit)",
            FnvVariant::Fnv1a => "FNV-1a (512-bit)",
        }
    }

    fn digest_len(&self) -> usize {
        DIGEST_LEN_512
    }

    fn state_size(&self) -> usize {
        std::mem::size_of::<FnvStreamingHasher>()
    }

    fn create_hasher(&self) -> Result<Box<dyn StreamingHasher>> {
        Ok(Box::new(FnvStreamingHasher::new(self.variant)))
    }
}
