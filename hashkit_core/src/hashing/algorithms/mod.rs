//! Hash algorithm implementations

use super::registry::AlgorithmRegistry;
use super::Algorithm;

mod blake512;
mod cubehash;
mod fnv;
mod lsh;
mod md6;
mod rust_crypto;
mod whirlpool_variants;

use rust_crypto::DigestAlgorithm;

/// Register all built-in algorithms with the registry
pub(crate) fn register_all(registry: &mut AlgorithmRegistry) {
    registry.register(DigestAlgorithm::<sha2::Sha512>::new(Algorithm::Sha512, "SHA-512"));
    registry.register(DigestAlgorithm::<blake2::Blake2b512>::new(
        Algorithm::Blake2b,
        "BLAKE2b-512",
    ));
    registry.register(DigestAlgorithm::<streebog::Streebog512>::new(
        Algorithm::Streebog,
        "Streebog-512",
    ));
    registry.register(DigestAlgorithm::<sha3::Sha3_512>::new(Algorithm::Sha3, "SHA3-512"));
    registry.register(fnv::FnvAlgorithm::new(fnv::FnvVariant::Fnv0));
    registry.register(fnv::FnvAlgorithm::new(fnv::FnvVariant::Fnv1));
    registry.register(fnv::FnvAlgorithm::new(fnv::FnvVariant::Fnv1a));
    registry.register(DigestAlgorithm::<groestl::Groestl512>::new(
        Algorithm::Grostl,
        "Grøstl-512",
    ));
    registry.register(md6::Md6Algorithm);
    registry.register(DigestAlgorithm::<jh::Jh512>::new(Algorithm::Jh, "JH-512"));
    registry.register(blake512::Blake512Algorithm);
    registry.register(lsh::LshAlgorithm);
    registry.register(DigestAlgorithm::<skein::Skein512<digest::consts::U64>>::new(
        Algorithm::Skein,
        "Skein-512-512",
    ));
    registry.register(DigestAlgorithm::<sha3::Keccak512>::new(
        Algorithm::Keccak3,
        "Keccak-512",
    ));
    registry.register(cubehash::CubeHashAlgorithm);
    registry.register(DigestAlgorithm::<whirlpool::Whirlpool>::new(
        Algorithm::Whirlpool,
        "Whirlpool",
    ));
    registry.register(whirlpool_variants::WhirlpoolVariantAlgorithm::new(
        whirlpool_variants::WhirlpoolVariant::Whirlpool0,
    ));
    registry.register(whirlpool_variants::WhirlpoolVariantAlgorithm::new(
        whirlpool_variants::WhirlpoolVariant::WhirlpoolT,
    ));
}
