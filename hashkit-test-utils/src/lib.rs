//! Test utilities for hashkit
//!
//! This crate provides deterministic input builders, chunking plans and a
//! recording match policy for testing the hash engine.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::{ChunkPlan, DataPattern, TestDataBuilder, digests_in_chunks};
pub use mocks::RecordingPolicy;
