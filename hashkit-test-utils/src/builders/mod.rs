//! Builders for test inputs

mod test_data;

pub use test_data::{ChunkPlan, DataPattern, TestDataBuilder, digests_in_chunks};
