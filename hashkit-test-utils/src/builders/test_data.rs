//! Test data builders for creating hashing scenarios

use hashkit_core::{DigestSet, EngineConfig, HashEngine, Result};

/// Shape of the bytes produced by [`TestDataBuilder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataPattern {
    /// All zero bytes
    Zeros,
    /// 0, 1, 2, ... wrapping at 256
    Sequential,
    /// One byte repeated
    Repeating(u8),
    /// Deterministic xorshift stream from a seed
    Pseudorandom(u64),
}

/// Builder for deterministic input data
pub struct TestDataBuilder {
    size: usize,
    pattern: DataPattern,
    prefix: Vec<u8>,
}

impl Default for TestDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDataBuilder {
    /// Create a new test data builder (1KB of sequential bytes)
    pub fn new() -> Self {
        Self {
            size: 1024,
            pattern: DataPattern::Sequential,
            prefix: Vec::new(),
        }
    }

    /// Set total size in bytes, prefix included
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the fill pattern
    pub fn with_pattern(mut self, pattern: DataPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Start the data with fixed bytes
    pub fn with_prefix(mut self, prefix: &[u8]) -> Self {
        self.prefix = prefix.to_vec();
        self
    }

    /// Build the data
    pub fn build(self) -> Vec<u8> {
        let mut data = self.prefix;
        data.truncate(self.size);
        let fill = self.size - data.len();

        match self.pattern {
            DataPattern::Zeros => data.resize(self.size, 0),
            DataPattern::Repeating(byte) => data.resize(self.size, byte),
            DataPattern::Sequential => data.extend((0..fill).map(|i| i as u8)),
            DataPattern::Pseudorandom(seed) => {
                // xorshift64 never leaves zero, so only zero is remapped
                let mut state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
                data.extend((0..fill).map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    (state >> 24) as u8
                }));
            }
        }
        data
    }
}

/// How to cut an input into `update` calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkPlan {
    /// The whole input in one call
    Whole,
    /// Fixed-size chunks, the last one possibly shorter
    Fixed(usize),
    /// Chunk sizes used in turn, cycling; a zero size yields an empty chunk
    Sizes(Vec<usize>),
}

impl ChunkPlan {
    /// Split `data` according to the plan
    ///
    /// The concatenation of the returned slices is always `data`.
    pub fn split<'a>(&self, data: &'a [u8]) -> Vec<&'a [u8]> {
        match self {
            ChunkPlan::Whole => vec![data],
            ChunkPlan::Fixed(size) => data.chunks((*size).max(1)).collect(),
            ChunkPlan::Sizes(sizes) if sizes.iter().all(|&s| s == 0) => {
                let mut chunks: Vec<&[u8]> = sizes.iter().map(|_| &data[..0]).collect();
                chunks.push(data);
                chunks
            }
            ChunkPlan::Sizes(sizes) => {
                let mut chunks = Vec::new();
                let mut rest = data;
                for &size in sizes.iter().cycle() {
                    if rest.is_empty() {
                        break;
                    }
                    let (head, tail) = rest.split_at(size.min(rest.len()));
                    chunks.push(head);
                    rest = tail;
                }
                chunks
            }
        }
    }
}

/// Feed `data` into a fresh engine following `plan` and return every digest
pub fn digests_in_chunks(config: &EngineConfig, data: &[u8], plan: &ChunkPlan) -> Result<DigestSet> {
    let mut engine = HashEngine::with_config(config)?;
    for chunk in plan.split(data) {
        engine.update(chunk)?;
    }
    engine.finalize_digests()
}
