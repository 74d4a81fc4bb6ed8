//! Seeded stream fragmentation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sockframe_proto::FrameHeader;

/// Splits byte streams at reproducible random offsets.
#[derive(Debug, Clone)]
pub struct Fragmenter {
    rng: ChaCha8Rng,
}

impl Fragmenter {
    /// Create a fragmenter from a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Split `bytes` into consecutive chunks of 1..=`max_chunk` bytes.
    pub fn split(&mut self, bytes: &[u8], max_chunk: usize) -> Vec<Vec<u8>> {
        let max_chunk = max_chunk.max(1);
        let mut chunks = Vec::new();
        let mut rest = bytes;
        while !rest.is_empty() {
            let len = self.rng.gen_range(1..=max_chunk.min(rest.len()));
            let (chunk, tail) = rest.split_at(len);
            chunks.push(chunk.to_vec());
            rest = tail;
        }
        chunks
    }

    /// Random noise that can never be mistaken for the start of a frame.
    pub fn garbage(&mut self, len: usize) -> Vec<u8> {
        (0..len)
            .map(|_| loop {
                let byte: u8 = self.rng.r#gen();
                if byte != FrameHeader::MAGIC_BYTES[0] {
                    break byte;
                }
            })
            .collect()
    }
}
