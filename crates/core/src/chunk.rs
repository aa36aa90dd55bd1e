//! Table chunk planning
//!
//! Splits a table write into consecutive transactions no larger than the
//! per-transfer ceiling. Each chunk carries its own address so that it can be
//! sent behind a correctly sized control frame.

/// One transaction of a chunked table write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Register address of the first word in this chunk
    pub address: u32,
    /// Offset of the first word inside the table
    pub offset: usize,
    /// Number of words in this chunk
    pub words: usize,
}

impl Chunk {
    /// Slice of `table` covered by this chunk
    pub fn of<'a>(&self, table: &'a [u32]) -> &'a [u32] {
        &table[self.offset..self.offset + self.words]
    }
}

/// Iterator over the chunks of a table write
///
/// # Example
///
/// ```
/// use sja1105_core::chunk::ChunkPlan;
///
/// let plan = ChunkPlan::new(0x20000, 150, 64);
/// assert_eq!(plan.count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    base: u32,
    total: usize,
    max_words: usize,
    offset: usize,
}

impl ChunkPlan {
    /// Plan a write of `total` words starting at `base`
    ///
    /// A `max_words` of zero is treated as one word per chunk.
    pub fn new(base: u32, total: usize, max_words: usize) -> Self {
        Self {
            base,
            total,
            max_words: max_words.max(1),
            offset: 0,
        }
    }

    /// Number of transactions the whole table needs
    pub fn transactions(&self) -> usize {
        self.total.div_ceil(self.max_words)
    }
}

impl Iterator for ChunkPlan {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.offset >= self.total {
            return None;
        }
        let words = (self.total - self.offset).min(self.max_words);
        let chunk = Chunk {
            address: self.base.wrapping_add(self.offset as u32),
            offset: self.offset,
            words,
        };
        self.offset += words;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.total - self.offset).div_ceil(self.max_words);
        (left, Some(left))
    }
}

impl ExactSizeIterator for ChunkPlan {}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::vec::Vec;

    #[test]
    fn test_chunks_cover_table_exactly() {
        for &(n, c) in &[(1usize, 64usize), (64, 64), (65, 64), (150, 64), (1000, 7), (5, 1)] {
            let plan = ChunkPlan::new(0x1000, n, c);
            assert_eq!(plan.transactions(), n.div_ceil(c));

            let chunks: Vec<Chunk> = plan.collect();
            assert_eq!(chunks.len(), n.div_ceil(c));

            let mut expected_addr = 0x1000u32;
            let mut sum = 0;
            for chunk in &chunks {
                assert_eq!(chunk.address, expected_addr);
                assert_eq!(chunk.offset, sum);
                assert!(chunk.words <= c && chunk.words > 0);
                expected_addr += chunk.words as u32;
                sum += chunk.words;
            }
            assert_eq!(sum, n);
        }
    }

    #[test]
    fn test_empty_table_yields_nothing() {
        assert_eq!(ChunkPlan::new(0, 0, 64).count(), 0);
    }

    #[test]
    fn test_zero_ceiling_is_one_word() {
        assert_eq!(ChunkPlan::new(0, 3, 0).count(), 3);
    }

    #[test]
    fn test_chunk_slices_table() {
        let table: Vec<u32> = (0..10).collect();
        let chunks: Vec<Chunk> = ChunkPlan::new(0, table.len(), 4).collect();
        assert_eq!(chunks[2].of(&table), &[8, 9]);
    }

    #[test]
    fn test_size_hint_tracks_progress() {
        let mut plan = ChunkPlan::new(0, 10, 4);
        assert_eq!(plan.len(), 3);
        plan.next();
        assert_eq!(plan.len(), 2);
    }
}
