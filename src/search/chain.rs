//! Columnar store of packed positions grouped into BFS levels.
//!
//! Entries are appended in blocks of 4096 so that a frontier running
//! into millions of entries never forces a single contiguous
//! reallocation. Entries are immutable once added.

use crate::chess::moves::Move;
use crate::chess::position::PackedPosition;

const BLOCK_BITS: usize = 12;
const BLOCK_LENGTH: usize = 1 << BLOCK_BITS;
const BLOCK_MASK: usize = BLOCK_LENGTH - 1;

/// One stored frontier entry: the packed position, the move that led
/// here (absent only for a level-0 seed), and the index of the parent
/// entry the move was applied to.
pub struct ChainEntry {
    #[allow(missing_docs)]
    pub position: PackedPosition,
    #[allow(missing_docs)]
    pub incoming: Option<Move>,
    #[allow(missing_docs)]
    pub parent: usize,
}

/// A contiguous run of entries forming one BFS level.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Level {
    #[allow(missing_docs)]
    pub start: usize,
    #[allow(missing_docs)]
    pub length: usize,
}

/// Append-only block-chunked storage partitioned into levels.
pub struct PositionChain {
    blocks: Vec<Vec<ChainEntry>>,
    levels: Vec<Level>,
}

impl Default for PositionChain {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionChain {
    #[must_use]
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            levels: vec![Level {
                start: 0,
                length: 0,
            }],
        }
    }

    /// Appends an entry to the current level.
    pub fn add(&mut self, position: PackedPosition, incoming: Option<Move>, parent: usize) {
        if self
            .blocks
            .last()
            .map_or(true, |block| block.len() == BLOCK_LENGTH)
        {
            let mut block = Vec::new();
            block.reserve_exact(BLOCK_LENGTH);
            self.blocks.push(block);
        }
        if let Some(block) = self.blocks.last_mut() {
            block.push(ChainEntry {
                position,
                incoming,
                parent,
            });
        }
        if let Some(level) = self.levels.last_mut() {
            level.length += 1;
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> &ChainEntry {
        &self.blocks[index >> BLOCK_BITS][index & BLOCK_MASK]
    }

    /// Opens a new level starting where the previous one ended.
    pub fn start_next_level(&mut self) {
        let last = self.last_level();
        self.levels.push(Level {
            start: last.start + last.length,
            length: 0,
        });
    }

    #[must_use]
    pub fn last_level(&self) -> Level {
        self.levels[self.levels.len() - 1]
    }

    #[must_use]
    pub fn second_last_level(&self) -> Level {
        self.levels[self.levels.len() - 2]
    }

    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::position::Position;

    #[test]
    fn levels_partition_the_entries() {
        let packed = Position::starting().pack();
        let mut chain = PositionChain::new();
        chain.add(packed, None, 0);
        assert_eq!(chain.last_level(), Level { start: 0, length: 1 });
        chain.start_next_level();
        for parent in [0, 0, 0] {
            chain.add(packed, None, parent);
        }
        assert_eq!(chain.level_count(), 2);
        assert_eq!(chain.second_last_level(), Level { start: 0, length: 1 });
        assert_eq!(chain.last_level(), Level { start: 1, length: 3 });
        assert_eq!(chain.get(3).parent, 0);
    }

    #[test]
    fn grows_past_a_block_boundary() {
        let packed = Position::starting().pack();
        let mut chain = PositionChain::new();
        for index in 0..(BLOCK_LENGTH + 10) {
            chain.add(packed, None, index);
        }
        assert_eq!(chain.last_level().length, BLOCK_LENGTH + 10);
        assert_eq!(chain.get(BLOCK_LENGTH + 9).parent, BLOCK_LENGTH + 9);
        assert_eq!(chain.get(0).parent, 0);
    }
}
