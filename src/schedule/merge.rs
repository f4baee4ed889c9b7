use std::collections::HashMap;

use crate::{ColNum, MergedRange, RowNum};

/// A merged region, or a single cell when nothing is merged. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub top_row: RowNum,
    pub top_col: ColNum,
    pub bottom_row: RowNum,
    pub bottom_col: ColNum,
}

impl Block {
    pub fn single(row: RowNum, col: ColNum) -> Self {
        Block { top_row: row, top_col: col, bottom_row: row, bottom_col: col }
    }

    /// number of time slots the block covers
    pub fn height(&self) -> RowNum {
        self.bottom_row - self.top_row + 1
    }

    pub fn is_top_left(&self, row: RowNum, col: ColNum) -> bool {
        self.top_row == row && self.top_col == col
    }
}

impl From<MergedRange> for Block {
    fn from(((top_row, top_col), (bottom_row, bottom_col)): MergedRange) -> Self {
        Block {
            top_row: top_row.min(bottom_row),
            top_col: top_col.min(bottom_col),
            bottom_row: top_row.max(bottom_row),
            bottom_col: top_col.max(bottom_col),
        }
    }
}

/// Owning block for every merged coordinate, built once per sheet.
#[derive(Debug, Default)]
pub struct MergedRangeIndex {
    blocks: HashMap<(RowNum, ColNum), Block>,
}

impl MergedRangeIndex {
    pub fn build(ranges: &[MergedRange]) -> Self {
        let mut blocks = HashMap::new();
        for range in ranges {
            let block = Block::from(*range);
            for row in block.top_row..=block.bottom_row {
                for col in block.top_col..=block.bottom_col {
                    blocks.insert((row, col), block);
                }
            }
        }
        MergedRangeIndex { blocks }
    }

    /// block covering a coordinate, a 1x1 block when unmerged
    pub fn block_at(&self, row: RowNum, col: ColNum) -> Block {
        self.blocks.get(&(row, col)).copied().unwrap_or(Block::single(row, col))
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
