//! Jacquard structure and assignment types.

use serde::{Deserialize, Serialize};

/// A weave structure used as a jacquard building block.
///
/// Same shape as a draft's threading/treadling/tie-up triple, scoped to
/// its own harness/treadle counts. Unlike a draft it carries no repeat or
/// symmetry: the structure's own period stands in for repeat when it is
/// resolved per cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaveStructure {
    /// Identifier shown in coverage reports
    pub id: String,
    pub harness_count: usize,
    pub treadle_count: usize,
    /// Warp end -> harness index, one period long
    pub threading: Vec<u8>,
    /// Weft pick -> treadle index, one period long
    pub treadling: Vec<u8>,
    /// Harness x treadle lift matrix, `tie_up[harness * treadle_count + treadle]`
    pub tie_up: Vec<u8>,
}

impl WeaveStructure {
    /// Lift bit for `(harness, treadle)`.
    #[inline]
    pub fn lift(&self, harness: usize, treadle: usize) -> u8 {
        self.tie_up[harness * self.treadle_count + treadle]
    }
}

/// A per-cell assignment of structure indices over the fabric grid.
///
/// Each cell holds an index into the accompanying structure list. An
/// index with no matching structure resolves to the warp-up fallback
/// during derivation rather than being an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JacquardAssignment {
    pub width: usize,
    pub height: usize,
    /// Row-major structure indices, `cells[y * width + x]`
    pub cells: Vec<u16>,
}

impl JacquardAssignment {
    /// Create an assignment with every cell pointing at structure 0.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![0; width * height] }
    }

    /// Structure index at `(x, y)`.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> u16 {
        self.cells[y * self.width + x]
    }

    /// Assign structure `index` at `(x, y)`.
    pub fn set_cell(&mut self, x: usize, y: usize, index: u16) {
        self.cells[y * self.width + x] = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_weave() -> WeaveStructure {
        WeaveStructure {
            id: "plain".to_string(),
            harness_count: 2,
            treadle_count: 2,
            threading: vec![0, 1],
            treadling: vec![0, 1],
            tie_up: vec![1, 0, 0, 1],
        }
    }

    #[test]
    fn test_structure_lift_layout() {
        let plain = plain_weave();
        assert_eq!(plain.lift(0, 0), 1);
        assert_eq!(plain.lift(0, 1), 0);
        assert_eq!(plain.lift(1, 1), 1);
    }

    #[test]
    fn test_assignment_cells() {
        let mut grid = JacquardAssignment::new(3, 2);
        grid.set_cell(2, 1, 5);
        assert_eq!(grid.cell(2, 1), 5);
        assert_eq!(grid.cell(0, 0), 0);
        assert_eq!(grid.cells.len(), 6);
    }

    #[test]
    fn test_structure_json_round_trip() {
        let plain = plain_weave();
        let json = serde_json::to_string(&plain).unwrap();
        let back: WeaveStructure = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plain);
    }
}
