//! Per-cell drawdown derivation for jacquard assignments.
//!
//! Each fabric cell selects one of several independent weave structures;
//! every structure resolves through the same harness/treadle/tie-up lift
//! rule as the dobby engine, with the structure's own period standing in
//! for repeat. There is no mirror support at this layer.

use std::collections::HashMap;

use crate::grid::Grid;
use crate::models::{JacquardAssignment, WeaveStructure};

/// Lift value emitted for cells whose structure index resolves to no
/// known structure. Warp-up keeps a missing assignment visible as a
/// solid float instead of a hole.
const MISSING_STRUCTURE_LIFT: u8 = 1;

/// Derive the drawdown grid for a jacquard assignment.
///
/// Output size is `assignment.width` x `assignment.height`. Cells whose
/// index falls outside `structures` emit the warp-up fallback.
///
/// # Examples
///
/// ```
/// use weftwork::jacquard::derive_jacquard_drawdown;
/// use weftwork::models::{JacquardAssignment, WeaveStructure};
///
/// let plain = WeaveStructure {
///     id: "plain".to_string(),
///     harness_count: 2,
///     treadle_count: 2,
///     threading: vec![0, 1],
///     treadling: vec![0, 1],
///     tie_up: vec![1, 0, 0, 1],
/// };
/// let grid = JacquardAssignment::new(4, 4);
/// let drawdown = derive_jacquard_drawdown(&grid, &[plain]);
/// assert_eq!(*drawdown.get(0, 0), 1);
/// assert_eq!(*drawdown.get(1, 0), 0);
/// ```
pub fn derive_jacquard_drawdown(
    assignment: &JacquardAssignment,
    structures: &[WeaveStructure],
) -> Grid<u8> {
    let mut drawdown = Grid::new(assignment.width, assignment.height);

    for y in 0..assignment.height {
        for x in 0..assignment.width {
            let idx = assignment.cell(x, y) as usize;
            let bit = match structures.get(idx) {
                Some(structure) => resolve_lift(structure, x, y),
                None => MISSING_STRUCTURE_LIFT,
            };
            drawdown.set(x, y, bit);
        }
    }
    drawdown
}

/// Resolve the lift bit of `(x, y)` through a structure's own period.
#[inline]
fn resolve_lift(structure: &WeaveStructure, x: usize, y: usize) -> u8 {
    let warp_idx = x % structure.threading.len();
    let weft_idx = y % structure.treadling.len();
    let harness = structure.threading[warp_idx] as usize;
    let treadle = structure.treadling[weft_idx] as usize;
    structure.lift(harness, treadle)
}

/// Per-structure cell usage over an assignment grid.
///
/// Every known structure id appears in the result, zero-count entries
/// included, so coverage percentage displays stay stable as structures
/// come in and out of use. Cells referencing an unknown index are not
/// attributed to any structure.
pub fn structure_usage(
    assignment: &JacquardAssignment,
    structures: &[WeaveStructure],
) -> HashMap<String, usize> {
    let mut usage: HashMap<String, usize> =
        structures.iter().map(|s| (s.id.clone(), 0)).collect();

    for &cell in &assignment.cells {
        if let Some(structure) = structures.get(cell as usize) {
            if let Some(count) = usage.get_mut(&structure.id) {
                *count += 1;
            }
        }
    }
    usage
}
