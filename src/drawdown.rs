//! Drawdown derivation for dobby weave drafts.
//!
//! Converts a threading/treadling/tie-up draft into the binary lift grid
//! the fabric simulation renders: each cell is 1 where the warp thread
//! shows (harness lifted) and 0 where the weft shows.
//!
//! Derivation is a pure recomputation on every call - no caching lives
//! here; callers own memoization. Out-of-range threading/treadling
//! entries are a violated call contract and panic via slice indexing;
//! run [`crate::validate::validate_draft`] first to reject such drafts.

use crate::grid::Grid;
use crate::models::Draft;

/// Derive the drawdown grid for a draft.
///
/// Output size is `warp_count * repeat.warp` x `weft_count * repeat.weft`
/// (repeat counts below 1 are clamped to 1). Each output cell `(x, y)`
/// resolves to a base cell inside the draft tile; with mirror symmetry
/// enabled, odd repeat tiles read the tile reflected.
///
/// # Examples
///
/// ```
/// use weftwork::drawdown::derive_drawdown;
/// use weftwork::models::Draft;
/// use weftwork::patterns;
///
/// let mut draft = Draft::new(4, 4, 4, 4);
/// patterns::twill_2_2_tie_up(&mut draft);
/// let drawdown = derive_drawdown(&draft);
/// assert_eq!(*drawdown.get(0, 0), 1); // (0+0) % 4 = 0 < 2
/// assert_eq!(*drawdown.get(2, 0), 0); // (2+0) % 4 = 2
/// ```
pub fn derive_drawdown(draft: &Draft) -> Grid<u8> {
    let repeat = draft.repeat.normalized();
    let out_w = draft.warp_count * repeat.warp as usize;
    let out_h = draft.weft_count * repeat.weft as usize;

    let mut drawdown = Grid::new(out_w, out_h);
    for y in 0..out_h {
        let base_y = base_index(
            y,
            draft.weft_count,
            draft.symmetry.weft_mirror,
        );
        let treadle = draft.treadling[base_y] as usize;

        for x in 0..out_w {
            let base_x = base_index(
                x,
                draft.warp_count,
                draft.symmetry.warp_mirror,
            );
            let harness = draft.threading[base_x] as usize;
            drawdown.set(x, y, draft.lift(harness, treadle));
        }
    }
    drawdown
}

/// Resolve an output coordinate to its index inside the draft tile.
///
/// Odd repeat tiles read the tile reflected when mirroring is enabled.
#[inline]
fn base_index(coord: usize, period: usize, mirror: bool) -> usize {
    let base = coord % period;
    if mirror && (coord / period) % 2 == 1 {
        period - 1 - base
    } else {
        base
    }
}
