//! Exact-match color merging.

use crate::color::Rgb;
use crate::models::Raster;

/// Result of a color merge pass.
#[derive(Debug, Clone)]
pub struct MergeResult {
    pub raster: Raster,
    /// Pixels recolored by the pass
    pub changed_pixels: usize,
}

/// Recolor every pixel exactly matching `from` to `to`.
///
/// Matching is exact RGB equality - no tolerance - and transparent
/// pixels are skipped. Recolored pixels get full alpha. Merging is
/// idempotent: after one pass no `from` pixels remain (unless `from ==
/// to`), so a second pass changes nothing.
///
/// # Examples
///
/// ```
/// use weftwork::cleanup::merge_color;
/// use weftwork::color::Rgb;
/// use weftwork::models::Raster;
///
/// let mut raster = Raster::new(2, 1);
/// raster.put(0, 0, Rgb::new(255, 0, 0), 255);
/// raster.put(1, 0, Rgb::new(0, 0, 255), 255);
///
/// let result = merge_color(&raster, Rgb::new(255, 0, 0), Rgb::new(0, 0, 255));
/// assert_eq!(result.changed_pixels, 1);
/// assert_eq!(result.raster.rgb_at(0, 0), Rgb::new(0, 0, 255));
/// ```
pub fn merge_color(raster: &Raster, from: Rgb, to: Rgb) -> MergeResult {
    let mut out = raster.clone();
    let mut changed = 0usize;

    for y in 0..raster.height() {
        for x in 0..raster.width() {
            if !raster.is_opaque(x, y) {
                continue;
            }
            if raster.rgb_at(x, y) == from {
                out.put(x, y, to, 255);
                changed += 1;
            }
        }
    }

    MergeResult { raster: out, changed_pixels: changed }
}
