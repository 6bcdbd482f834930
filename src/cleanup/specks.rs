//! Speck removal via connected-component analysis.
//!
//! A speck is a small, isolated, single-color pixel cluster left behind
//! by quantization - visual noise that would become an unprintable dot
//! on a separation plate. Clusters below the size threshold are
//! repainted to the color that dominates their border.

use crate::color::Rgb;
use crate::grid::Grid;
use crate::models::Raster;
use crate::progress::{NullProgress, ProgressReporter};

/// Palette-index value for pixels that match no palette entry (or are
/// transparent). Unresolved cells never cluster and never vote.
const UNRESOLVED: i32 = -1;

/// Result of a speck-removal pass.
#[derive(Debug, Clone)]
pub struct SpeckRemoval {
    pub raster: Raster,
    /// Pixels actually repainted (clusters with no valid neighbor are
    /// left unchanged and don't count)
    pub removed_pixels: usize,
}

/// Remove sub-threshold color clusters from a palette-indexed raster.
///
/// See [`remove_specks_with_progress`] for the progress-reporting
/// variant.
pub fn remove_specks(raster: &Raster, palette: &[Rgb], min_cluster_size: usize) -> SpeckRemoval {
    remove_specks_with_progress(raster, palette, min_cluster_size, &NullProgress)
}

/// Remove sub-threshold color clusters, reporting coarse progress.
///
/// Pixels are expected to exactly match one of `palette` (the quantizer
/// guarantees this); pixels matching no entry are excluded from
/// clustering and from neighbor votes. Clusters are 4-connected regions
/// of equal palette index. Each cluster smaller than `min_cluster_size`
/// is repainted to the most frequent palette index on its border - ties
/// break toward the index seen first, an implementation-order choice
/// callers must not rely on. A cluster with no resolvable border (e.g.
/// an image smaller than the threshold) stays unchanged.
pub fn remove_specks_with_progress(
    raster: &Raster,
    palette: &[Rgb],
    min_cluster_size: usize,
    progress: &dyn ProgressReporter,
) -> SpeckRemoval {
    let width = raster.width();
    let height = raster.height();

    progress.report(0, "indexing palette");
    let index_map = build_index_map(raster, palette);

    let mut out = raster.clone();
    let mut visited = Grid::filled(width, height, false);
    let mut removed = 0usize;

    for y in 0..height {
        for x in 0..width {
            if *visited.get(x, y) || *index_map.get(x, y) == UNRESOLVED {
                continue;
            }

            let cluster = flood_fill(&index_map, &mut visited, x, y);
            if cluster.len() >= min_cluster_size {
                continue;
            }

            if let Some(winner) = dominant_border_index(&index_map, &cluster) {
                let color = palette[winner as usize];
                for &(cx, cy) in &cluster {
                    out.put(cx, cy, color, 255);
                }
                removed += cluster.len();
            }
        }
        if height > 1 {
            progress.report((y * 100 / (height - 1)) as u8, "removing specks");
        }
    }

    progress.report(100, "speck removal complete");
    SpeckRemoval { raster: out, removed_pixels: removed }
}

/// Map each pixel to its exact palette index, or `UNRESOLVED`.
fn build_index_map(raster: &Raster, palette: &[Rgb]) -> Grid<i32> {
    let mut map = Grid::filled(raster.width(), raster.height(), UNRESOLVED);
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            if !raster.is_opaque(x, y) {
                continue;
            }
            let color = raster.rgb_at(x, y);
            if let Some(idx) = palette.iter().position(|&p| p == color) {
                map.set(x, y, idx as i32);
            }
        }
    }
    map
}

/// Collect the 4-connected cluster of equal palette index containing
/// `(x, y)`, marking every member visited. Stack-based - production
/// rasters produce clusters far too large for recursion.
fn flood_fill(
    index_map: &Grid<i32>,
    visited: &mut Grid<bool>,
    x: usize,
    y: usize,
) -> Vec<(usize, usize)> {
    let target = *index_map.get(x, y);
    let mut cluster = Vec::new();
    let mut stack = vec![(x, y)];
    visited.set(x, y, true);

    while let Some((cx, cy)) = stack.pop() {
        cluster.push((cx, cy));
        for (nx, ny) in neighbors(index_map, cx, cy) {
            if !*visited.get(nx, ny) && *index_map.get(nx, ny) == target {
                visited.set(nx, ny, true);
                stack.push((nx, ny));
            }
        }
    }
    cluster
}

/// The most frequent palette index among a cluster's 4-connected border
/// neighbors, or `None` if every neighbor is unresolved or off-image.
/// First-seen order breaks ties.
fn dominant_border_index(index_map: &Grid<i32>, cluster: &[(usize, usize)]) -> Option<i32> {
    let own = *index_map.get(cluster[0].0, cluster[0].1);
    // Insertion-ordered tally so the tie-break stays first-seen
    let mut tally: Vec<(i32, usize)> = Vec::new();

    for &(cx, cy) in cluster {
        for (nx, ny) in neighbors(index_map, cx, cy) {
            let idx = *index_map.get(nx, ny);
            if idx == UNRESOLVED || idx == own {
                continue;
            }
            match tally.iter_mut().find(|(i, _)| *i == idx) {
                Some((_, count)) => *count += 1,
                None => tally.push((idx, 1)),
            }
        }
    }

    // max_by_key would take the last maximum; scan keeps the first
    let mut winner: Option<(i32, usize)> = None;
    for &(idx, count) in &tally {
        match winner {
            Some((_, best)) if count <= best => {}
            _ => winner = Some((idx, count)),
        }
    }
    winner.map(|(idx, _)| idx)
}

/// In-bounds 4-connected neighbors of `(x, y)`.
fn neighbors(grid: &Grid<i32>, x: usize, y: usize) -> Vec<(usize, usize)> {
    let mut result = Vec::with_capacity(4);
    if x > 0 {
        result.push((x - 1, y));
    }
    if x + 1 < grid.width() {
        result.push((x + 1, y));
    }
    if y > 0 {
        result.push((x, y - 1));
    }
    if y + 1 < grid.height() {
        result.push((x, y + 1));
    }
    result
}
