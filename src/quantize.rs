//! Color quantization using k-means clustering.
//!
//! Reduces a raster to a bounded palette for screen-print separations:
//! pixels are sampled on a stride, clustered with Lloyd's algorithm in
//! RGB space, and the full raster is then rewritten so every opaque
//! pixel exactly equals one of the reported palette colors. Downstream
//! cleanup stages rely on that exactness.

use rayon::prelude::*;

use crate::color::{Rgb, ALPHA_IGNORE};
use crate::models::{Palette, PaletteEntry, Raster};
use crate::progress::{NullProgress, ProgressReporter};
use thiserror::Error;

/// Smallest palette size a caller can request
pub const MIN_COLORS: usize = 2;
/// Largest palette size a caller can request
pub const MAX_COLORS: usize = 24;

/// A centroid that moves by less than this squared distance between
/// iterations is considered stable. Intentionally coarse - palette
/// colors are bytes, sub-pixel drift never changes the result.
const MOVED_THRESHOLD_SQ: f64 = 5.0;

/// Error type for invalid quantization call contracts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantizeError {
    /// max_iterations was zero
    #[error("max_iterations must be at least 1")]
    InvalidIterations,
    /// sample_stride was zero
    #[error("sample_stride must be at least 1")]
    InvalidStride,
}

/// Tuning knobs for a quantization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizeOptions {
    /// Requested palette size, clamped to `[MIN_COLORS, MAX_COLORS]`
    pub colors: usize,
    /// Upper bound on Lloyd iterations (convergence usually stops earlier)
    pub max_iterations: usize,
    /// Sample every n-th pixel when building the clustering sample set
    pub sample_stride: usize,
    /// Seed for centroid initialization; same seed + input = same palette
    pub seed: u64,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self { colors: 8, max_iterations: 10, sample_stride: 4, seed: 0 }
    }
}

/// Result of a quantization run.
#[derive(Debug, Clone)]
pub struct Quantization {
    /// Palette in descending coverage order, zero-coverage entries dropped
    pub palette: Palette,
    /// The input raster rewritten onto the palette
    pub raster: Raster,
}

/// Quantize a raster to a bounded palette.
///
/// See [`quantize_with_progress`] for the progress-reporting variant.
pub fn quantize(raster: &Raster, options: &QuantizeOptions) -> Result<Quantization, QuantizeError> {
    quantize_with_progress(raster, options, &NullProgress)
}

/// Quantize a raster to a bounded palette, reporting coarse progress.
///
/// Transparent pixels (alpha below the ignore threshold) are skipped
/// during sampling and preserved untouched in the output; every other
/// pixel is rewritten to its nearest palette color at full alpha.
///
/// A fully transparent raster short-circuits to a single black palette
/// entry covering the whole image.
///
/// # Errors
///
/// Rejects a zero `max_iterations` or `sample_stride`; these are caller
/// bugs, unlike the documented degenerate inputs which all have defined
/// fallback behavior.
pub fn quantize_with_progress(
    raster: &Raster,
    options: &QuantizeOptions,
    progress: &dyn ProgressReporter,
) -> Result<Quantization, QuantizeError> {
    if options.max_iterations == 0 {
        return Err(QuantizeError::InvalidIterations);
    }
    if options.sample_stride == 0 {
        return Err(QuantizeError::InvalidStride);
    }

    progress.report(0, "sampling pixels");
    let samples = sample_pixels(raster, options.sample_stride);

    if samples.is_empty() {
        // Fully transparent input: degenerate single-entry palette
        progress.report(100, "quantization complete");
        return Ok(Quantization {
            palette: Palette {
                entries: vec![PaletteEntry {
                    color: Rgb::new(0, 0, 0),
                    count: raster.pixel_count(),
                }],
            },
            raster: raster.clone(),
        });
    }

    let k = options.colors.clamp(MIN_COLORS, MAX_COLORS);
    let mut centroids = init_centroids(&samples, k, options.seed);

    progress.report(10, "clustering");
    for iteration in 0..options.max_iterations {
        let moved = lloyd_step(&samples, &mut centroids);
        let percent = 10 + (70 * (iteration + 1) / options.max_iterations) as u8;
        progress.report(percent, "clustering");
        if !moved {
            break;
        }
    }

    progress.report(85, "remapping image");
    let palette_colors: Vec<Rgb> = centroids.iter().map(|c| c.to_rgb()).collect();
    let (out, counts) = remap(raster, &palette_colors);

    // Report in descending coverage order; centroids that won no pixels
    // disappear from the palette even though they existed during
    // clustering.
    let mut entries: Vec<PaletteEntry> = palette_colors
        .iter()
        .zip(&counts)
        .filter(|(_, &count)| count > 0)
        .map(|(&color, &count)| PaletteEntry { color, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    progress.report(100, "quantization complete");
    Ok(Quantization { palette: Palette { entries }, raster: out })
}

/// A cluster centroid in continuous RGB space.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Centroid {
    r: f64,
    g: f64,
    b: f64,
}

impl Centroid {
    fn from_rgb(color: Rgb) -> Self {
        Self { r: color.r as f64, g: color.g as f64, b: color.b as f64 }
    }

    fn to_rgb(self) -> Rgb {
        Rgb::new(
            self.r.round().clamp(0.0, 255.0) as u8,
            self.g.round().clamp(0.0, 255.0) as u8,
            self.b.round().clamp(0.0, 255.0) as u8,
        )
    }

    fn distance_sq(self, color: Rgb) -> f64 {
        let dr = self.r - color.r as f64;
        let dg = self.g - color.g as f64;
        let db = self.b - color.b as f64;
        dr * dr + dg * dg + db * db
    }

    fn moved_from(self, other: Centroid) -> bool {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        dr * dr + dg * dg + db * db > MOVED_THRESHOLD_SQ
    }
}

/// Collect every `stride`-th pixel, skipping transparent ones.
fn sample_pixels(raster: &Raster, stride: usize) -> Vec<Rgb> {
    let bytes = raster.as_bytes();
    let mut samples = Vec::new();
    let mut i = 0;
    while i < raster.pixel_count() {
        let o = i * 4;
        if bytes[o + 3] >= ALPHA_IGNORE {
            samples.push(Rgb::new(bytes[o], bytes[o + 1], bytes[o + 2]));
        }
        i += stride;
    }
    samples
}

/// Pick `k` initial centroids from random distinct sample colors.
///
/// When the sample set holds fewer distinct colors than `k`, the
/// remaining centroids fall back to the first sample; the zero-coverage
/// filter removes the resulting duplicates from the reported palette.
fn init_centroids(samples: &[Rgb], k: usize, seed: u64) -> Vec<Centroid> {
    let mut state = seed;
    let mut chosen: Vec<Rgb> = Vec::with_capacity(k);

    // Bounded random draws for distinctness, then give up per slot
    for _ in 0..k {
        let mut picked = None;
        for _ in 0..samples.len().min(64) {
            let candidate = samples[next_random(&mut state) as usize % samples.len()];
            if !chosen.contains(&candidate) {
                picked = Some(candidate);
                break;
            }
        }
        chosen.push(picked.unwrap_or(samples[0]));
    }

    chosen.into_iter().map(Centroid::from_rgb).collect()
}

/// One Lloyd iteration: assign samples to nearest centroid, recompute
/// means. Returns whether any centroid moved past the stability
/// tolerance.
fn lloyd_step(samples: &[Rgb], centroids: &mut [Centroid]) -> bool {
    let mut sums = vec![(0f64, 0f64, 0f64, 0usize); centroids.len()];

    for &sample in samples {
        let idx = nearest_centroid(sample, centroids);
        let entry = &mut sums[idx];
        entry.0 += sample.r as f64;
        entry.1 += sample.g as f64;
        entry.2 += sample.b as f64;
        entry.3 += 1;
    }

    let mut moved = false;
    for (centroid, (r, g, b, n)) in centroids.iter_mut().zip(sums) {
        if n == 0 {
            // Empty cluster keeps its position
            continue;
        }
        let next = Centroid { r: r / n as f64, g: g / n as f64, b: b / n as f64 };
        if next.moved_from(*centroid) {
            moved = true;
        }
        *centroid = next;
    }
    moved
}

/// Index of the centroid nearest to `color` (first wins on ties).
fn nearest_centroid(color: Rgb, centroids: &[Centroid]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist = centroid.distance_sq(color);
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Index of the palette color nearest to `color` (first wins on ties).
fn nearest_color(color: Rgb, palette: &[Rgb]) -> usize {
    let mut best = 0;
    let mut best_dist = u32::MAX;
    for (i, &candidate) in palette.iter().enumerate() {
        let dist = color.distance_sq(candidate);
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Rewrite every opaque pixel to its nearest palette color at full
/// alpha, preserving transparent pixels, and tally per-color coverage.
///
/// Rows are independent, so the rewrite runs data-parallel over row
/// chunks; per-row tallies are reduced at the end, keeping the result
/// identical to a sequential pass.
fn remap(raster: &Raster, palette: &[Rgb]) -> (Raster, Vec<usize>) {
    let width = raster.width();
    let mut out = Raster::new(raster.width(), raster.height());
    let src = raster.as_bytes();

    let counts = out
        .as_bytes_mut()
        .par_chunks_mut(width * 4)
        .enumerate()
        .map(|(y, row)| {
            let mut local = vec![0usize; palette.len()];
            let row_offset = y * width * 4;
            for x in 0..width {
                let o = x * 4;
                let so = row_offset + o;
                if src[so + 3] < ALPHA_IGNORE {
                    row[o..o + 4].copy_from_slice(&src[so..so + 4]);
                    continue;
                }
                let color = Rgb::new(src[so], src[so + 1], src[so + 2]);
                let idx = nearest_color(color, palette);
                local[idx] += 1;
                let chosen = palette[idx];
                row[o] = chosen.r;
                row[o + 1] = chosen.g;
                row[o + 2] = chosen.b;
                row[o + 3] = 255;
            }
            local
        })
        .reduce(
            || vec![0usize; palette.len()],
            |mut a, b| {
                for (total, part) in a.iter_mut().zip(b) {
                    *total += part;
                }
                a
            },
        );

    (out, counts)
}

/// Deterministic pseudo-random step shared with pattern jittering
/// elsewhere in the studio; quality doesn't matter here, stability under
/// a pinned seed does.
fn next_random(state: &mut u64) -> u32 {
    *state = state.wrapping_mul(1103515245).wrapping_add(12345);
    (*state >> 16) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CollectingProgress;

    /// Build a raster from uniform color blocks: each entry paints
    /// `count` pixels of `color` in sequence, row-major, full alpha.
    fn block_raster(width: usize, height: usize, blocks: &[(Rgb, usize)]) -> Raster {
        let mut raster = Raster::new(width, height);
        let mut i = 0;
        for &(color, count) in blocks {
            for _ in 0..count {
                raster.put(i % width, i / width, color, 255);
                i += 1;
            }
        }
        raster
    }

    #[test]
    fn test_two_color_image_recovers_both() {
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        let raster = block_raster(10, 10, &[(red, 75), (blue, 25)]);

        let options = QuantizeOptions { colors: 2, sample_stride: 1, ..Default::default() };
        let result = quantize(&raster, &options).unwrap();

        assert_eq!(result.palette.len(), 2);
        // Descending coverage order
        assert_eq!(result.palette.entries[0].color, red);
        assert_eq!(result.palette.entries[0].count, 75);
        assert_eq!(result.palette.entries[1].color, blue);
        assert_eq!(result.palette.entries[1].count, 25);
    }

    #[test]
    fn test_output_pixels_exactly_match_palette() {
        let raster = block_raster(
            8,
            8,
            &[(Rgb::new(200, 10, 10), 30), (Rgb::new(10, 200, 10), 20), (Rgb::new(10, 10, 200), 14)],
        );
        let options = QuantizeOptions { colors: 3, sample_stride: 1, ..Default::default() };
        let result = quantize(&raster, &options).unwrap();

        let colors = result.palette.colors();
        for y in 0..8 {
            for x in 0..8 {
                assert!(colors.contains(&result.raster.rgb_at(x, y)));
                assert_eq!(result.raster.alpha_at(x, y), 255);
            }
        }
    }

    #[test]
    fn test_k_below_minimum_is_clamped() {
        let raster = block_raster(4, 4, &[(Rgb::new(128, 128, 128), 16)]);
        let options = QuantizeOptions { colors: 1, sample_stride: 1, ..Default::default() };
        // Must not crash; the single real color wins, the spare centroid
        // gets no pixels and is dropped
        let result = quantize(&raster, &options).unwrap();
        assert_eq!(result.palette.len(), 1);
        assert_eq!(result.palette.entries[0].count, 16);
    }

    #[test]
    fn test_fully_transparent_raster_degenerate_palette() {
        let raster = Raster::new(10, 10);
        let result = quantize(&raster, &QuantizeOptions::default()).unwrap();
        assert_eq!(result.palette.len(), 1);
        assert_eq!(result.palette.entries[0].color, Rgb::new(0, 0, 0));
        assert_eq!(result.palette.entries[0].count, 100);
        assert_eq!(result.raster, raster);
    }

    #[test]
    fn test_transparent_pixels_preserved() {
        let mut raster = block_raster(4, 4, &[(Rgb::new(255, 0, 0), 16)]);
        raster.put(2, 2, Rgb::new(9, 9, 9), 0);
        let options = QuantizeOptions { colors: 2, sample_stride: 1, ..Default::default() };
        let result = quantize(&raster, &options).unwrap();

        assert_eq!(result.raster.alpha_at(2, 2), 0);
        assert_eq!(result.raster.rgb_at(2, 2), Rgb::new(9, 9, 9));
        assert_eq!(result.palette.total_count(), 15);
    }

    #[test]
    fn test_same_seed_same_palette() {
        let raster = block_raster(
            8,
            8,
            &[(Rgb::new(250, 5, 5), 20), (Rgb::new(5, 250, 5), 20), (Rgb::new(5, 5, 250), 24)],
        );
        let options =
            QuantizeOptions { colors: 3, sample_stride: 1, seed: 42, ..Default::default() };
        let a = quantize(&raster, &options).unwrap();
        let b = quantize(&raster, &options).unwrap();
        assert_eq!(a.palette, b.palette);
        assert_eq!(a.raster, b.raster);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let raster = Raster::new(2, 2);
        let zero_iters = QuantizeOptions { max_iterations: 0, ..Default::default() };
        assert_eq!(quantize(&raster, &zero_iters).unwrap_err(), QuantizeError::InvalidIterations);
        let zero_stride = QuantizeOptions { sample_stride: 0, ..Default::default() };
        assert_eq!(quantize(&raster, &zero_stride).unwrap_err(), QuantizeError::InvalidStride);
    }

    #[test]
    fn test_progress_reaches_completion() {
        let raster = block_raster(4, 4, &[(Rgb::new(1, 2, 3), 16)]);
        let progress = CollectingProgress::new();
        quantize_with_progress(&raster, &QuantizeOptions::default(), &progress).unwrap();
        let updates = progress.updates();
        assert_eq!(updates.first().map(|u| u.0), Some(0));
        assert_eq!(updates.last().map(|u| u.0), Some(100));
    }

    #[test]
    fn test_sample_stride_skips_pixels() {
        let raster = block_raster(4, 1, &[(Rgb::new(10, 10, 10), 4)]);
        assert_eq!(sample_pixels(&raster, 2).len(), 2);
        assert_eq!(sample_pixels(&raster, 1).len(), 4);
        assert_eq!(sample_pixels(&raster, 5).len(), 1);
    }
}
