//! Iterative 3x3 majority-vote edge smoothing.

use crate::color::Rgb;
use crate::models::Raster;

/// Minimum neighborhood votes (of up to 9, center included) a color
/// needs to replace the center pixel.
const MAJORITY_VOTES: usize = 5;

/// Smooth a raster with repeated 3x3 majority votes.
///
/// Each pass walks every interior pixel (the 1-pixel border is left
/// untouched) with visible alpha, tallies exact-RGB matches over its
/// 3x3 neighborhood including itself and excluding transparent
/// neighbors, and replaces the pixel at full alpha when some color
/// reaches a majority. Passes compose sequentially: each reads the
/// previous pass's complete output, never its own partial writes, so
/// results don't smear with scan order.
///
/// `passes == 0` is a no-op returning a copy.
pub fn majority_filter(raster: &Raster, passes: usize) -> Raster {
    let mut current = raster.clone();
    for _ in 0..passes {
        current = majority_pass(&current);
    }
    current
}

/// One snapshot-then-write majority pass.
fn majority_pass(raster: &Raster) -> Raster {
    let width = raster.width();
    let height = raster.height();
    let mut out = raster.clone();

    if width < 3 || height < 3 {
        // No interior pixels to process
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if !raster.is_opaque(x, y) {
                continue;
            }
            if let Some(winner) = neighborhood_majority(raster, x, y) {
                out.put(x, y, winner, 255);
            }
        }
    }
    out
}

/// The color holding a majority of the 3x3 neighborhood around
/// `(x, y)`, if any. First-seen order breaks ties before the majority
/// test.
fn neighborhood_majority(raster: &Raster, x: usize, y: usize) -> Option<Rgb> {
    // Insertion-ordered tally; at most 9 entries, linear scan is fine
    let mut tally: Vec<(Rgb, usize)> = Vec::with_capacity(9);

    for ny in y - 1..=y + 1 {
        for nx in x - 1..=x + 1 {
            if !raster.is_opaque(nx, ny) {
                continue;
            }
            let color = raster.rgb_at(nx, ny);
            match tally.iter_mut().find(|(c, _)| *c == color) {
                Some((_, count)) => *count += 1,
                None => tally.push((color, 1)),
            }
        }
    }

    // max_by_key would take the last maximum; scan keeps the first
    let mut winner: Option<(Rgb, usize)> = None;
    for &(color, count) in &tally {
        match winner {
            Some((_, best)) if count <= best => {}
            _ => winner = Some((color, count)),
        }
    }
    winner.filter(|&(_, count)| count >= MAJORITY_VOTES).map(|(color, _)| color)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

    fn solid(width: usize, height: usize, color: Rgb) -> Raster {
        let mut raster = Raster::new(width, height);
        for y in 0..height {
            for x in 0..width {
                raster.put(x, y, color, 255);
            }
        }
        raster
    }

    #[test]
    fn test_zero_passes_is_noop() {
        let mut raster = solid(4, 4, RED);
        raster.put(1, 1, BLUE, 255);
        assert_eq!(majority_filter(&raster, 0), raster);
    }

    #[test]
    fn test_lone_pixel_smoothed_away() {
        let mut raster = solid(5, 5, RED);
        raster.put(2, 2, BLUE, 255);

        let smoothed = majority_filter(&raster, 1);
        assert_eq!(smoothed.rgb_at(2, 2), RED);
    }

    #[test]
    fn test_border_pixels_untouched() {
        let mut raster = solid(3, 3, RED);
        raster.put(0, 0, BLUE, 255);

        let smoothed = majority_filter(&raster, 1);
        assert_eq!(smoothed.rgb_at(0, 0), BLUE);
    }

    #[test]
    fn test_solid_region_is_stable() {
        let raster = solid(6, 6, RED);
        assert_eq!(majority_filter(&raster, 3), raster);
    }

    #[test]
    fn test_no_majority_leaves_pixel() {
        // A 2-wide vertical stripe boundary: each interior pixel sees
        // 6 of its own color, so both sides are stable
        let mut raster = solid(4, 3, RED);
        for y in 0..3 {
            for x in 2..4 {
                raster.put(x, y, BLUE, 255);
            }
        }
        let smoothed = majority_filter(&raster, 1);
        assert_eq!(smoothed, raster);
    }

    #[test]
    fn test_transparent_neighbors_excluded_from_vote() {
        let mut raster = solid(3, 3, RED);
        // Make most neighbors transparent; center keeps itself + two
        // opaque red neighbors = 3 votes, below the majority threshold
        for (x, y) in [(0, 0), (1, 0), (2, 0), (0, 1), (0, 2), (1, 2)] {
            raster.put(x, y, RED, 0);
        }
        raster.put(1, 1, BLUE, 255);

        let smoothed = majority_filter(&raster, 1);
        assert_eq!(smoothed.rgb_at(1, 1), BLUE);
    }

    #[test]
    fn test_passes_compose_sequentially() {
        let mut raster = solid(7, 7, RED);
        raster.put(3, 3, BLUE, 255);
        raster.put(4, 3, BLUE, 255);

        // n passes equal n applications of a single pass
        let one = majority_filter(&raster, 1);
        let two = majority_filter(&raster, 2);
        assert_eq!(two, majority_filter(&one, 1));
        // The snapshot discipline dissolves both tail pixels in the
        // first pass: each sees 7 red votes from the unmodified input
        assert_eq!(one.rgb_at(3, 3), RED);
        assert_eq!(one.rgb_at(4, 3), RED);
    }
}
