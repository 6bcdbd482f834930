//! Parametric draft builders.
//!
//! Each generator rewrites part of a draft (threading, treadling, tie-up)
//! from its harness/treadle/warp/weft counts. All are deterministic pure
//! functions of those counts: calling one twice leaves the draft
//! unchanged after the first call.

use crate::models::Draft;

/// Set the tie-up to a 2/2 twill: `(harness + treadle) % harness_count < 2`.
pub fn twill_2_2_tie_up(draft: &mut Draft) {
    shifted_twill_tie_up(draft, 2);
}

/// Set the tie-up to a 3/1 twill: same shift rule with threshold 3.
pub fn twill_3_1_tie_up(draft: &mut Draft) {
    shifted_twill_tie_up(draft, 3);
}

/// Shared twill rule: a band of `rise` lifts stepping one harness per
/// treadle.
fn shifted_twill_tie_up(draft: &mut Draft, rise: usize) {
    for harness in 0..draft.harness_count {
        for treadle in 0..draft.treadle_count {
            let up = (harness + treadle) % draft.harness_count < rise;
            draft.set_lift(harness, treadle, up);
        }
    }
}

/// Basket weave: threading and treadling grouped in pairs, plain-weave
/// tie-up.
pub fn basket(draft: &mut Draft) {
    for (i, entry) in draft.threading.iter_mut().enumerate() {
        *entry = ((i / 2) % draft.harness_count) as u8;
    }
    for (i, entry) in draft.treadling.iter_mut().enumerate() {
        *entry = ((i / 2) % draft.treadle_count) as u8;
    }
    plain_weave_tie_up(draft);
}

/// Herringbone: threading follows a point sawtooth, tie-up is a 2/2 twill.
pub fn herringbone(draft: &mut Draft) {
    let harness_count = draft.harness_count;
    for (i, entry) in draft.threading.iter_mut().enumerate() {
        *entry = point_value(i, harness_count);
    }
    twill_2_2_tie_up(draft);
}

/// Diamond: threading and treadling both follow point sawtooths (sized
/// independently by harness and treadle counts), tie-up is a 2/2 twill.
pub fn diamond(draft: &mut Draft) {
    let harness_count = draft.harness_count;
    let treadle_count = draft.treadle_count;
    for (i, entry) in draft.threading.iter_mut().enumerate() {
        *entry = point_value(i, harness_count);
    }
    for (i, entry) in draft.treadling.iter_mut().enumerate() {
        *entry = point_value(i, treadle_count);
    }
    twill_2_2_tie_up(draft);
}

/// Reset threading and treadling to a straight draw (`i % count`).
///
/// Used as the "clear" operation before hand-editing a draft.
pub fn straight_draw(draft: &mut Draft) {
    for (i, entry) in draft.threading.iter_mut().enumerate() {
        *entry = (i % draft.harness_count) as u8;
    }
    for (i, entry) in draft.treadling.iter_mut().enumerate() {
        *entry = (i % draft.treadle_count) as u8;
    }
}

/// Satin tie-up: one skip-stepped lift per treadle.
///
/// `skip` should be coprime with the harness count for a true satin;
/// other values still produce a single lift per treadle.
pub fn satin_tie_up(draft: &mut Draft, skip: usize) {
    draft.tie_up.fill(0);
    for treadle in 0..draft.treadle_count {
        let harness = (treadle * skip) % draft.harness_count;
        draft.set_lift(harness, treadle, true);
    }
}

/// Plain-weave tie-up: diagonal lifts up to the smaller of the harness
/// and treadle counts.
pub fn plain_weave_tie_up(draft: &mut Draft) {
    draft.tie_up.fill(0);
    for i in 0..draft.harness_count.min(draft.treadle_count) {
        draft.set_lift(i, i, true);
    }
}

/// Point sawtooth value: ascend `0..count-1` then descend back, with
/// period `2 * count - 2`.
fn point_value(i: usize, count: usize) -> u8 {
    if count < 2 {
        return 0;
    }
    let period = 2 * count - 2;
    let v = i % period;
    if v < count {
        v as u8
    } else {
        (period - v) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twill_2_2_tie_up() {
        let mut draft = Draft::new(4, 4, 4, 4);
        twill_2_2_tie_up(&mut draft);
        for harness in 0..4 {
            for treadle in 0..4 {
                let expected = ((harness + treadle) % 4 < 2) as u8;
                assert_eq!(draft.lift(harness, treadle), expected);
            }
        }
    }

    #[test]
    fn test_twill_3_1_tie_up_has_three_lifts_per_treadle() {
        let mut draft = Draft::new(4, 4, 4, 4);
        twill_3_1_tie_up(&mut draft);
        for treadle in 0..4 {
            let lifts: u8 = (0..4).map(|h| draft.lift(h, treadle)).sum();
            assert_eq!(lifts, 3);
        }
    }

    #[test]
    fn test_basket_pairs_threads() {
        let mut draft = Draft::new(8, 8, 4, 4);
        basket(&mut draft);
        assert_eq!(draft.threading, vec![0, 0, 1, 1, 2, 2, 3, 3]);
        assert_eq!(draft.treadling, vec![0, 0, 1, 1, 2, 2, 3, 3]);
        // plain-weave diagonal
        for i in 0..4 {
            assert_eq!(draft.lift(i, i), 1);
        }
    }

    #[test]
    fn test_herringbone_threading_is_point() {
        let mut draft = Draft::new(10, 4, 4, 4);
        herringbone(&mut draft);
        // period 2*4-2 = 6: 0 1 2 3 2 1, then repeats
        assert_eq!(draft.threading, vec![0, 1, 2, 3, 2, 1, 0, 1, 2, 3]);
    }

    #[test]
    fn test_diamond_points_both_axes() {
        let mut draft = Draft::new(6, 6, 4, 4);
        diamond(&mut draft);
        assert_eq!(draft.threading, vec![0, 1, 2, 3, 2, 1]);
        assert_eq!(draft.treadling, vec![0, 1, 2, 3, 2, 1]);
    }

    #[test]
    fn test_straight_draw_resets() {
        let mut draft = Draft::new(6, 6, 4, 4);
        diamond(&mut draft);
        straight_draw(&mut draft);
        assert_eq!(draft.threading, vec![0, 1, 2, 3, 0, 1]);
        assert_eq!(draft.treadling, vec![0, 1, 2, 3, 0, 1]);
    }

    #[test]
    fn test_satin_tie_up_single_lift_per_treadle() {
        let mut draft = Draft::new(5, 5, 5, 5);
        satin_tie_up(&mut draft, 2);
        for treadle in 0..5 {
            let lifts: Vec<usize> =
                (0..5).filter(|&h| draft.lift(h, treadle) == 1).collect();
            assert_eq!(lifts, vec![(treadle * 2) % 5]);
        }
    }

    #[test]
    fn test_plain_weave_tie_up_diagonal() {
        let mut draft = Draft::new(4, 4, 4, 2);
        plain_weave_tie_up(&mut draft);
        assert_eq!(draft.lift(0, 0), 1);
        assert_eq!(draft.lift(1, 1), 1);
        assert_eq!(draft.lift(2, 0), 0);
        assert_eq!(draft.lift(3, 1), 0);
    }

    #[test]
    fn test_generators_are_idempotent() {
        let mut once = Draft::new(8, 8, 4, 4);
        diamond(&mut once);
        let mut twice = once.clone();
        diamond(&mut twice);
        assert_eq!(once, twice);
    }
}
