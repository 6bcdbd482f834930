//! Dobby weave draft types.
//!
//! A draft is the threading/treadling/tie-up triple that defines a weave
//! structure, together with the repeat, symmetry, and advisory loom
//! capacity used when deriving its drawdown.

use serde::{Deserialize, Serialize};

/// Repeat counts applied when deriving a drawdown.
///
/// Values below 1 are treated as 1 (see [`Repeat::normalized`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    /// Number of times the draft tiles across the warp (output width factor)
    pub warp: u32,
    /// Number of times the draft tiles along the weft (output height factor)
    pub weft: u32,
}

impl Default for Repeat {
    fn default() -> Self {
        Self { warp: 1, weft: 1 }
    }
}

impl Repeat {
    /// Clamp both counts to at least 1.
    pub fn normalized(self) -> Self {
        Self { warp: self.warp.max(1), weft: self.weft.max(1) }
    }
}

/// Mirror symmetry applied to odd repeat tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Symmetry {
    /// Reflect threading lookups on odd warp repeat tiles
    #[serde(default)]
    pub warp_mirror: bool,
    /// Reflect treadling lookups on odd weft repeat tiles
    #[serde(default)]
    pub weft_mirror: bool,
}

/// Advisory loom capacity ceiling.
///
/// Violations are reported by the validator, never enforced by the
/// drawdown engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoomCapacity {
    pub max_harnesses: usize,
    pub max_treadles: usize,
    pub max_warp: usize,
    pub max_weft: usize,
}

impl Default for LoomCapacity {
    fn default() -> Self {
        // A common 32-harness dobby with generous thread counts
        Self { max_harnesses: 32, max_treadles: 32, max_warp: 4096, max_weft: 4096 }
    }
}

/// A dobby weave draft.
///
/// Invariants (checked by the validator, assumed by the engine):
/// - `threading.len() == warp_count`, each entry `< harness_count`
/// - `treadling.len() == weft_count`, each entry `< treadle_count`
/// - `tie_up.len() == harness_count * treadle_count`, laid out row-major
///   as `tie_up[harness * treadle_count + treadle]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// Number of warp ends (drawdown width before repeat)
    pub warp_count: usize,
    /// Number of weft picks (drawdown height before repeat)
    pub weft_count: usize,
    /// Number of harnesses on the loom
    pub harness_count: usize,
    /// Number of treadles on the loom
    pub treadle_count: usize,
    /// Warp end -> harness index, values in `[0, harness_count)`
    pub threading: Vec<u8>,
    /// Weft pick -> treadle index, values in `[0, treadle_count)`
    pub treadling: Vec<u8>,
    /// Harness x treadle lift matrix, 1 = harness lifts on that treadle
    pub tie_up: Vec<u8>,
    /// Repeat tiling applied when deriving the drawdown
    #[serde(default)]
    pub repeat: Repeat,
    /// Mirror symmetry applied to odd repeat tiles
    #[serde(default)]
    pub symmetry: Symmetry,
    /// Advisory loom capacity
    #[serde(default)]
    pub loom: LoomCapacity,
}

impl Draft {
    /// Create a draft with straight threading/treadling and an empty tie-up.
    pub fn new(
        warp_count: usize,
        weft_count: usize,
        harness_count: usize,
        treadle_count: usize,
    ) -> Self {
        Self {
            warp_count,
            weft_count,
            harness_count,
            treadle_count,
            threading: (0..warp_count).map(|i| (i % harness_count) as u8).collect(),
            treadling: (0..weft_count).map(|i| (i % treadle_count) as u8).collect(),
            tie_up: vec![0; harness_count * treadle_count],
            repeat: Repeat::default(),
            symmetry: Symmetry::default(),
            loom: LoomCapacity::default(),
        }
    }

    /// Lift bit for `(harness, treadle)`.
    #[inline]
    pub fn lift(&self, harness: usize, treadle: usize) -> u8 {
        self.tie_up[harness * self.treadle_count + treadle]
    }

    /// Set the lift bit for `(harness, treadle)`.
    pub fn set_lift(&mut self, harness: usize, treadle: usize, up: bool) {
        self.tie_up[harness * self.treadle_count + treadle] = up as u8;
    }

    /// True if at least one tie-up bit is set.
    pub fn has_lift(&self) -> bool {
        self.tie_up.iter().any(|&b| b != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_is_straight_draw() {
        let draft = Draft::new(8, 8, 4, 4);
        assert_eq!(draft.threading, vec![0, 1, 2, 3, 0, 1, 2, 3]);
        assert_eq!(draft.treadling, vec![0, 1, 2, 3, 0, 1, 2, 3]);
        assert_eq!(draft.tie_up.len(), 16);
        assert!(!draft.has_lift());
    }

    #[test]
    fn test_lift_layout() {
        let mut draft = Draft::new(4, 4, 4, 4);
        draft.set_lift(2, 1, true);
        assert_eq!(draft.lift(2, 1), 1);
        assert_eq!(draft.tie_up[2 * 4 + 1], 1);
    }

    #[test]
    fn test_repeat_normalized_clamps_to_one() {
        let repeat = Repeat { warp: 0, weft: 3 };
        assert_eq!(repeat.normalized(), Repeat { warp: 1, weft: 3 });
    }

    #[test]
    fn test_draft_json_round_trip() {
        let mut draft = Draft::new(4, 4, 4, 4);
        draft.set_lift(0, 0, true);
        draft.repeat = Repeat { warp: 2, weft: 2 };
        draft.symmetry.warp_mirror = true;

        let json = serde_json::to_string(&draft).unwrap();
        let back: Draft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draft);
    }

    #[test]
    fn test_draft_json_defaults() {
        // repeat/symmetry/loom may be omitted from hand-written drafts
        let json = r#"{
            "warp_count": 2, "weft_count": 2,
            "harness_count": 2, "treadle_count": 2,
            "threading": [0, 1], "treadling": [0, 1],
            "tie_up": [1, 0, 0, 1]
        }"#;
        let draft: Draft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.repeat, Repeat::default());
        assert!(!draft.symmetry.warp_mirror);
        assert_eq!(draft.loom, LoomCapacity::default());
    }
}
