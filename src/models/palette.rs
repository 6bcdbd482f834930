//! Palette types produced by color quantization.

use crate::color::Rgb;
use serde::{Deserialize, Serialize};

/// One palette color with its full-image pixel coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub color: Rgb,
    /// Number of opaque pixels assigned to this color
    pub count: usize,
}

/// An ordered palette, largest coverage first.
///
/// Created fresh by each quantization call. Downstream raster operations
/// match against these colors exactly - no tolerance matching.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Palette {
    pub entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The palette colors, in coverage order.
    pub fn colors(&self) -> Vec<Rgb> {
        self.entries.iter().map(|e| e.color).collect()
    }

    /// Total covered pixel count across all entries.
    pub fn total_count(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Coverage of `entry` as a percentage of the total covered pixels.
    pub fn coverage_percent(&self, entry: usize) -> f64 {
        let total = self.total_count();
        if total == 0 {
            return 0.0;
        }
        self.entries[entry].count as f64 * 100.0 / total as f64
    }
}
