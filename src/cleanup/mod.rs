//! Palette-based raster cleanup for separation prep.
//!
//! These stages run after quantization and expect raster pixels to
//! exactly match the working palette: speck removal dissolves
//! sub-threshold color clusters, merge collapses one palette color into
//! another, and the majority filter smooths ragged edges. Every stage
//! takes one raster and produces a new one.

mod majority;
mod merge;
mod specks;

pub use majority::majority_filter;
pub use merge::{merge_color, MergeResult};
pub use specks::{remove_specks, remove_specks_with_progress, SpeckRemoval};
