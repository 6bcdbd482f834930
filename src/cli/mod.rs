//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod draft;
mod raster;
mod validate;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Weftwork - derive weave drawdowns and prepare separation artwork
#[derive(Parser)]
#[command(name = "weft")]
#[command(about = "Weftwork - derive weave drawdowns and prepare separation artwork")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive a drawdown from a draft file and render it to PNG
    Drawdown {
        /// Draft definition (JSON)
        input: PathBuf,

        /// Output PNG path (default: {input}.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rendered size of one drawdown cell in pixels
        #[arg(long, default_value = "8", value_parser = clap::value_parser!(u16).range(1..=128))]
        cell_size: u16,

        /// Validate the draft first and refuse to render on errors
        #[arg(long)]
        check: bool,
    },

    /// Derive a jacquard drawdown from an assignment file
    Jacquard {
        /// Assignment + structure definitions (JSON)
        input: PathBuf,

        /// Output PNG path (default: {input}.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rendered size of one drawdown cell in pixels
        #[arg(long, default_value = "8", value_parser = clap::value_parser!(u16).range(1..=128))]
        cell_size: u16,

        /// Print per-structure coverage percentages
        #[arg(long)]
        coverage: bool,
    },

    /// Validate a draft against its loom capacity
    Validate {
        /// Draft definition (JSON)
        input: PathBuf,

        /// Replace the draft's loom with the [loom] section of weft.toml
        #[arg(long)]
        loom_from_config: bool,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Exit non-zero on warnings as well as errors
        #[arg(long)]
        strict: bool,
    },

    /// Quantize an image to a bounded palette
    Quantize {
        /// Input image (PNG)
        input: PathBuf,

        /// Output PNG path (default: {input}_quantized.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Palette size (2-24; default from weft.toml)
        #[arg(short = 'k', long)]
        colors: Option<usize>,

        /// Maximum clustering iterations
        #[arg(long)]
        iterations: Option<usize>,

        /// Sample every n-th pixel
        #[arg(long)]
        stride: Option<usize>,

        /// Seed for centroid initialization
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Write a JSON palette report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Show progress on stderr
        #[arg(long)]
        progress: bool,
    },

    /// Remove sub-threshold color clusters from a quantized image
    Despeckle {
        /// Input image (PNG), expected to be palette-exact
        input: PathBuf,

        /// Output PNG path (default: {input}_despeckled.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Comma-separated palette hex colors; defaults to the distinct
        /// opaque colors of the input
        #[arg(long)]
        palette: Option<String>,

        /// Clusters below this size are repainted
        #[arg(long)]
        min_cluster: Option<usize>,

        /// Show progress on stderr
        #[arg(long)]
        progress: bool,
    },

    /// Recolor every pixel of one exact color to another
    Merge {
        /// Input image (PNG)
        input: PathBuf,

        /// Color to replace (hex, e.g. #FF0000)
        #[arg(long)]
        from: String,

        /// Replacement color (hex)
        #[arg(long)]
        to: String,

        /// Output PNG path (default: {input}_merged.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Smooth ragged edges with iterative majority voting
    Smooth {
        /// Input image (PNG)
        input: PathBuf,

        /// Output PNG path (default: {input}_smoothed.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of smoothing passes
        #[arg(long)]
        passes: Option<usize>,
    },
}

/// Parse arguments and dispatch to the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Drawdown { input, output, cell_size, check } => {
            draft::run_drawdown(&input, output.as_deref(), cell_size as usize, check)
        }
        Commands::Jacquard { input, output, cell_size, coverage } => {
            draft::run_jacquard(&input, output.as_deref(), cell_size as usize, coverage)
        }
        Commands::Validate { input, loom_from_config, format, strict } => {
            validate::run_validate(&input, loom_from_config, &format, strict)
        }
        Commands::Quantize { input, output, colors, iterations, stride, seed, report, progress } => {
            raster::run_quantize(
                &input,
                output.as_deref(),
                colors,
                iterations,
                stride,
                seed,
                report.as_deref(),
                progress,
            )
        }
        Commands::Despeckle { input, output, palette, min_cluster, progress } => {
            raster::run_despeckle(
                &input,
                output.as_deref(),
                palette.as_deref(),
                min_cluster,
                progress,
            )
        }
        Commands::Merge { input, from, to, output } => {
            raster::run_merge(&input, &from, &to, output.as_deref())
        }
        Commands::Smooth { input, output, passes } => {
            raster::run_smooth(&input, output.as_deref(), passes)
        }
    }
}

/// Derive an output path from the input by replacing the extension,
/// optionally tagging the file stem.
pub(crate) fn default_output(input: &std::path::Path, tag: Option<&str>) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let name = match tag {
        Some(tag) => format!("{}_{}.png", stem, tag),
        None => format!("{}.png", stem),
    };
    input.with_file_name(name)
}
