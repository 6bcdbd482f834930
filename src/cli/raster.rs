//! Raster pipeline command implementations (quantize, despeckle, merge,
//! smooth)

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::cleanup::{majority_filter, merge_color, remove_specks_with_progress};
use crate::color::{parse_color, Rgb};
use crate::config::WeftConfig;
use crate::models::Raster;
use crate::output::{load_raster, save_raster};
use crate::progress::{ConsoleProgress, NullProgress, ProgressReporter};
use crate::quantize::quantize_with_progress;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the quantize command
pub fn run_quantize(
    input: &Path,
    output: Option<&Path>,
    colors: Option<usize>,
    iterations: Option<usize>,
    stride: Option<usize>,
    seed: u64,
    report: Option<&Path>,
    progress: bool,
) -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(code) => return code,
    };

    let mut options = config.quantize.options(seed);
    if let Some(colors) = colors {
        options.colors = colors;
    }
    if let Some(iterations) = iterations {
        options.max_iterations = iterations;
    }
    if let Some(stride) = stride {
        options.sample_stride = stride;
    }

    let raster = match load_input(input) {
        Ok(raster) => raster,
        Err(code) => return code,
    };

    let result = {
        let reporter = progress_reporter(progress);
        match quantize_with_progress(&raster, &options, reporter.as_ref()) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        }
    };

    for (i, entry) in result.palette.entries.iter().enumerate() {
        println!(
            "{:>2}. {}  {:>9} px  {:>5.1}%",
            i + 1,
            entry.color.to_hex(),
            entry.count,
            result.palette.coverage_percent(i)
        );
    }

    if let Some(report_path) = report {
        let json = serde_json::json!({
            "palette": result.palette.entries.iter().enumerate().map(|(i, e)| {
                serde_json::json!({
                    "color": e.color.to_hex(),
                    "count": e.count,
                    "percentage": result.palette.coverage_percent(i),
                })
            }).collect::<Vec<_>>(),
        });
        if let Err(e) = fs::write(report_path, json.to_string()) {
            eprintln!("Error: cannot write report: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let out_path =
        output.map(Path::to_path_buf).unwrap_or_else(|| super::default_output(input, Some("quantized")));
    save_output(&result.raster, &out_path)
}

/// Execute the despeckle command
pub fn run_despeckle(
    input: &Path,
    output: Option<&Path>,
    palette: Option<&str>,
    min_cluster: Option<usize>,
    progress: bool,
) -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(code) => return code,
    };
    let min_cluster = min_cluster.unwrap_or(config.cleanup.min_cluster_size);

    let raster = match load_input(input) {
        Ok(raster) => raster,
        Err(code) => return code,
    };

    let palette = match palette {
        Some(list) => match parse_palette_list(list) {
            Ok(palette) => palette,
            Err(message) => {
                eprintln!("Error: {}", message);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        },
        None => distinct_colors(&raster),
    };

    let result = {
        let reporter = progress_reporter(progress);
        remove_specks_with_progress(&raster, &palette, min_cluster, reporter.as_ref())
    };
    println!("Repainted {} speck pixels", result.removed_pixels);

    let out_path =
        output.map(Path::to_path_buf).unwrap_or_else(|| super::default_output(input, Some("despeckled")));
    save_output(&result.raster, &out_path)
}

/// Execute the merge command
pub fn run_merge(input: &Path, from: &str, to: &str, output: Option<&Path>) -> ExitCode {
    let (from, to) = match (parse_color(from), parse_color(to)) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let raster = match load_input(input) {
        Ok(raster) => raster,
        Err(code) => return code,
    };

    let result = merge_color(&raster, from, to);
    println!("Recolored {} pixels", result.changed_pixels);

    let out_path =
        output.map(Path::to_path_buf).unwrap_or_else(|| super::default_output(input, Some("merged")));
    save_output(&result.raster, &out_path)
}

/// Execute the smooth command
pub fn run_smooth(input: &Path, output: Option<&Path>, passes: Option<usize>) -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(code) => return code,
    };
    let passes = passes.unwrap_or(config.cleanup.smoothing_passes);

    let raster = match load_input(input) {
        Ok(raster) => raster,
        Err(code) => return code,
    };

    let smoothed = majority_filter(&raster, passes);

    let out_path =
        output.map(Path::to_path_buf).unwrap_or_else(|| super::default_output(input, Some("smoothed")));
    save_output(&smoothed, &out_path)
}

/// Parse a comma-separated hex color list.
fn parse_palette_list(list: &str) -> Result<Vec<Rgb>, String> {
    let mut palette = Vec::new();
    for part in list.split(',') {
        let trimmed = part.trim();
        let color = parse_color(trimmed).map_err(|e| format!("'{}': {}", trimmed, e))?;
        palette.push(color);
    }
    if palette.is_empty() {
        return Err("palette list is empty".to_string());
    }
    Ok(palette)
}

/// Collect the distinct opaque colors of a raster, first-seen order.
fn distinct_colors(raster: &Raster) -> Vec<Rgb> {
    let mut colors = Vec::new();
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            if !raster.is_opaque(x, y) {
                continue;
            }
            let color = raster.rgb_at(x, y);
            if !colors.contains(&color) {
                colors.push(color);
            }
        }
    }
    colors
}

fn load_config() -> Result<WeftConfig, ExitCode> {
    WeftConfig::load_or_default().map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })
}

fn load_input(path: &Path) -> Result<Raster, ExitCode> {
    load_raster(path).map_err(|e| {
        eprintln!("Error: cannot load {}: {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

fn save_output(raster: &Raster, path: &Path) -> ExitCode {
    match save_raster(raster, path) {
        Ok(()) => {
            println!("Wrote {}", path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: cannot write {}: {}", path.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn progress_reporter(enabled: bool) -> Box<dyn ProgressReporter> {
    if enabled {
        Box::new(ConsoleProgress::new())
    } else {
        Box::new(NullProgress)
    }
}
