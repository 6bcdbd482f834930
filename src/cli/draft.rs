//! Drawdown command implementations (drawdown, jacquard)

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use serde::Deserialize;

use crate::drawdown::derive_drawdown;
use crate::jacquard::{derive_jacquard_drawdown, structure_usage};
use crate::models::{Draft, JacquardAssignment, WeaveStructure};
use crate::output::{drawdown_image, OutputError};
use crate::validate::{validate_draft, Severity};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Conventional drawdown rendering: warp black, weft white.
const WARP_COLOR: [u8; 4] = [0, 0, 0, 255];
const WEFT_COLOR: [u8; 4] = [255, 255, 255, 255];

/// A jacquard project file: the structure library plus the cell
/// assignment grid.
#[derive(Debug, Deserialize)]
struct JacquardFile {
    structures: Vec<WeaveStructure>,
    assignment: JacquardAssignment,
}

/// Execute the drawdown command
pub fn run_drawdown(
    input: &Path,
    output: Option<&Path>,
    cell_size: usize,
    check: bool,
) -> ExitCode {
    let draft: Draft = match read_json(input) {
        Ok(draft) => draft,
        Err(code) => return code,
    };

    if check {
        let issues = validate_draft(&draft);
        for issue in &issues {
            eprintln!("{}", issue);
        }
        if issues.iter().any(|i| i.severity == Severity::Error) {
            eprintln!("Error: draft failed validation; not rendering");
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let drawdown = derive_drawdown(&draft);
    let img = drawdown_image(&drawdown, cell_size, WARP_COLOR, WEFT_COLOR);

    let out_path = output.map(Path::to_path_buf).unwrap_or_else(|| super::default_output(input, None));
    match save_image(&img, &out_path) {
        Ok(()) => {
            println!(
                "Rendered {}x{} drawdown to {}",
                drawdown.width(),
                drawdown.height(),
                out_path.display()
            );
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the jacquard command
pub fn run_jacquard(
    input: &Path,
    output: Option<&Path>,
    cell_size: usize,
    coverage: bool,
) -> ExitCode {
    let file: JacquardFile = match read_json(input) {
        Ok(file) => file,
        Err(code) => return code,
    };

    let expected = file.assignment.width * file.assignment.height;
    if file.assignment.cells.len() != expected {
        eprintln!(
            "Error: assignment has {} cells, expected {}x{} = {}",
            file.assignment.cells.len(),
            file.assignment.width,
            file.assignment.height,
            expected
        );
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let drawdown = derive_jacquard_drawdown(&file.assignment, &file.structures);

    if coverage {
        let usage = structure_usage(&file.assignment, &file.structures);
        let total = file.assignment.cells.len().max(1);
        // Report in structure-library order
        for structure in &file.structures {
            let cells = usage.get(&structure.id).copied().unwrap_or(0);
            println!(
                "{:<20} {:>7} cells  {:>5.1}%",
                structure.id,
                cells,
                cells as f64 * 100.0 / total as f64
            );
        }
    }

    let img = drawdown_image(&drawdown, cell_size, WARP_COLOR, WEFT_COLOR);
    let out_path = output.map(Path::to_path_buf).unwrap_or_else(|| super::default_output(input, None));
    match save_image(&img, &out_path) {
        Ok(()) => {
            println!(
                "Rendered {}x{} jacquard drawdown to {}",
                drawdown.width(),
                drawdown.height(),
                out_path.display()
            );
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Read and deserialize a JSON definition file, mapping failures to
/// exit codes.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ExitCode> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: cannot read {}: {}", path.display(), e);
        ExitCode::from(EXIT_ERROR)
    })?;
    serde_json::from_str(&text).map_err(|e| {
        eprintln!("Error: invalid definition in {}: {}", path.display(), e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

/// Save an image, creating parent directories as needed.
fn save_image(img: &image::RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    img.save(path)?;
    Ok(())
}
