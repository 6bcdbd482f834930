//! PNG input/output and raster conversion
//!
//! The engines never touch image files; encoding and decoding happen
//! here, at the CLI boundary, through the `image` crate.

use image::RgbaImage;
use std::io;
use std::path::Path;

use crate::grid::Grid;
use crate::models::{Raster, RasterError};

/// Error type for image I/O operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error during file operations
    Io(io::Error),
    /// Image decoding/encoding error
    Image(image::ImageError),
    /// Decoded buffer didn't form a valid raster
    Raster(RasterError),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Io(e) => write!(f, "IO error: {}", e),
            OutputError::Image(e) => write!(f, "Image error: {}", e),
            OutputError::Raster(e) => write!(f, "Raster error: {}", e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Io(e) => Some(e),
            OutputError::Image(e) => Some(e),
            OutputError::Raster(e) => Some(e),
        }
    }
}

impl From<io::Error> for OutputError {
    fn from(e: io::Error) -> Self {
        OutputError::Io(e)
    }
}

impl From<image::ImageError> for OutputError {
    fn from(e: image::ImageError) -> Self {
        OutputError::Image(e)
    }
}

impl From<RasterError> for OutputError {
    fn from(e: RasterError) -> Self {
        OutputError::Raster(e)
    }
}

/// Load a PNG (or any format `image` can sniff) into a raster.
pub fn load_raster(path: &Path) -> Result<Raster, OutputError> {
    let img = image::open(path)?.to_rgba8();
    let (width, height) = img.dimensions();
    let raster = Raster::from_rgba(width as usize, height as usize, img.into_raw())?;
    Ok(raster)
}

/// Save a raster to a PNG file, creating parent directories as needed.
pub fn save_raster(raster: &Raster, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let img = to_image(raster);
    img.save(path)?;
    Ok(())
}

/// Convert a raster into an `image` buffer.
pub fn to_image(raster: &Raster) -> RgbaImage {
    RgbaImage::from_raw(
        raster.width() as u32,
        raster.height() as u32,
        raster.as_bytes().to_vec(),
    )
    .unwrap_or_else(|| RgbaImage::new(0, 0))
}

/// Render a drawdown grid to an image, one cell per `cell_size` square.
///
/// Warp-up cells render in `warp` color, weft-up cells in `weft` color -
/// the conventional black-on-white drawdown uses black warp.
pub fn drawdown_image(
    drawdown: &Grid<u8>,
    cell_size: usize,
    warp: [u8; 4],
    weft: [u8; 4],
) -> RgbaImage {
    let cell = cell_size.max(1) as u32;
    let width = drawdown.width() as u32 * cell;
    let height = drawdown.height() as u32 * cell;

    let mut img = RgbaImage::new(width, height);
    for (px, py, pixel) in img.enumerate_pixels_mut() {
        let x = (px / cell) as usize;
        let y = (py / cell) as usize;
        let rgba = if *drawdown.get(x, y) != 0 { warp } else { weft };
        *pixel = image::Rgba(rgba);
    }
    img
}
