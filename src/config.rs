//! Configuration loading and discovery for `weft.toml`
//!
//! Studio defaults (loom capacity, quantizer tuning, cleanup thresholds)
//! live in an optional `weft.toml`. Every section and field is optional;
//! missing values fall back to built-in defaults, and CLI flags override
//! the file.

use crate::models::LoomCapacity;
use crate::quantize::QuantizeOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse weft.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

/// `[loom]` section: capacity ceiling applied to drafts with no explicit
/// loom of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoomConfig {
    pub max_harnesses: usize,
    pub max_treadles: usize,
    pub max_warp: usize,
    pub max_weft: usize,
}

impl Default for LoomConfig {
    fn default() -> Self {
        let capacity = LoomCapacity::default();
        Self {
            max_harnesses: capacity.max_harnesses,
            max_treadles: capacity.max_treadles,
            max_warp: capacity.max_warp,
            max_weft: capacity.max_weft,
        }
    }
}

impl LoomConfig {
    /// Convert to the model-side capacity record.
    pub fn capacity(&self) -> LoomCapacity {
        LoomCapacity {
            max_harnesses: self.max_harnesses,
            max_treadles: self.max_treadles,
            max_warp: self.max_warp,
            max_weft: self.max_weft,
        }
    }
}

/// `[quantize]` section: default quantizer tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizeConfig {
    pub colors: usize,
    pub max_iterations: usize,
    pub sample_stride: usize,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        let options = QuantizeOptions::default();
        Self {
            colors: options.colors,
            max_iterations: options.max_iterations,
            sample_stride: options.sample_stride,
        }
    }
}

impl QuantizeConfig {
    /// Convert to engine options with the given seed.
    pub fn options(&self, seed: u64) -> QuantizeOptions {
        QuantizeOptions {
            colors: self.colors,
            max_iterations: self.max_iterations,
            sample_stride: self.sample_stride,
            seed,
        }
    }
}

/// `[cleanup]` section: default thresholds for the raster cleanup stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Clusters below this size are treated as specks
    pub min_cluster_size: usize,
    /// Default majority-filter pass count
    pub smoothing_passes: usize,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self { min_cluster_size: 8, smoothing_passes: 1 }
    }
}

/// Full `weft.toml` schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeftConfig {
    pub loom: LoomConfig,
    pub quantize: QuantizeConfig,
    pub cleanup: CleanupConfig,
}

impl WeftConfig {
    /// Load configuration from a specific file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Load the discovered config, or defaults when none exists.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match find_config() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

/// Find `weft.toml` by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for weft.toml
/// 2. Check XDG_CONFIG_HOME/weftwork/weft.toml (or ~/.config/weftwork/weft.toml)
///
/// # Returns
/// - `Some(path)` if a weft.toml file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }
    find_xdg_config()
}

/// Walk up from `start` looking for weft.toml.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join("weft.toml");
        if candidate.exists() {
            return Some(candidate);
        }
        dir = current.parent().map(Path::to_path_buf);
    }
    None
}

/// Find weft.toml in the XDG config directory.
fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("weftwork").join("weft.toml");
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_engine_defaults() {
        let config = WeftConfig::default();
        assert_eq!(config.quantize.colors, QuantizeOptions::default().colors);
        assert_eq!(config.loom.capacity(), LoomCapacity::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[quantize]\ncolors = 12").unwrap();

        let config = WeftConfig::load(file.path()).unwrap();
        assert_eq!(config.quantize.colors, 12);
        assert_eq!(
            config.quantize.max_iterations,
            QuantizeConfig::default().max_iterations
        );
        assert_eq!(config.cleanup.min_cluster_size, CleanupConfig::default().min_cluster_size);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [").unwrap();
        assert!(matches!(WeftConfig::load(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_find_config_from_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("weft.toml"), "").unwrap();

        let found = find_config_from(nested).unwrap();
        assert_eq!(found, dir.path().join("weft.toml"));
    }
}
