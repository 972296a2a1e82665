//! Configuration types for the photo organizer

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of moves shown in the report table before it is truncated
pub const DEFAULT_PREVIEW_LIMIT: usize = 30;

/// What to do when two files would end up at the same destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Log a warning and let the later move overwrite the earlier file
    #[default]
    Overwrite,
    /// Refuse to apply the plan if any destination is shared or already occupied
    Fail,
}

/// Configuration for one organizer run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned recursively for images
    pub source_dir: PathBuf,

    /// Root of the `YYYY/YYYY-MM` output tree
    pub output_dir: PathBuf,

    /// Apply the plan; when false the run is a dry-run
    pub apply: bool,

    /// Collision handling when applying
    pub on_collision: CollisionPolicy,

    /// Maximum rows in the report table
    pub preview_limit: usize,

    /// Verbose output
    pub verbose: bool,

    /// Extensions considered images, matched without the leading dot
    pub image_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            apply: false,
            on_collision: CollisionPolicy::default(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            verbose: false,
            image_extensions: vec![
                "jpg".into(),
                "jpeg".into(),
                "png".into(),
                "heic".into(),
                "tif".into(),
                "tiff".into(),
            ],
        }
    }
}

impl Config {
    /// Create a config for the given source and output directories with default settings
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Check if a file extension is a supported image format (case-insensitive)
    pub fn is_image(&self, ext: &str) -> bool {
        !ext.is_empty()
            && self
                .image_extensions
                .iter()
                .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file '{}': {source}", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}
