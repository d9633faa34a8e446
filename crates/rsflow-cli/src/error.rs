//! Error types for the command-line front end.

use raster_clip::ClipError;
use srtm_fetch::SrtmError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid YAML or has unknown keys.
    #[error("Invalid config {path}: {source}")]
    ConfigParse {
        /// Config file path.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// A fetch request failed before any tile was attempted.
    #[error(transparent)]
    Srtm(#[from] SrtmError),

    /// A clip request failed before any raster was attempted.
    #[error(transparent)]
    Clip(#[from] ClipError),
}
