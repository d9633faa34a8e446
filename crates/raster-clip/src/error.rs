//! Error types for the raster clipper.

use rsflow_common::ToolError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when clipping rasters.
#[derive(Debug, Error)]
pub enum ClipError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error while listing rasters.
    #[error("Failed to list rasters: {0}")]
    Walk(#[from] walkdir::Error),

    /// External GIS tool failed.
    #[error("Clip failed: {0}")]
    Tool(#[from] ToolError),

    /// An input raster or the shapefile does not exist.
    #[error("Input not found: {0}")]
    MissingInput(PathBuf),

    /// A directory input contained no raster files.
    #[error("No rasters found in {0}")]
    NoRasters(PathBuf),

    /// The computed output path would overwrite an input or an earlier output.
    #[error("Output path {0} would overwrite an input or another output")]
    OutputCollision(PathBuf),

    /// The input path has no file name to derive an output name from.
    #[error("Cannot derive an output name from {0}")]
    InvalidInput(PathBuf),
}
