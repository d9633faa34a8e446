//! Normalizing raster inputs into a list of files.

use crate::{ClipError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as rasters when listing a directory.
pub const RASTER_EXTENSIONS: [&str; 8] = ["tif", "tiff", "img", "hgt", "dem", "vrt", "jp2", "asc"];

/// Rasters to clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterInput {
    /// One raster file.
    File(PathBuf),
    /// Several raster files, processed in the given order.
    Files(Vec<PathBuf>),
    /// Every raster directly inside a directory, sorted by path.
    Directory(PathBuf),
}

impl RasterInput {
    /// Classify a single path as a file or directory input.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            RasterInput::Directory(path)
        } else {
            RasterInput::File(path)
        }
    }

    /// Build an input from command-line style paths.
    ///
    /// A single directory expands to its rasters; anything else is a file list.
    pub fn from_paths(mut paths: Vec<PathBuf>) -> Self {
        if paths.len() == 1 {
            Self::from_path(paths.remove(0))
        } else {
            RasterInput::Files(paths)
        }
    }

    /// Resolve to the ordered list of raster files.
    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        match self {
            RasterInput::File(path) => {
                ensure_file(path)?;
                Ok(vec![path.clone()])
            }
            RasterInput::Files(paths) => {
                for path in paths {
                    ensure_file(path)?;
                }
                Ok(paths.clone())
            }
            RasterInput::Directory(dir) => list_rasters(dir),
        }
    }
}

impl From<PathBuf> for RasterInput {
    fn from(path: PathBuf) -> Self {
        RasterInput::from_path(path)
    }
}

impl From<Vec<PathBuf>> for RasterInput {
    fn from(paths: Vec<PathBuf>) -> Self {
        RasterInput::Files(paths)
    }
}

fn ensure_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ClipError::MissingInput(path.to_path_buf()))
    }
}

/// Whether `path` has a raster extension (case-insensitive).
pub fn is_raster(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| RASTER_EXTENSIONS.iter().any(|r| r.eq_ignore_ascii_case(ext)))
}

fn list_rasters(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ClipError::MissingInput(dir.to_path_buf()));
    }

    let mut rasters = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_raster(entry.path()) {
            rasters.push(entry.into_path());
        }
    }

    if rasters.is_empty() {
        return Err(ClipError::NoRasters(dir.to_path_buf()));
    }
    Ok(rasters)
}
