//! Progress reporting.
//!
//! Operations log through `tracing` and additionally hand structured
//! [`ProgressEvent`]s to an optional caller-supplied [`ProgressCallback`],
//! so a front end can render progress without scraping log output.

use std::fmt;
use std::path::Path;

/// A progress notification from a running operation.
#[derive(Debug, Clone, Copy)]
pub enum ProgressEvent<'a> {
    /// A batch is starting with `total` items.
    Started {
        /// Number of items in the batch.
        total: usize,
    },
    /// A file download is starting.
    Downloading {
        /// Source URL.
        url: &'a str,
        /// Local destination.
        dest: &'a Path,
    },
    /// A tile was already present locally and was not downloaded.
    TileCached {
        /// Existing tile path.
        path: &'a Path,
    },
    /// A tile was extracted from its archive.
    TileExtracted {
        /// Extracted tile path.
        path: &'a Path,
    },
    /// A mosaic was written.
    Mosaicked {
        /// Mosaic path.
        path: &'a Path,
    },
    /// A raster was clipped and saved.
    Clipped {
        /// Output raster path.
        path: &'a Path,
    },
    /// An item failed.
    ItemFailed {
        /// Human-readable item name.
        item: &'a str,
        /// Failure description.
        error: &'a str,
    },
    /// The batch finished.
    Finished {
        /// Items that succeeded.
        succeeded: usize,
        /// Items that failed.
        failed: usize,
    },
}

impl fmt::Display for ProgressEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Started { total } => write!(f, "Processing {} items", total),
            ProgressEvent::Downloading { url, dest } => {
                write!(f, "Downloading {} to {}", url, dest.display())
            }
            ProgressEvent::TileCached { path } => {
                write!(f, "Using existing tile {}", path.display())
            }
            ProgressEvent::TileExtracted { path } => write!(f, "Extracted {}", path.display()),
            ProgressEvent::Mosaicked { path } => write!(f, "Mosaic saved: {}", path.display()),
            ProgressEvent::Clipped { path } => write!(f, "Clipped and saved: {}", path.display()),
            ProgressEvent::ItemFailed { item, error } => write!(f, "{} failed: {}", item, error),
            ProgressEvent::Finished { succeeded, failed } => {
                write!(f, "Finished: {} succeeded, {} failed", succeeded, failed)
            }
        }
    }
}

/// Callback for progress events.
pub type ProgressCallback = Box<dyn Fn(&ProgressEvent<'_>) + Send + Sync>;

/// Deliver `event` to `callback` if one was supplied.
pub fn emit(callback: Option<&ProgressCallback>, event: ProgressEvent<'_>) {
    if let Some(cb) = callback {
        cb(&event);
    }
}
