//! Error types for the SRTM fetcher.

use rsflow_common::ToolError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when fetching SRTM tiles.
#[derive(Debug, Error)]
pub enum SrtmError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error (connection, timeout, body read).
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Failed to download {url}: HTTP {status}")]
    DownloadFailed {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// A URL or redirect target could not be followed.
    #[error("Cannot follow {url}: {reason}")]
    InvalidUrl {
        /// URL as given or as redirected to.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The downloaded file is not a readable zip archive.
    #[error("Invalid archive {path}: {source}")]
    Archive {
        /// Archive path.
        path: PathBuf,
        /// Underlying zip error.
        source: zip::result::ZipError,
    },

    /// The archive does not contain the expected tile member.
    #[error("Archive {archive} has no member named {member}")]
    MissingMember {
        /// Archive path.
        archive: PathBuf,
        /// Expected member name.
        member: String,
    },

    /// External mosaic tool failed.
    #[error("Mosaic failed: {0}")]
    Tool(#[from] ToolError),

    /// Product identifier is not one of the supported SRTM products.
    #[error("Unknown SRTM product '{0}' (expected SRTMGL1, SRTMGL3 or SRTMGL30)")]
    UnknownProduct(String),

    /// Bounding box is malformed.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),
}
