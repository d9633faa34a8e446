//! # raster-clip
//!
//! Batch clipping of rasters to a vector boundary.
//!
//! Each raster is clipped twice: a geometry pass that cuts it to the
//! shapefile's geometry into a new file, followed by a mask pass that narrows
//! that file to the mask's footprint in place. Outputs are named
//! `{stem}_c.{ext}` and placed in an output directory, or next to the input.
//!
//! ```no_run
//! use raster_clip::{BatchClipper, GdalClipper, RasterInput};
//! use rsflow_common::ProcessRunner;
//! use std::path::Path;
//!
//! let clipper = BatchClipper::new(GdalClipper::new(ProcessRunner::new()));
//! let input = RasterInput::from_path("landsat");
//! let report = clipper.clip_input(&input, Path::new("aoi.shp"), Some(Path::new("clipped")), None)?;
//! for (input, output) in report.successes() {
//!     println!("{} -> {}", input.display(), output.display());
//! }
//! # Ok::<(), raster_clip::ClipError>(())
//! ```

mod batch;
mod clipper;
mod error;
mod inputs;
mod naming;

pub use batch::{BatchClipper, ClipReport};
pub use clipper::{scratch_path, GdalClipper, RasterClipper};
pub use error::ClipError;
pub use inputs::{is_raster, RasterInput, RASTER_EXTENSIONS};
pub use naming::{output_path, DEFAULT_SUFFIX};

/// Result type for clipping operations.
pub type Result<T> = std::result::Result<T, ClipError>;
