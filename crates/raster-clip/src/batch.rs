//! Batch clipping of rasters to a shapefile.

use crate::clipper::RasterClipper;
use crate::inputs::RasterInput;
use crate::naming::{output_path, DEFAULT_SUFFIX};
use crate::{ClipError, Result};
use rsflow_common::{emit, BatchPolicy, BatchReport, ProgressCallback, ProgressEvent};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Per-input clip outcomes, keyed by input path.
pub type ClipReport = BatchReport<PathBuf, PathBuf, ClipError>;

/// Clips a list of rasters to one shapefile through a [`RasterClipper`].
#[derive(Debug, Clone)]
pub struct BatchClipper<C> {
    clipper: C,
    suffix: String,
    policy: BatchPolicy,
}

impl<C: RasterClipper> BatchClipper<C> {
    /// Create a batch clipper with the default `c` suffix and fail-fast policy.
    pub fn new(clipper: C) -> Self {
        Self {
            clipper,
            suffix: DEFAULT_SUFFIX.to_string(),
            policy: BatchPolicy::default(),
        }
    }

    /// Set the output name suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set the failure policy.
    pub fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Output path for `input`.
    pub fn output_path(&self, input: &Path, outdir: Option<&Path>) -> Result<PathBuf> {
        output_path(input, outdir, &self.suffix)
    }

    /// Resolve `input` and clip every raster it names.
    pub fn clip_input(
        &self,
        input: &RasterInput,
        shapefile: &Path,
        outdir: Option<&Path>,
        callback: Option<&ProgressCallback>,
    ) -> Result<ClipReport> {
        let rasters = input.resolve()?;
        self.clip(&rasters, shapefile, outdir, callback)
    }

    /// Clip every raster and return the output paths in input order, or the
    /// first failure.
    pub fn clip_all(
        &self,
        rasters: &[PathBuf],
        shapefile: &Path,
        outdir: Option<&Path>,
        callback: Option<&ProgressCallback>,
    ) -> Result<Vec<PathBuf>> {
        self.clip(rasters, shapefile, outdir, callback)?.into_result()
    }

    /// Clip every raster and report each one's outcome.
    ///
    /// Only request-level problems (missing shapefile, uncreatable output
    /// directory) are returned as `Err`.
    pub fn clip(
        &self,
        rasters: &[PathBuf],
        shapefile: &Path,
        outdir: Option<&Path>,
        callback: Option<&ProgressCallback>,
    ) -> Result<ClipReport> {
        if !shapefile.is_file() {
            return Err(ClipError::MissingInput(shapefile.to_path_buf()));
        }
        if let Some(dir) = outdir {
            fs::create_dir_all(dir)?;
        }

        emit(callback, ProgressEvent::Started { total: rasters.len() });

        // Inputs and earlier outputs must not be overwritten by a later output
        let mut claimed: HashSet<PathBuf> = rasters.iter().cloned().collect();

        let mut report = BatchReport::new(self.policy);
        for raster in rasters {
            let result = self.clip_one(raster, shapefile, outdir, &mut claimed);
            match &result {
                Ok(output) => {
                    info!("Clipped and saved: {}", output.display());
                    emit(callback, ProgressEvent::Clipped { path: output });
                }
                Err(e) => {
                    warn!("Clipping {} failed: {}", raster.display(), e);
                    emit(
                        callback,
                        ProgressEvent::ItemFailed {
                            item: &raster.display().to_string(),
                            error: &e.to_string(),
                        },
                    );
                }
            }
            if !report.record(raster.clone(), result) {
                break;
            }
        }

        let failed = report.failure_count();
        emit(
            callback,
            ProgressEvent::Finished {
                succeeded: report.len() - failed,
                failed,
            },
        );

        Ok(report)
    }

    fn clip_one(
        &self,
        raster: &Path,
        shapefile: &Path,
        outdir: Option<&Path>,
        claimed: &mut HashSet<PathBuf>,
    ) -> Result<PathBuf> {
        if !raster.is_file() {
            return Err(ClipError::MissingInput(raster.to_path_buf()));
        }
        let output = self.output_path(raster, outdir)?;
        if !claimed.insert(output.clone()) {
            return Err(ClipError::OutputCollision(output));
        }

        self.clipper.clip_geometry(raster, shapefile, &output)?;
        self.clipper.extract_by_mask(&output, shapefile)?;

        Ok(output)
    }
}
