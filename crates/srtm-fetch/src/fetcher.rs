//! SRTM tile fetcher.
//!
//! Downloads every tile archive covering a bounding box, extracts the
//! elevation file from each archive, deletes the archive, and optionally
//! merges the extracted tiles into one mosaic.
//!
//! Tiles are processed one at a time in latitude-major order. There are no
//! retries; a failed tile is recorded in the [`FetchReport`] and, under
//! [`BatchPolicy::FailFast`], ends the batch.

use crate::archive::extract_member;
use crate::download::Downloader;
use crate::mosaic::{Mosaicker, MOSAIC_FILE_NAME};
use crate::product::Product;
use crate::tile::{collection_url, BoundingBox, TileKey, TileName};
use crate::{Result, SrtmError};
use rsflow_common::{emit, BatchPolicy, BatchReport, ProgressCallback, ProgressEvent};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default archive root.
pub const DEFAULT_BASE_URL: &str = "http://e4ftl01.cr.usgs.gov/SRTM";

/// What to fetch and where to put it.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Area to cover.
    pub bbox: BoundingBox,
    /// Product to download.
    pub product: Product,
    /// Output directory. `None` means the current directory.
    pub outdir: Option<PathBuf>,
    /// Merge the tiles into `SRTM_mosaic.tif`. Ignored for products that
    /// don't support mosaicking.
    pub mosaic: bool,
    /// Reuse tiles already extracted in the output directory.
    pub skip_existing: bool,
    /// Behavior when a tile fails.
    pub policy: BatchPolicy,
}

impl FetchRequest {
    /// Request `product` tiles for `bbox` into the current directory.
    pub fn new(bbox: BoundingBox, product: Product) -> Self {
        Self {
            bbox,
            product,
            outdir: None,
            mosaic: false,
            skip_existing: false,
            policy: BatchPolicy::default(),
        }
    }

    /// Set the output directory.
    pub fn with_outdir(mut self, outdir: impl Into<PathBuf>) -> Self {
        self.outdir = Some(outdir.into());
        self
    }

    /// Request a mosaic.
    pub fn with_mosaic(mut self, mosaic: bool) -> Self {
        self.mosaic = mosaic;
        self
    }

    /// Reuse already-extracted tiles.
    pub fn with_skip_existing(mut self, skip_existing: bool) -> Self {
        self.skip_existing = skip_existing;
        self
    }

    /// Set the failure policy.
    pub fn with_policy(mut self, policy: BatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether a mosaic will actually be produced.
    pub fn mosaic_enabled(&self) -> bool {
        self.mosaic && self.product.supports_mosaic()
    }

    /// Distinct archives to fetch, in tile-key order.
    ///
    /// Coarse-product keys that map to the same archive appear once.
    pub fn tiles(&self) -> Vec<(TileKey, TileName)> {
        let mut seen = HashSet::new();
        self.bbox
            .tile_keys()
            .into_iter()
            .map(|key| (key, key.name(self.product)))
            .filter(|(_, name)| seen.insert(name.remote_file.clone()))
            .collect()
    }
}

/// Result of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutput {
    /// Paths of the extracted tiles, in tile-key order.
    Tiles(Vec<PathBuf>),
    /// Path of the mosaic built from all tiles.
    Mosaic(PathBuf),
}

impl FetchOutput {
    /// All paths in the output.
    pub fn paths(&self) -> Vec<PathBuf> {
        match self {
            FetchOutput::Tiles(paths) => paths.clone(),
            FetchOutput::Mosaic(path) => vec![path.clone()],
        }
    }
}

/// Per-tile outcomes of a fetch, plus the mosaic outcome if one was attempted.
#[derive(Debug)]
pub struct FetchReport {
    /// One entry per attempted tile archive.
    pub tiles: BatchReport<TileKey, PathBuf, SrtmError>,
    /// `Some` when a mosaic was attempted.
    pub mosaic: Option<Result<PathBuf>>,
}

impl FetchReport {
    /// Collapse into all-or-nothing form.
    ///
    /// A mosaic outcome takes precedence; otherwise the tile paths, or the
    /// first tile error.
    pub fn into_output(self) -> Result<FetchOutput> {
        if let Some(mosaic) = self.mosaic {
            return mosaic.map(FetchOutput::Mosaic);
        }
        self.tiles.into_result().map(FetchOutput::Tiles)
    }
}

/// Fetches SRTM tiles through a [`Downloader`] and mosaics through a [`Mosaicker`].
pub struct SrtmFetcher<D, M> {
    downloader: D,
    mosaicker: M,
    base_url: String,
}

impl<D, M> std::fmt::Debug for SrtmFetcher<D, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SrtmFetcher")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl<D: Downloader, M: Mosaicker> SrtmFetcher<D, M> {
    /// Create a fetcher against the default archive root.
    pub fn new(downloader: D, mosaicker: M) -> Self {
        Self {
            downloader,
            mosaicker,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Use a different archive root (a mirror, or a local test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The archive root.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch all tiles, returning the tile paths or the mosaic path.
    ///
    /// Fails with the first tile error, or the mosaic error.
    pub fn fetch(
        &self,
        request: &FetchRequest,
        callback: Option<&ProgressCallback>,
    ) -> Result<FetchOutput> {
        self.fetch_report(request, callback)?.into_output()
    }

    /// Fetch all tiles and report each tile's outcome.
    ///
    /// Only request-level problems (an invalid bounding box, an uncreatable
    /// output directory) are returned as `Err`.
    pub fn fetch_report(
        &self,
        request: &FetchRequest,
        callback: Option<&ProgressCallback>,
    ) -> Result<FetchReport> {
        request.bbox.validate()?;

        let product = request.product;
        let outdir = request.outdir.clone().unwrap_or_default();
        if !outdir.as_os_str().is_empty() {
            fs::create_dir_all(&outdir)?;
        }

        if request.mosaic && !product.supports_mosaic() {
            warn!("Mosaicking is not supported for {}, returning tiles only", product);
        }

        let tiles = request.tiles();
        debug!(
            "Tile keys: {:?}",
            tiles.iter().map(|(key, _)| *key).collect::<Vec<_>>()
        );
        info!(
            "Connecting to host at {}",
            collection_url(&self.base_url, product)
        );
        emit(callback, ProgressEvent::Started { total: tiles.len() });

        let mut report = BatchReport::new(request.policy);
        for (key, name) in tiles {
            let result = self.fetch_tile(&name, product, &outdir, request.skip_existing, callback);
            if let Err(e) = &result {
                warn!("Tile {} ({}) failed: {}", key, name.remote_file, e);
                emit(
                    callback,
                    ProgressEvent::ItemFailed {
                        item: &name.remote_file,
                        error: &e.to_string(),
                    },
                );
            }
            if !report.record(key, result) {
                break;
            }
        }

        let failed = report.failure_count();
        info!(
            "Finished download and extraction of {} data: {} tiles, {} failed",
            product,
            report.len() - failed,
            failed
        );
        emit(
            callback,
            ProgressEvent::Finished {
                succeeded: report.len() - failed,
                failed,
            },
        );

        let mosaic = if !request.mosaic_enabled() {
            None
        } else if !report.is_complete_success() {
            warn!("Skipping mosaic because not every tile was fetched");
            None
        } else {
            Some(self.build_mosaic(&report, &outdir, callback))
        };

        Ok(FetchReport {
            tiles: report,
            mosaic,
        })
    }

    /// Download and extract one tile archive.
    fn fetch_tile(
        &self,
        name: &TileName,
        product: Product,
        outdir: &Path,
        skip_existing: bool,
        callback: Option<&ProgressCallback>,
    ) -> Result<PathBuf> {
        let tile_path = outdir.join(&name.member);
        if skip_existing && tile_path.is_file() {
            debug!("Tile {} already present", tile_path.display());
            emit(callback, ProgressEvent::TileCached { path: &tile_path });
            return Ok(tile_path);
        }

        let url = name.url(&self.base_url, product);
        let archive_path = outdir.join(&name.remote_file);

        info!("Downloading and extracting {}", name.remote_file);
        emit(
            callback,
            ProgressEvent::Downloading {
                url: &url,
                dest: &archive_path,
            },
        );

        if let Err(e) = self.downloader.download(&url, &archive_path) {
            // Don't leave a truncated archive behind
            let _ = fs::remove_file(&archive_path);
            return Err(e);
        }

        let path = extract_member(&archive_path, &name.member, outdir)?;
        emit(callback, ProgressEvent::TileExtracted { path: &path });
        Ok(path)
    }

    fn build_mosaic(
        &self,
        report: &BatchReport<TileKey, PathBuf, SrtmError>,
        outdir: &Path,
        callback: Option<&ProgressCallback>,
    ) -> Result<PathBuf> {
        let tiles: Vec<PathBuf> = report.successes().map(|(_, path)| path.clone()).collect();
        let output = outdir.join(MOSAIC_FILE_NAME);

        info!("Mosaicking {} tiles into {}", tiles.len(), output.display());
        self.mosaicker.mosaic(&tiles, &output)?;
        emit(callback, ProgressEvent::Mosaicked { path: &output });

        Ok(output)
    }
}
