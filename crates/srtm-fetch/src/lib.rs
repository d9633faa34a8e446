//! # srtm-fetch
//!
//! Downloader for Shuttle Radar Topography Mission (SRTM) elevation tiles
//! from the LP DAAC archive at `http://e4ftl01.cr.usgs.gov/SRTM/`.
//!
//! ## Overview
//!
//! Given a bounding box and a product, the fetcher enumerates the 1x1 degree
//! tile keys covering the box, downloads each tile archive, extracts the
//! elevation file, deletes the archive, and optionally mosaics the tiles with
//! `gdalwarp`.
//!
//! Supported products:
//! - `SRTMGL1` - 1 arc-second (~30 m), `.hgt` tiles
//! - `SRTMGL3` - 3 arc-second (~90 m), `.hgt` tiles
//! - `SRTMGL30` - 30 arc-second (~1 km), `.DEM` tiles covering large bands;
//!   these are never mosaicked
//!
//! Extracted tiles keep their archive member name (e.g. `N47W118.hgt`), since
//! some GIS packages only read `.hgt` files under their original name.
//!
//! ## Example
//!
//! ```no_run
//! use rsflow_common::ProcessRunner;
//! use srtm_fetch::{
//!     BoundingBox, FetchOutput, FetchRequest, GdalMosaicker, HttpDownloader, Product, SrtmFetcher,
//! };
//!
//! let fetcher = SrtmFetcher::new(HttpDownloader::new()?, GdalMosaicker::new(ProcessRunner::new()));
//!
//! let bbox = BoundingBox::new(47.0, -118.0, 48.0, -118.0)?;
//! let request = FetchRequest::new(bbox, Product::Gl3)
//!     .with_outdir("srtm")
//!     .with_mosaic(true);
//!
//! match fetcher.fetch(&request, None)? {
//!     FetchOutput::Mosaic(path) => println!("Mosaic: {}", path.display()),
//!     FetchOutput::Tiles(paths) => println!("{} tiles", paths.len()),
//! }
//! # Ok::<(), srtm_fetch::SrtmError>(())
//! ```

mod archive;
mod download;
mod error;
mod fetcher;
mod mosaic;
mod product;
mod tile;

pub use archive::extract_member;
pub use download::{Credentials, Downloader, HttpDownloader, DEFAULT_TIMEOUT, EARTHDATA_LOGIN_HOST};
pub use error::SrtmError;
pub use fetcher::{FetchOutput, FetchReport, FetchRequest, SrtmFetcher, DEFAULT_BASE_URL};
pub use mosaic::{GdalMosaicker, Mosaicker, MOSAIC_FILE_NAME};
pub use product::{Product, TileScheme};
pub use tile::{collection_url, BoundingBox, TileKey, TileName};

/// Result type for SRTM operations.
pub type Result<T> = std::result::Result<T, SrtmError>;
