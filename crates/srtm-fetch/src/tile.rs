//! Tile keys and archive naming.
//!
//! ## Naming convention
//!
//! Fine products (`SRTMGL1`, `SRTMGL3`) have one archive per 1x1 degree cell,
//! keyed by the cell's lower-left corner:
//!
//! - remote file: `N47W118.SRTMGL3.hgt.zip`
//! - archive member: `N47W118.hgt`
//!
//! The coarse product (`SRTMGL30`) covers fixed bands. A key's latitude is
//! quantized by magnitude to 10, 40 or 90 and its longitude to 20, 60, 100 or
//! 140, with hemisphere letters taken from the signs of the unquantized key:
//!
//! - remote file: `w020n10.SRTMGL30.dem.zip` (lower-case letters)
//! - archive member: `W020N10.DEM` (longitude first, upper case)

use crate::product::{Product, TileScheme};
use crate::{Result, SrtmError};
use std::fmt;

/// Acquisition date directory shared by every SRTM collection.
const ACQUISITION_DIR: &str = "2000.02.11";

/// Latitude band edges for the coarse product.
const COARSE_LAT_BANDS: [u32; 3] = [10, 40, 90];

/// Longitude band edges for the coarse product.
const COARSE_LON_BANDS: [u32; 4] = [20, 60, 100, 140];

/// A bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Latitude of the lower-left corner.
    pub ll_lat: f64,
    /// Longitude of the lower-left corner.
    pub ll_lon: f64,
    /// Latitude of the upper-right corner.
    pub ur_lat: f64,
    /// Longitude of the upper-right corner.
    pub ur_lon: f64,
}

impl BoundingBox {
    /// Create a validated bounding box.
    pub fn new(ll_lat: f64, ll_lon: f64, ur_lat: f64, ur_lon: f64) -> Result<Self> {
        let bbox = Self {
            ll_lat,
            ll_lon,
            ur_lat,
            ur_lon,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Check that the corners are finite, in range, and ordered.
    pub fn validate(&self) -> Result<()> {
        let values = [self.ll_lat, self.ll_lon, self.ur_lat, self.ur_lon];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SrtmError::InvalidBoundingBox(format!(
                "non-finite coordinate in {:?}",
                values
            )));
        }
        for lat in [self.ll_lat, self.ur_lat] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(SrtmError::InvalidBoundingBox(format!(
                    "latitude {} outside [-90, 90]",
                    lat
                )));
            }
        }
        for lon in [self.ll_lon, self.ur_lon] {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(SrtmError::InvalidBoundingBox(format!(
                    "longitude {} outside [-180, 180]",
                    lon
                )));
            }
        }
        if self.ll_lat > self.ur_lat || self.ll_lon > self.ur_lon {
            return Err(SrtmError::InvalidBoundingBox(format!(
                "lower-left ({}, {}) is not below/left of upper-right ({}, {})",
                self.ll_lat, self.ll_lon, self.ur_lat, self.ur_lon
            )));
        }
        Ok(())
    }

    /// All tile keys covering the box, latitude-major.
    ///
    /// Every integer latitude in `[floor(ll_lat), floor(ur_lat)]` is paired with
    /// every integer longitude in `[floor(ll_lon), floor(ur_lon)]`.
    pub fn tile_keys(&self) -> Vec<TileKey> {
        let lat_min = self.ll_lat.floor() as i32;
        let lat_max = self.ur_lat.floor() as i32;
        let lon_min = self.ll_lon.floor() as i32;
        let lon_max = self.ur_lon.floor() as i32;

        let mut keys = Vec::new();
        for lat in lat_min..=lat_max {
            for lon in lon_min..=lon_max {
                keys.push(TileKey { lat, lon });
            }
        }
        keys
    }
}

/// Tile key: integer latitude and longitude of the tile's lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    /// Latitude (negative is south).
    pub lat: i32,
    /// Longitude (negative is west).
    pub lon: i32,
}

impl TileKey {
    /// Create a tile key.
    pub fn new(lat: i32, lon: i32) -> Self {
        Self { lat, lon }
    }

    /// `'N'` for latitudes >= 0, otherwise `'S'`.
    pub fn lat_hemisphere(&self) -> char {
        if self.lat >= 0 {
            'N'
        } else {
            'S'
        }
    }

    /// `'E'` for longitudes >= 0, otherwise `'W'`.
    pub fn lon_hemisphere(&self) -> char {
        if self.lon >= 0 {
            'E'
        } else {
            'W'
        }
    }

    /// Archive names for this key under `product`.
    pub fn name(&self, product: Product) -> TileName {
        let ns = self.lat_hemisphere();
        let ew = self.lon_hemisphere();

        match product.scheme() {
            TileScheme::Fine => {
                let stem = format!(
                    "{}{:02}{}{:03}",
                    ns,
                    self.lat.unsigned_abs(),
                    ew,
                    self.lon.unsigned_abs()
                );
                TileName {
                    remote_file: format!("{}.{}.hgt.zip", stem, product.short_name()),
                    member: format!("{}.hgt", stem),
                }
            }
            TileScheme::Coarse => {
                let lat = coarse_band(self.lat, &COARSE_LAT_BANDS);
                let lon = coarse_band(self.lon, &COARSE_LON_BANDS);
                TileName {
                    remote_file: format!(
                        "{}{:03}{}{:02}.{}.dem.zip",
                        ew.to_ascii_lowercase(),
                        lon,
                        ns.to_ascii_lowercase(),
                        lat,
                        product.short_name()
                    ),
                    member: format!("{}{:03}{}{:02}.DEM", ew, lon, ns, lat),
                }
            }
        }
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// Smallest band edge that encloses `|value|`, or the last edge.
fn coarse_band(value: i32, bands: &[u32]) -> u32 {
    let magnitude = value.unsigned_abs();
    bands
        .iter()
        .copied()
        .find(|&edge| magnitude <= edge)
        .unwrap_or(bands[bands.len() - 1])
}

/// Remote and local names of one tile archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileName {
    /// File name of the archive on the server.
    pub remote_file: String,
    /// Name of the elevation file inside the archive.
    pub member: String,
}

impl TileName {
    /// Download URL under `base_url` (e.g. `http://e4ftl01.cr.usgs.gov/SRTM`).
    pub fn url(&self, base_url: &str, product: Product) -> String {
        format!(
            "{}/{}",
            collection_url(base_url, product),
            self.remote_file
        )
    }
}

/// Directory URL holding every archive of `product`.
pub fn collection_url(base_url: &str, product: Product) -> String {
    format!(
        "{}/{}.{}/{}",
        base_url.trim_end_matches('/'),
        product.short_name(),
        product.version(),
        ACQUISITION_DIR
    )
}
