//! SRTM products available from the LP DAAC archive.

use crate::{Result, SrtmError};
use std::fmt;
use std::str::FromStr;

/// Naming scheme used by a product's archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileScheme {
    /// One tile per 1x1 degree cell, named like `N47W118`.
    Fine,
    /// GTOPO30-style tiles covering fixed latitude/longitude bands, named like `W020N10`.
    Coarse,
}

/// An SRTM product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    /// SRTM Global 1 arc-second (~30 m).
    Gl1,
    /// SRTM Global 3 arc-second (~90 m).
    Gl3,
    /// SRTM Global 30 arc-second (~1 km), distributed as `.DEM` files.
    Gl30,
}

impl Product {
    /// All supported products.
    pub const ALL: [Product; 3] = [Product::Gl1, Product::Gl3, Product::Gl30];

    /// Short name as used in archive paths, e.g. `SRTMGL3`.
    pub fn short_name(&self) -> &'static str {
        match self {
            Product::Gl1 => "SRTMGL1",
            Product::Gl3 => "SRTMGL3",
            Product::Gl30 => "SRTMGL30",
        }
    }

    /// Archive collection version.
    pub fn version(&self) -> &'static str {
        match self {
            Product::Gl1 | Product::Gl3 => "003",
            Product::Gl30 => "002",
        }
    }

    /// Tile naming scheme.
    pub fn scheme(&self) -> TileScheme {
        match self {
            Product::Gl1 | Product::Gl3 => TileScheme::Fine,
            Product::Gl30 => TileScheme::Coarse,
        }
    }

    /// Whether downloaded tiles can be mosaicked.
    ///
    /// The coarse `.DEM` tiles are not mosaicked.
    pub fn supports_mosaic(&self) -> bool {
        self.scheme() == TileScheme::Fine
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Product {
    type Err = SrtmError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Product::ALL
            .into_iter()
            .find(|p| p.short_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| SrtmError::UnknownProduct(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product() {
        assert_eq!("SRTMGL3".parse::<Product>().unwrap(), Product::Gl3);
        assert_eq!("srtmgl1".parse::<Product>().unwrap(), Product::Gl1);
        assert_eq!(" SRTMGL30 ".parse::<Product>().unwrap(), Product::Gl30);
        assert!(matches!(
            "SRTMGL2".parse::<Product>(),
            Err(SrtmError::UnknownProduct(name)) if name == "SRTMGL2"
        ));
    }

    #[test]
    fn test_versions_and_schemes() {
        assert_eq!(Product::Gl1.version(), "003");
        assert_eq!(Product::Gl3.version(), "003");
        assert_eq!(Product::Gl30.version(), "002");
        assert_eq!(Product::Gl30.scheme(), TileScheme::Coarse);
        assert!(Product::Gl3.supports_mosaic());
        assert!(!Product::Gl30.supports_mosaic());
    }

    #[test]
    fn test_display_roundtrip() {
        for product in Product::ALL {
            assert_eq!(product.to_string().parse::<Product>().unwrap(), product);
        }
    }
}
