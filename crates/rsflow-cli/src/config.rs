//! YAML configuration.
//!
//! Every key is optional; missing keys take their defaults. Example:
//!
//! ```yaml
//! fetch:
//!   base_url: http://e4ftl01.cr.usgs.gov/SRTM
//!   timeout_secs: 300
//!   username: jdoe
//! tools:
//!   gdalwarp: /usr/local/bin/gdalwarp
//! clip:
//!   suffix: c
//!   nodata: -9999
//! ```

use crate::CliError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RsflowConfig {
    /// Tile download settings.
    pub fetch: FetchSettings,
    /// External tool locations.
    pub tools: ToolSettings,
    /// Clipping settings.
    pub clip: ClipSettings,
}

/// Tile download settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSettings {
    /// Archive root URL.
    pub base_url: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Basic-auth user name.
    pub username: Option<String>,
    /// Basic-auth password. Prefer `RSFLOW_PASSWORD` over storing it here.
    pub password: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            base_url: srtm_fetch::DEFAULT_BASE_URL.to_string(),
            timeout_secs: srtm_fetch::DEFAULT_TIMEOUT.as_secs(),
            username: None,
            password: None,
        }
    }
}

/// External tool locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolSettings {
    /// `gdalwarp` executable, used for mosaicking and clipping.
    pub gdalwarp: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        ToolSettings {
            gdalwarp: "gdalwarp".to_string(),
        }
    }
}

/// Clipping settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClipSettings {
    /// Suffix appended to clipped raster names.
    pub suffix: String,
    /// No-data value written outside the mask.
    pub nodata: Option<f64>,
}

impl Default for ClipSettings {
    fn default() -> Self {
        ClipSettings {
            suffix: raster_clip::DEFAULT_SUFFIX.to_string(),
            nodata: None,
        }
    }
}

impl RsflowConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document is a valid, all-defaults config
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RsflowConfig::default();
        assert_eq!(config.fetch.base_url, "http://e4ftl01.cr.usgs.gov/SRTM");
        assert_eq!(config.fetch.timeout_secs, 120);
        assert_eq!(config.tools.gdalwarp, "gdalwarp");
        assert_eq!(config.clip.suffix, "c");
        assert_eq!(RsflowConfig::from_yaml_str("").unwrap(), config);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = RsflowConfig::from_yaml_str(
            "fetch:\n  timeout_secs: 300\n  username: jdoe\nclip:\n  nodata: -9999\n",
        )
        .unwrap();
        assert_eq!(config.fetch.timeout_secs, 300);
        assert_eq!(config.fetch.username.as_deref(), Some("jdoe"));
        assert_eq!(config.fetch.base_url, "http://e4ftl01.cr.usgs.gov/SRTM");
        assert_eq!(config.clip.nodata, Some(-9999.0));
        assert_eq!(config.clip.suffix, "c");
        assert_eq!(config.tools, ToolSettings::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = RsflowConfig::from_yaml_str("fetch:\n  retries: 3\n").unwrap_err();
        assert!(err.to_string().contains("unknown field"), "got {}", err);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = RsflowConfig::default();
        config.tools.gdalwarp = "/opt/gdal/bin/gdalwarp".to_string();
        let text = serde_yaml::to_string(&config).unwrap();
        assert_eq!(RsflowConfig::from_yaml_str(&text).unwrap(), config);
    }
}
