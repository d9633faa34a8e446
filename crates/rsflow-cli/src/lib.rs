//! # rsflow-cli
//!
//! Command-line front end for the rsflow tools. The binary is `rsflow`:
//!
//! ```text
//! rsflow fetch --ll-lat 47 --ll-lon -118 --ur-lat 48 --ur-lon -117 --product SRTMGL3 --mosaic
//! rsflow clip --shapefile aoi.shp --outdir clipped scenes/
//! ```
//!
//! The argument types and command runners live here so they can be tested
//! without spawning the binary.

pub mod commands;
pub mod config;
mod error;

pub use commands::{run_clip, run_fetch, Summary};
pub use config::RsflowConfig;
pub use error::CliError;

use clap::{ArgAction, Args, Parser, Subcommand};
use srtm_fetch::Product;
use std::path::PathBuf;

/// Remote-sensing data utilities: SRTM tile download and batch raster clipping.
#[derive(Debug, Parser)]
#[command(name = "rsflow", author, version, about, long_about = None)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress messages on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download SRTM tiles covering a bounding box
    Fetch(FetchArgs),
    /// Clip rasters to a shapefile boundary
    Clip(ClipArgs),
}

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Latitude of the lower-left corner
    #[arg(long, allow_hyphen_values = true)]
    pub ll_lat: f64,
    /// Longitude of the lower-left corner
    #[arg(long, allow_hyphen_values = true)]
    pub ll_lon: f64,
    /// Latitude of the upper-right corner
    #[arg(long, allow_hyphen_values = true)]
    pub ur_lat: f64,
    /// Longitude of the upper-right corner
    #[arg(long, allow_hyphen_values = true)]
    pub ur_lon: f64,

    /// SRTMGL1, SRTMGL3 or SRTMGL30
    #[arg(short, long, default_value = "SRTMGL3")]
    pub product: Product,

    /// Directory for extracted tiles (default: current directory)
    #[arg(short, long)]
    pub outdir: Option<PathBuf>,

    /// Mosaic the tiles into SRTM_mosaic.tif (ignored for SRTMGL30)
    #[arg(short, long)]
    pub mosaic: bool,

    /// Reuse tiles already present in the output directory
    #[arg(long)]
    pub skip_existing: bool,

    /// Keep downloading after a tile fails
    #[arg(short = 'k', long)]
    pub keep_going: bool,

    /// Archive root URL (overrides the config file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Basic-auth user name (overrides the config file)
    #[arg(long)]
    pub username: Option<String>,

    /// Basic-auth password
    #[arg(long, env = "RSFLOW_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ClipArgs {
    /// Polygon shapefile to clip to
    #[arg(short, long)]
    pub shapefile: PathBuf,

    /// Directory for clipped rasters (default: next to each input)
    #[arg(short, long)]
    pub outdir: Option<PathBuf>,

    /// Suffix appended to output names (overrides the config file)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Keep clipping after a raster fails
    #[arg(short = 'k', long)]
    pub keep_going: bool,

    /// Raster files, or a single directory of rasters
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fetch_args_accept_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "rsflow", "fetch", "--ll-lat", "-33.5", "--ll-lon", "-71", "--ur-lat", "-33",
            "--ur-lon", "-70", "-p", "srtmgl1", "--mosaic",
        ])
        .unwrap();
        match cli.command {
            Command::Fetch(args) => {
                assert_eq!(args.ll_lat, -33.5);
                assert_eq!(args.ll_lon, -71.0);
                assert_eq!(args.product, Product::Gl1);
                assert!(args.mosaic);
                assert!(!args.keep_going);
            }
            other => panic!("expected fetch, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_product_rejected() {
        let err = Cli::try_parse_from([
            "rsflow", "fetch", "--ll-lat", "1", "--ll-lon", "1", "--ur-lat", "2", "--ur-lon",
            "2", "--product", "SRTMGL2",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("SRTMGL2"));
    }

    #[test]
    fn test_clip_requires_inputs() {
        assert!(Cli::try_parse_from(["rsflow", "clip", "--shapefile", "aoi.shp"]).is_err());

        let cli = Cli::try_parse_from([
            "rsflow", "-vv", "clip", "-s", "aoi.shp", "--suffix", "aoi", "a.tif", "b.tif",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Clip(args) => {
                assert_eq!(args.inputs, vec![PathBuf::from("a.tif"), PathBuf::from("b.tif")]);
                assert_eq!(args.suffix.as_deref(), Some("aoi"));
            }
            other => panic!("expected clip, got {:?}", other),
        }
    }
}
