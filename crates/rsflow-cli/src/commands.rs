//! Subcommand runners.

use crate::config::RsflowConfig;
use crate::{ClipArgs, CliError, FetchArgs};
use raster_clip::{BatchClipper, GdalClipper, RasterInput};
use rsflow_common::{BatchPolicy, ProcessRunner, ProgressCallback};
use srtm_fetch::{
    BoundingBox, Credentials, FetchReport, FetchRequest, GdalMosaicker, HttpDownloader,
    SrtmFetcher,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// What a subcommand produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Result paths, in processing order.
    pub outputs: Vec<PathBuf>,
    /// One line per failed item.
    pub failures: Vec<String>,
}

impl Summary {
    /// True when no item failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

fn policy(keep_going: bool) -> BatchPolicy {
    if keep_going {
        BatchPolicy::Continue
    } else {
        BatchPolicy::FailFast
    }
}

/// Download the tiles for `args`, mosaicking them if requested.
pub fn run_fetch(
    args: &FetchArgs,
    config: &RsflowConfig,
    callback: Option<&ProgressCallback>,
) -> Result<Summary, CliError> {
    let bbox = BoundingBox::new(args.ll_lat, args.ll_lon, args.ur_lat, args.ur_lon)?;

    let mut downloader =
        HttpDownloader::with_timeout(Duration::from_secs(config.fetch.timeout_secs))?;
    let username = args.username.clone().or_else(|| config.fetch.username.clone());
    if let Some(username) = username {
        let password = args
            .password
            .clone()
            .or_else(|| config.fetch.password.clone())
            .unwrap_or_default();
        downloader = downloader.with_credentials(Credentials { username, password });
    }

    let mosaicker = GdalMosaicker::with_program(ProcessRunner::new(), &config.tools.gdalwarp);
    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| config.fetch.base_url.clone());
    let fetcher = SrtmFetcher::new(downloader, mosaicker).with_base_url(base_url);
    debug!("{:?}", fetcher);

    let mut request = FetchRequest::new(bbox, args.product)
        .with_mosaic(args.mosaic)
        .with_skip_existing(args.skip_existing)
        .with_policy(policy(args.keep_going));
    if let Some(outdir) = &args.outdir {
        request = request.with_outdir(outdir);
    }

    let report = fetcher.fetch_report(&request, callback)?;
    Ok(fetch_summary(report))
}

/// Flatten a fetch report. A failed mosaic is a failure line, and the tiles
/// it was built from are still listed as outputs.
fn fetch_summary(report: FetchReport) -> Summary {
    let mut summary = Summary {
        failures: report
            .tiles
            .failures()
            .map(|(key, e)| format!("tile {}: {}", key, e))
            .collect(),
        ..Default::default()
    };
    match report.mosaic {
        Some(Ok(path)) => summary.outputs.push(path),
        Some(Err(e)) => {
            summary.failures.push(format!("mosaic: {}", e));
            summary.outputs.extend(report.tiles.successes().map(|(_, p)| p.clone()));
        }
        None => summary.outputs.extend(report.tiles.successes().map(|(_, p)| p.clone())),
    }
    summary
}

/// Clip the rasters named by `args` to the shapefile.
pub fn run_clip(
    args: &ClipArgs,
    config: &RsflowConfig,
    callback: Option<&ProgressCallback>,
) -> Result<Summary, CliError> {
    let input = RasterInput::from_paths(args.inputs.clone());
    let suffix = args
        .suffix
        .clone()
        .unwrap_or_else(|| config.clip.suffix.clone());

    let gdal = GdalClipper::with_program(ProcessRunner::new(), &config.tools.gdalwarp)
        .with_nodata(config.clip.nodata);
    let clipper = BatchClipper::new(gdal)
        .with_suffix(suffix)
        .with_policy(policy(args.keep_going));

    let report = clipper.clip_input(&input, &args.shapefile, args.outdir.as_deref(), callback)?;

    Ok(Summary {
        outputs: report.successes().map(|(_, out)| out.clone()).collect(),
        failures: report
            .failures()
            .map(|(raster, e)| format!("{}: {}", raster.display(), e))
            .collect(),
    })
}
