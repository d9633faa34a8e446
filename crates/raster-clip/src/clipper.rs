//! Raster clipping backends.

use crate::Result;
use rsflow_common::{CommandRunner, ToolCommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Clips rasters against a vector mask.
///
/// A full clip is two passes: [`clip_geometry`](RasterClipper::clip_geometry)
/// writes a new raster cut to the mask geometry, then
/// [`extract_by_mask`](RasterClipper::extract_by_mask) narrows that raster to
/// the mask's footprint in place.
pub trait RasterClipper {
    /// Clip `input` to the geometry of `mask`, writing `output`.
    fn clip_geometry(&self, input: &Path, mask: &Path, output: &Path) -> Result<()>;

    /// Set cells of `raster` outside `mask` to no-data, overwriting `raster`.
    fn extract_by_mask(&self, raster: &Path, mask: &Path) -> Result<()>;
}

impl<C: RasterClipper + ?Sized> RasterClipper for &C {
    fn clip_geometry(&self, input: &Path, mask: &Path, output: &Path) -> Result<()> {
        (**self).clip_geometry(input, mask, output)
    }

    fn extract_by_mask(&self, raster: &Path, mask: &Path) -> Result<()> {
        (**self).extract_by_mask(raster, mask)
    }
}

/// [`RasterClipper`] backed by `gdalwarp`.
///
/// - geometry pass: `gdalwarp -overwrite -of <driver> -cutline <mask> -crop_to_cutline <in> <out>`
/// - mask pass: `gdalwarp -overwrite -of <driver> -cutline <mask> [-dstnodata <v>] <raster> <tmp>`,
///   then `<tmp>` is renamed over `<raster>`
///
/// `<driver>` is `HFA` for `.img` outputs and `GTiff` otherwise; see
/// [`output_path`](crate::output_path) for how outputs are named.
#[derive(Debug, Clone)]
pub struct GdalClipper<R> {
    runner: R,
    program: String,
    nodata: Option<f64>,
}

impl<R: CommandRunner> GdalClipper<R> {
    /// Use `gdalwarp` from `PATH`.
    pub fn new(runner: R) -> Self {
        Self::with_program(runner, "gdalwarp")
    }

    /// Use a specific `gdalwarp` executable.
    pub fn with_program(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
            nodata: None,
        }
    }

    /// No-data value written outside the mask in the second pass.
    pub fn with_nodata(mut self, nodata: Option<f64>) -> Self {
        self.nodata = nodata;
        self
    }

    /// Command for the geometry pass.
    pub fn geometry_command(&self, input: &Path, mask: &Path, output: &Path) -> ToolCommand {
        ToolCommand::new(self.program.clone())
            .arg("-overwrite")
            .arg("-of")
            .arg(driver_for(output))
            .arg("-cutline")
            .path_arg(mask)
            .arg("-crop_to_cutline")
            .path_arg(input)
            .path_arg(output)
    }

    /// Command for the mask pass, writing to `scratch`.
    pub fn mask_command(&self, raster: &Path, mask: &Path, scratch: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.program.clone())
            .arg("-overwrite")
            .arg("-of")
            .arg(driver_for(raster))
            .arg("-cutline")
            .path_arg(mask);
        if let Some(nodata) = self.nodata {
            cmd = cmd.arg("-dstnodata").arg(nodata.to_string());
        }
        cmd.path_arg(raster).path_arg(scratch)
    }
}

/// GDAL output driver for a clipped raster path.
fn driver_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("img") => "HFA",
        _ => "GTiff",
    }
}

/// Scratch file next to `raster`, keeping its extension.
pub fn scratch_path(raster: &Path) -> PathBuf {
    let stem = raster
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match raster.extension() {
        Some(ext) => format!(".{}.masking.{}", stem, ext.to_string_lossy()),
        None => format!(".{}.masking", stem),
    };
    raster.with_file_name(name)
}

impl<R: CommandRunner> RasterClipper for GdalClipper<R> {
    fn clip_geometry(&self, input: &Path, mask: &Path, output: &Path) -> Result<()> {
        self.runner.run(&self.geometry_command(input, mask, output))?;
        Ok(())
    }

    fn extract_by_mask(&self, raster: &Path, mask: &Path) -> Result<()> {
        let scratch = scratch_path(raster);

        if let Err(e) = self.runner.run(&self.mask_command(raster, mask, &scratch)) {
            let _ = fs::remove_file(&scratch);
            return Err(e.into());
        }

        debug!("Replacing {} with masked output", raster.display());
        if let Err(e) = fs::rename(&scratch, raster) {
            let _ = fs::remove_file(&scratch);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsflow_common::ProcessRunner;

    #[test]
    fn test_geometry_command() {
        let clipper = GdalClipper::new(ProcessRunner::new());
        let cmd = clipper.geometry_command(
            Path::new("in/a.tif"),
            Path::new("aoi.shp"),
            Path::new("out/a_c.tif"),
        );
        assert_eq!(
            cmd.to_string(),
            "gdalwarp -overwrite -of GTiff -cutline aoi.shp -crop_to_cutline in/a.tif out/a_c.tif"
        );
    }

    #[test]
    fn test_mask_command_with_nodata() {
        let clipper = GdalClipper::with_program(ProcessRunner::new(), "/opt/gdal/bin/gdalwarp")
            .with_nodata(Some(-9999.0));
        let cmd = clipper.mask_command(
            Path::new("out/a_c.tif"),
            Path::new("aoi.shp"),
            &scratch_path(Path::new("out/a_c.tif")),
        );
        assert_eq!(cmd.program, "/opt/gdal/bin/gdalwarp");
        assert_eq!(
            cmd.args_lossy(),
            vec![
                "-overwrite",
                "-of",
                "GTiff",
                "-cutline",
                "aoi.shp",
                "-dstnodata",
                "-9999",
                "out/a_c.tif",
                "out/.a_c.masking.tif"
            ]
        );
    }

    #[test]
    fn test_img_outputs_use_hfa() {
        let clipper = GdalClipper::new(ProcessRunner::new());
        let cmd = clipper.geometry_command(
            Path::new("in/scene.img"),
            Path::new("aoi.shp"),
            Path::new("out/scene_c.img"),
        );
        assert_eq!(&cmd.args_lossy()[..3], ["-overwrite", "-of", "HFA"]);
    }

    #[test]
    fn test_scratch_path() {
        assert_eq!(
            scratch_path(Path::new("x/N47W118_c.tif")),
            PathBuf::from("x/.N47W118_c.masking.tif")
        );
        assert_eq!(scratch_path(Path::new("x/raw")), PathBuf::from("x/.raw.masking"));
    }
}
