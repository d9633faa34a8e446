//! Mosaicking downloaded tiles with an external raster tool.

use rsflow_common::{CommandRunner, ToolCommand, ToolError};
use std::path::{Path, PathBuf};

/// File name of the mosaic written into the output directory.
pub const MOSAIC_FILE_NAME: &str = "SRTM_mosaic.tif";

/// Merges tiles into one raster.
pub trait Mosaicker {
    /// Merge `tiles` into a single raster at `output`.
    fn mosaic(&self, tiles: &[PathBuf], output: &Path) -> Result<(), ToolError>;
}

impl<M: Mosaicker + ?Sized> Mosaicker for &M {
    fn mosaic(&self, tiles: &[PathBuf], output: &Path) -> Result<(), ToolError> {
        (**self).mosaic(tiles, output)
    }
}

impl<M: Mosaicker + ?Sized> Mosaicker for Box<M> {
    fn mosaic(&self, tiles: &[PathBuf], output: &Path) -> Result<(), ToolError> {
        (**self).mosaic(tiles, output)
    }
}

/// [`Mosaicker`] that runs `gdalwarp <tiles...> <output>`.
#[derive(Debug, Clone)]
pub struct GdalMosaicker<R> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> GdalMosaicker<R> {
    /// Use `gdalwarp` from `PATH`.
    pub fn new(runner: R) -> Self {
        Self::with_program(runner, "gdalwarp")
    }

    /// Use a specific `gdalwarp` executable.
    pub fn with_program(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    /// The command that would mosaic `tiles` into `output`.
    pub fn command(&self, tiles: &[PathBuf], output: &Path) -> ToolCommand {
        tiles
            .iter()
            .fold(
                ToolCommand::new(self.program.clone()).arg("-overwrite"),
                |cmd, tile| cmd.path_arg(tile),
            )
            .path_arg(output)
    }
}

impl<R: CommandRunner> Mosaicker for GdalMosaicker<R> {
    fn mosaic(&self, tiles: &[PathBuf], output: &Path) -> Result<(), ToolError> {
        self.runner.run(&self.command(tiles, output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsflow_common::ProcessRunner;

    #[test]
    fn test_gdalwarp_command() {
        let mosaicker = GdalMosaicker::new(ProcessRunner::new());
        let tiles = vec![PathBuf::from("out/N47W118.hgt"), PathBuf::from("out/N48W118.hgt")];
        let cmd = mosaicker.command(&tiles, Path::new("out/SRTM_mosaic.tif"));

        assert_eq!(cmd.program, "gdalwarp");
        assert_eq!(
            cmd.args_lossy(),
            vec![
                "-overwrite",
                "out/N47W118.hgt",
                "out/N48W118.hgt",
                "out/SRTM_mosaic.tif"
            ]
        );
    }
}
