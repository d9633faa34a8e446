//! Output file naming.

use crate::{ClipError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to clipped raster names.
pub const DEFAULT_SUFFIX: &str = "c";

/// Extensions whose GDAL drivers `gdalwarp` can create directly.
///
/// Drivers such as SRTMHGT, USGSDEM, AAIGrid and JP2OpenJPEG only support
/// CreateCopy, so rasters in those formats are clipped to GeoTIFF.
pub const WARP_WRITABLE_EXTENSIONS: &[&str] = &["tif", "tiff", "img"];

/// Extension of the clipped output for `input`.
pub fn output_extension(input: &Path) -> &str {
    match input.extension().and_then(|e| e.to_str()) {
        Some(ext)
            if WARP_WRITABLE_EXTENSIONS
                .iter()
                .any(|w| ext.eq_ignore_ascii_case(w)) =>
        {
            ext
        }
        _ => "tif",
    }
}

/// Output path for `input`: `{stem}_{suffix}.{ext}` in `outdir`, or next to
/// the input when `outdir` is `None`. `ext` is the input's extension when
/// `gdalwarp` can write it, otherwise `tif`.
///
/// An empty suffix keeps the input's stem unchanged, which is only useful
/// together with a different `outdir`. An output that resolves to the input
/// file itself is rejected with [`ClipError::OutputCollision`]; `outdir`
/// should already exist for that check to see through `.`, `..` and symlinks.
pub fn output_path(input: &Path, outdir: Option<&Path>, suffix: &str) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ClipError::InvalidInput(input.to_path_buf()))?;

    let name = if suffix.is_empty() {
        format!("{}.{}", stem, output_extension(input))
    } else {
        format!("{}_{}.{}", stem, suffix, output_extension(input))
    };

    let dir = match outdir {
        Some(dir) => dir,
        None => input.parent().unwrap_or_else(|| Path::new("")),
    };
    let output = dir.join(name);

    if same_location(&output, input) {
        return Err(ClipError::OutputCollision(output));
    }
    Ok(output)
}

/// Whether two spellings name the same file.
fn same_location(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    if let (Ok(a), Ok(b)) = (fs::canonicalize(a), fs::canonicalize(b)) {
        return a == b;
    }
    if a.file_name() != b.file_name() {
        return false;
    }
    match (canonical_parent(a), canonical_parent(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn canonical_parent(path: &Path) -> Option<PathBuf> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::canonicalize(parent).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_suffix_alongside_input() {
        let out = output_path(Path::new("data/landsat_b4.tif"), None, "c").unwrap();
        assert_eq!(out, PathBuf::from("data/landsat_b4_c.tif"));

        let out = output_path(Path::new("data/scene.IMG"), None, "c").unwrap();
        assert_eq!(out, PathBuf::from("data/scene_c.IMG"));
    }

    #[test]
    fn test_create_copy_formats_become_geotiff() {
        let out = output_path(Path::new("data/N47W118.hgt"), Some(Path::new("clipped")), "c").unwrap();
        assert_eq!(out, PathBuf::from("clipped/N47W118_c.tif"));

        for input in ["w020n10.DEM", "dem.asc", "ortho.jp2", "mosaic.vrt"] {
            let out = output_path(Path::new(input), None, "c").unwrap();
            assert_eq!(out.extension().unwrap(), "tif", "for {}", input);
        }
    }

    #[test]
    fn test_no_extension() {
        let out = output_path(Path::new("raster"), None, "c").unwrap();
        assert_eq!(out, PathBuf::from("raster_c.tif"));
    }

    #[test]
    fn test_collision_rejected() {
        let err = output_path(Path::new("data/a.tif"), Some(Path::new("data")), "").unwrap_err();
        assert!(matches!(err, ClipError::OutputCollision(_)));

        let out = output_path(Path::new("data/a.tif"), Some(Path::new("out")), "").unwrap();
        assert_eq!(out, PathBuf::from("out/a.tif"));
    }

    #[test]
    fn test_collision_through_parent_component() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();
        let input = data.join("a.tif");
        fs::write(&input, b"a").unwrap();
        fs::create_dir(dir.path().join("other")).unwrap();

        let roundabout = dir.path().join("other").join("..").join("data");
        let err = output_path(&input, Some(&roundabout), "").unwrap_err();
        assert!(matches!(err, ClipError::OutputCollision(_)), "got {:?}", err);
    }

    #[test]
    fn test_collision_relative_to_cwd() {
        // Same directory spelled `name` and `./name`
        let cwd = TempDir::new_in(".").unwrap();
        let name = cwd.path().file_name().unwrap().to_str().unwrap().to_string();
        fs::write(cwd.path().join("a.tif"), b"a").unwrap();

        let input = PathBuf::from(&name).join("a.tif");
        let outdir = PathBuf::from(format!("./{}", name));
        let err = output_path(&input, Some(&outdir), "").unwrap_err();
        assert!(matches!(err, ClipError::OutputCollision(_)), "got {:?}", err);
    }

    #[cfg(unix)]
    #[test]
    fn test_collision_through_symlink() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();
        let input = data.join("a.tif");
        fs::write(&input, b"a").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&data, &link).unwrap();

        let err = output_path(&input, Some(&link), "").unwrap_err();
        assert!(matches!(err, ClipError::OutputCollision(_)), "got {:?}", err);
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            output_path(Path::new(".."), None, "c"),
            Err(ClipError::InvalidInput(_))
        ));
    }
}
