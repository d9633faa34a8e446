//! Tile archive extraction.

use crate::{Result, SrtmError};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

/// Extract the single member `member` from the zip at `archive` into `outdir`.
///
/// The archive is deleted afterwards whether or not extraction succeeded.
/// Returns the path of the extracted file, `outdir/member`.
pub fn extract_member(archive: &Path, member: &str, outdir: &Path) -> Result<PathBuf> {
    let result = extract_inner(archive, member, outdir);

    if let Err(e) = fs::remove_file(archive) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!("Failed to remove archive {}: {}", archive.display(), e);
            if result.is_ok() {
                return Err(e.into());
            }
        }
    }

    result
}

fn extract_inner(archive: &Path, member: &str, outdir: &Path) -> Result<PathBuf> {
    let file = fs::File::open(archive)?;
    let mut zip = ZipArchive::new(file).map_err(|source| SrtmError::Archive {
        path: archive.to_path_buf(),
        source,
    })?;

    let mut entry = match zip.by_name(member) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(SrtmError::MissingMember {
                archive: archive.to_path_buf(),
                member: member.to_string(),
            })
        }
        Err(source) => {
            return Err(SrtmError::Archive {
                path: archive.to_path_buf(),
                source,
            })
        }
    };

    let out_path = outdir.join(member);
    let scratch = outdir.join(format!(".{}.partial", member));
    let written = match copy_entry(&mut entry, archive, &scratch) {
        Ok(written) => written,
        Err(e) => {
            let _ = fs::remove_file(&scratch);
            return Err(e);
        }
    };
    if let Err(e) = fs::rename(&scratch, &out_path) {
        let _ = fs::remove_file(&scratch);
        return Err(e.into());
    }
    debug!("Extracted {} ({} bytes) from {}", member, written, archive.display());

    Ok(out_path)
}

/// Stream `entry` into `dest`. Read failures (bad CRC, corrupt deflate
/// stream) are archive errors; write failures are I/O errors.
fn copy_entry<R: Read>(entry: &mut R, archive: &Path, dest: &Path) -> Result<u64> {
    let mut out = fs::File::create(dest)?;
    let mut buf = [0u8; 64 * 1024];
    let mut written = 0u64;
    loop {
        let n = match entry.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(SrtmError::Archive {
                    path: archive.to_path_buf(),
                    source: ZipError::Io(e),
                })
            }
        };
        out.write_all(&buf[..n])?;
        written += n as u64;
    }
    out.flush()?;
    Ok(written)
}
