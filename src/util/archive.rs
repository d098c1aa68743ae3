//! Archive extraction helpers.
//!
//! The embeddable interpreter and the uv release for Windows ship as zip
//! files; the uv release for other hosts ships as tar.gz. Compression of the
//! finished environment is delegated to the external 7-Zip binary instead
//! (see `ops::pack`).

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;

use crate::util::fs::ensure_dir;

/// Extract the full contents of a zip archive into `dest`.
pub fn extract_zip(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)
        .with_context(|| format!("failed to open archive: {}", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("failed to read zip archive: {}", archive_path.display()))?;

    ensure_dir(dest)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        // Entries with `..` components or absolute paths are rejected.
        let Some(relative) = entry.enclosed_name() else {
            bail!(
                "archive {} contains an unsafe entry name: {}",
                archive_path.display(),
                entry.name()
            );
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            ensure_dir(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                ensure_dir(parent)?;
            }
            let mut out_file = fs::File::create(&out_path)
                .with_context(|| format!("failed to create {}", out_path.display()))?;
            io::copy(&mut entry, &mut out_file)?;
        }
    }

    Ok(())
}

/// Extract the full contents of a tar.gz archive into `dest`.
pub fn extract_tar_gz(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)
        .with_context(|| format!("failed to open archive: {}", archive_path.display()))?;
    let decoder = GzDecoder::new(file);
    let mut archive = tar::Archive::new(decoder);

    ensure_dir(dest)?;
    archive
        .unpack(dest)
        .with_context(|| format!("failed to unpack {}", archive_path.display()))?;

    Ok(())
}

/// Extract an archive into `dest`, dispatching on the file extension.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<()> {
    let name = archive_path.to_string_lossy();
    if name.ends_with(".zip") {
        extract_zip(archive_path, dest)
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        extract_tar_gz(archive_path, dest)
    } else {
        bail!("unsupported archive format: {}", archive_path.display())
    }
}
