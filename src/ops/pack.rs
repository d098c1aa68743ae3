//! Archive stage.
//!
//! Compresses the assembled environment with an external 7-Zip binary. Any
//! stale archive at the target path is deleted first; the result is trusted
//! to the tool's exit code, no checksum is taken afterwards.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::config::BuildPaths;
use crate::util::fs::remove_file_if_exists;
use crate::util::process::find_executable;
use crate::util::ProcessBuilder;

/// Compress `source` into `archive` using 7-Zip.
pub fn pack_dir(paths: &BuildPaths, source: &Path, archive: &Path) -> Result<()> {
    if !source.exists() {
        bail!(
            "nothing to pack: {} does not exist (run `envpack install` first)",
            source.display()
        );
    }

    let seven_zip = find_seven_zip(&paths.resources_dir)?;

    // Delete-then-recreate; 7-Zip would otherwise update the existing
    // archive in place.
    remove_file_if_exists(archive)?;

    tracing::info!("compressing {} into {}", source.display(), archive.display());
    ProcessBuilder::new(&seven_zip)
        .arg("a")
        .arg(archive)
        .arg(source)
        .status_and_check()?;

    tracing::info!("created {}", archive.display());
    Ok(())
}

/// Compress the installed offline environment into the platform-named
/// archive.
pub fn pack_env(paths: &BuildPaths) -> Result<()> {
    pack_dir(paths, &paths.offline_env_dir, &paths.archive_path)
}

/// Resolve the 7-Zip binary: a system `7z` on PATH wins, otherwise the
/// standalone binary downloaded into the resources directory.
pub fn find_seven_zip(resources_dir: &Path) -> Result<PathBuf> {
    if let Some(system) = find_executable("7z") {
        return Ok(system);
    }

    let bundled = resources_dir.join("7zr.exe");
    if bundled.exists() {
        return Ok(bundled);
    }

    bail!(
        "no 7z executable found on PATH and no 7zr.exe in {}",
        resources_dir.display()
    )
}
