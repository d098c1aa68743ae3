//! Blocking HTTP download helpers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use url::Url;

/// Derive the local file name from a URL's final path segment.
pub fn file_name_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url).with_context(|| format!("invalid url: {}", url))?;
    let name = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| anyhow::anyhow!("cannot derive a file name from url: {}", url))?;
    Ok(name.to_string())
}

/// Download `url` to `dest`, streaming the body to disk.
///
/// A non-success HTTP status is an error. A partially written file is
/// removed on failure so a later run does not mistake it for a finished
/// download.
pub fn download_to(url: &str, dest: &Path, progress: Option<&ProgressBar>) -> Result<()> {
    let result = stream_to_file(url, dest, progress);
    if result.is_err() {
        let _ = fs::remove_file(dest);
    }
    result
}

fn stream_to_file(url: &str, dest: &Path, progress: Option<&ProgressBar>) -> Result<()> {
    let mut response = reqwest::blocking::get(url)
        .with_context(|| format!("failed to download {}", url))?;

    if !response.status().is_success() {
        bail!("failed to download {}: HTTP {}", url, response.status());
    }

    let file = fs::File::create(dest)
        .with_context(|| format!("failed to create {}", dest.display()))?;

    match progress {
        Some(bar) => {
            if let Some(len) = response.content_length() {
                bar.set_length(len);
            }
            let mut writer = bar.wrap_write(file);
            io::copy(&mut response, &mut writer)
                .with_context(|| format!("failed to write {}", dest.display()))?;
        }
        None => {
            let mut writer = file;
            io::copy(&mut response, &mut writer)
                .with_context(|| format!("failed to write {}", dest.display()))?;
        }
    }

    Ok(())
}

/// Download `url` into `dir` unless the derived file name already exists
/// there; an existing file is a success, not an error, and makes no network
/// call.
pub fn download_if_absent(
    url: &str,
    dir: &Path,
    progress: Option<&ProgressBar>,
) -> Result<PathBuf> {
    let dest = dir.join(file_name_from_url(url)?);
    if dest.exists() {
        tracing::info!(
            "skipping fetch of {}: {} already exists",
            url,
            dest.display()
        );
        return Ok(dest);
    }

    tracing::info!("fetching {}", url);
    download_to(url, &dest, progress)?;
    tracing::info!("downloaded {}", dest.display());
    Ok(dest)
}
