//! Resource fetch stage.
//!
//! Downloads the fixed external artifacts into the resources directory,
//! unpacks the uv release archive and relocates its binary, and clones the
//! ComfyUI backend repositories. Already-present files are skipped, so the
//! stage is cheap to re-run.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::config::{uv_binary_name, BuildPaths, COMFY_UI_GGUF_REPO, COMFY_UI_REPO};
use crate::util::archive::extract_archive;
use crate::util::download::{download_if_absent, file_name_from_url};
use crate::util::fs::ensure_dir;

/// Run the whole fetch stage against the resolved layout.
pub fn fetch_resources(paths: &BuildPaths) -> Result<()> {
    ensure_dir(&paths.resources_dir)?;

    download_batch(&paths.resources.download_urls(), &paths.resources_dir)?;
    provide_uv_binary(paths)?;
    clone_backend_repos(paths)?;

    Ok(())
}

/// Download every URL concurrently, joining before any failure is raised.
///
/// A single bad URL must not hide the others: all failures are collected
/// across the batch and reported together.
fn download_batch(urls: &[&str], dir: &Path) -> Result<()> {
    let progress = MultiProgress::new();

    let failures: Vec<String> = urls
        .par_iter()
        .filter_map(|url| {
            let style = ProgressStyle::default_bar()
                .template("{msg:>24} {bytes:>10}/{total_bytes:<10} {wide_bar}")
                .unwrap()
                .progress_chars("#>-");
            let bar = progress.add(ProgressBar::no_length().with_style(style));
            bar.set_message(file_name_from_url(url).unwrap_or_else(|_| url.to_string()));

            let result = download_if_absent(url, dir, Some(&bar));
            bar.finish_and_clear();

            result.err().map(|e| format!("  {}: {:#}", url, e))
        })
        .collect();

    if !failures.is_empty() {
        bail!(
            "{} download(s) failed:\n{}",
            failures.len(),
            failures.join("\n")
        );
    }

    Ok(())
}

/// Unpack the uv release archive and move the binary into the resources
/// directory under its fixed name. No-op when the binary is already there.
fn provide_uv_binary(paths: &BuildPaths) -> Result<()> {
    let uv_dest = paths.resources_dir.join(uv_binary_name());
    if uv_dest.exists() {
        tracing::info!("skipping uv extraction: {} already exists", uv_dest.display());
        return Ok(());
    }

    let archive_name = file_name_from_url(&paths.resources.uv_archive_url)?;
    let archive_path = paths.resources_dir.join(archive_name);
    if !archive_path.exists() {
        bail!("uv archive not found: {}", archive_path.display());
    }

    let scratch = TempDir::new_in(&paths.resources_dir)
        .context("failed to create scratch directory for uv extraction")?;
    extract_archive(&archive_path, scratch.path())?;

    let extracted = find_file_named(scratch.path(), uv_binary_name()).ok_or_else(|| {
        anyhow::anyhow!(
            "{} not found inside {}",
            uv_binary_name(),
            archive_path.display()
        )
    })?;

    fs::copy(&extracted, &uv_dest)
        .with_context(|| format!("failed to place {}", uv_dest.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&uv_dest)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&uv_dest, perms)?;
    }

    tracing::info!("provided {}", uv_dest.display());
    Ok(())
}

fn find_file_named(root: &Path, name: &str) -> Option<std::path::PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == name)
        .map(|entry| entry.into_path())
}

/// Clone the ComfyUI backend and its GGUF custom node, skipping checkouts
/// that already exist.
fn clone_backend_repos(paths: &BuildPaths) -> Result<()> {
    clone_if_absent(COMFY_UI_REPO, &paths.comfy_ui_dir)?;
    clone_if_absent(
        COMFY_UI_GGUF_REPO,
        &paths
            .comfy_ui_dir
            .join("custom_nodes")
            .join("ComfyUI-GGUF"),
    )?;
    Ok(())
}

fn clone_if_absent(url: &str, checkout: &Path) -> Result<()> {
    if checkout.exists() {
        tracing::info!(
            "skipping clone of {}: {} already exists",
            url,
            checkout.display()
        );
        return Ok(());
    }

    tracing::info!("cloning {}", url);
    if let Some(parent) = checkout.parent() {
        ensure_dir(parent)?;
    }
    git2::Repository::clone(url, checkout)
        .with_context(|| format!("failed to clone {}", url))?;

    Ok(())
}
