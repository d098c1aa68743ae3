//! Command implementations

pub mod all;
pub mod assemble;
pub mod completions;
pub mod fetch;
pub mod install;
pub mod pack;
pub mod paths;

use anyhow::{Context, Result};
use envpack::{BuildPaths, Platform};

/// Resolve the build layout from the current directory and a platform
/// string. An unsupported platform is fatal here, before any stage runs.
pub fn resolve_paths(platform: &str) -> Result<BuildPaths> {
    let platform: Platform = platform.parse()?;
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    Ok(BuildPaths::resolve(&cwd, platform))
}
