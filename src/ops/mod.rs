//! Pipeline stages.
//!
//! Each stage is a plain function over `BuildPaths`: strictly sequential,
//! single shot, and dependent on the filesystem state the previous stage
//! left behind. There is no retry and no cross-run state beyond the disk.

pub mod assemble;
pub mod fetch;
pub mod install;
pub mod pack;

use anyhow::Result;

use crate::config::BuildPaths;

/// Run the full pipeline: fetch, assemble, install, pack.
pub fn run_pipeline(paths: &BuildPaths) -> Result<()> {
    fetch::fetch_resources(paths)?;
    assemble::assemble_env(paths)?;
    install::install_dependencies(paths)?;
    pack::pack_env(paths)?;
    Ok(())
}
