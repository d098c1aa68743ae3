//! `envpack install` command

use anyhow::Result;

use crate::cli::InstallArgs;
use envpack::ops::install::install_dependencies;

pub fn execute(args: InstallArgs) -> Result<()> {
    let paths = super::resolve_paths(&args.platform)?;
    install_dependencies(&paths)
}
