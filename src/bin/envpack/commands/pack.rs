//! `envpack pack` command

use anyhow::Result;

use crate::cli::PackArgs;
use envpack::ops::pack::pack_dir;

pub fn execute(args: PackArgs) -> Result<()> {
    let paths = super::resolve_paths(&args.platform)?;

    let source = args.source.unwrap_or_else(|| paths.offline_env_dir.clone());
    let output = args.output.unwrap_or_else(|| paths.archive_path.clone());

    pack_dir(&paths, &source, &output)
}
