//! `envpack assemble` command

use anyhow::Result;

use crate::cli::AssembleArgs;
use envpack::ops::assemble::assemble_env;

pub fn execute(args: AssembleArgs) -> Result<()> {
    let paths = super::resolve_paths(&args.platform)?;
    assemble_env(&paths)
}
