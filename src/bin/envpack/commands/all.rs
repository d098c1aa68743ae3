//! `envpack all` command
//!
//! The full pipeline in order. Each stage depends on the filesystem state
//! the previous one left behind, so a failure anywhere stops the run.

use anyhow::Result;

use crate::cli::AllArgs;
use envpack::ops::run_pipeline;

pub fn execute(args: AllArgs) -> Result<()> {
    let paths = super::resolve_paths(&args.platform)?;
    run_pipeline(&paths)
}
