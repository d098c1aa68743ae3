//! `envpack fetch` command

use anyhow::Result;

use crate::cli::FetchArgs;
use envpack::ops::fetch::fetch_resources;

pub fn execute(args: FetchArgs) -> Result<()> {
    let paths = super::resolve_paths(&args.platform)?;
    fetch_resources(&paths)
}
