//! `envpack paths` command
//!
//! Prints the resolved build layout, either human-readable or as JSON for
//! other build tooling to consume.

use anyhow::Result;

use crate::cli::PathsArgs;

pub fn execute(args: PathsArgs) -> Result<()> {
    let paths = super::resolve_paths(&args.platform)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    println!("platform:       {}", paths.platform);
    println!("repo root:      {}", paths.repo_root.display());
    println!("resources:      {}", paths.resources_dir.display());
    println!("service:        {}", paths.service_dir.display());
    println!("environment:    {}", paths.env_dir.display());
    println!("offline env:    {}", paths.offline_env_dir.display());
    println!("runtime libs:   {}", paths.runtime_libs_dir.display());
    println!("comfyui:        {}", paths.comfy_ui_dir.display());
    println!("archive:        {}", paths.archive_path.display());
    println!("manifests:");
    for manifest in paths.requirements_manifests() {
        println!("  {}", manifest.display());
    }

    Ok(())
}
