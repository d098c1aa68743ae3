//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use envpack::PLATFORM_ENV;

/// Envpack - assembles and packages an offline embeddable Python runtime
#[derive(Parser)]
#[command(name = "envpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download external resources (interpreter, pip bootstrap, tools)
    Fetch(FetchArgs),

    /// Assemble the embeddable Python environment from fetched resources
    Assemble(AssembleArgs),

    /// Install pip and the requirements manifests into the environment
    Install(InstallArgs),

    /// Compress the assembled environment into a 7z archive
    Pack(PackArgs),

    /// Run the whole pipeline: fetch, assemble, install, pack
    All(AllArgs),

    /// Print the resolved build layout
    Paths(PathsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct FetchArgs {
    /// Target platform (arc, ultra, ultra2)
    #[arg(long, env = PLATFORM_ENV)]
    pub platform: String,
}

#[derive(Args)]
pub struct AssembleArgs {
    /// Target platform (arc, ultra, ultra2)
    #[arg(long, env = PLATFORM_ENV)]
    pub platform: String,
}

#[derive(Args)]
pub struct InstallArgs {
    /// Target platform (arc, ultra, ultra2)
    #[arg(long, env = PLATFORM_ENV)]
    pub platform: String,
}

#[derive(Args)]
pub struct PackArgs {
    /// Target platform (arc, ultra, ultra2)
    #[arg(long, env = PLATFORM_ENV)]
    pub platform: String,

    /// Directory to compress (defaults to the installed offline environment)
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Archive to produce (defaults to the platform-named archive)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct AllArgs {
    /// Target platform (arc, ultra, ultra2)
    #[arg(long, env = PLATFORM_ENV)]
    pub platform: String,
}

#[derive(Args)]
pub struct PathsArgs {
    /// Target platform (arc, ultra, ultra2)
    #[arg(long, env = PLATFORM_ENV)]
    pub platform: String,

    /// Emit the layout as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
