//! Envpack CLI - offline Python environment packaging

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("envpack=debug")
    } else {
        EnvFilter::new("envpack=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Fetch(args) => commands::fetch::execute(args),
        Commands::Assemble(args) => commands::assemble::execute(args),
        Commands::Install(args) => commands::install::execute(args),
        Commands::Pack(args) => commands::pack::execute(args),
        Commands::All(args) => commands::all::execute(args),
        Commands::Paths(args) => commands::paths::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
