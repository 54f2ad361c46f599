//! tml-build CLI - build and package TML native packages

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use tml_build::util::Shell;

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
    let filter = if cli.quiet {
        EnvFilter::new("tml_build=error")
    } else if cli.verbose {
        EnvFilter::new("tml_build=debug")
    } else {
        EnvFilter::new("tml_build=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color);

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(&shell, args),
        Commands::Locate(args) => commands::locate::execute(args),
        Commands::Toolchain(args) => commands::toolchain::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
