//! hsx CLI - extension management for hosted service deployments
//!
//! This is the main entry point for the hsx command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let ctx = commands::Context::new(cli.config, cli.state);
    match cli.command {
        Commands::Deployment(cmd) => commands::deployment::run(cmd, &ctx),
        Commands::Rdp(cmd) => commands::rdp::run(cmd, &ctx),
        Commands::Diagnostics(cmd) => commands::diagnostics::run(cmd, &ctx),
        Commands::Extension(cmd) => commands::extension::run(cmd, &ctx),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
