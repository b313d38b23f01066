//! hazetunnel CLI - fetch, update and run the TLS-intercepting proxy
//!
//! This is the main entry point for the hazetunnel command-line interface.

mod cli;
mod commands;
mod output;
mod version;

use anyhow::Result;
use clap::Parser;
use hazetunnel_core::error::EXIT_FAILURE;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    init_tracing(cli.log_level, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let install_dir = cli.install_dir.as_deref();
    match cli.command {
        Commands::Fetch(args) => commands::fetch::run(args, install_dir, cli.quiet).await,
        Commands::Remove => commands::remove::run(install_dir),
        Commands::Version(args) => commands::version::run(args, install_dir).await,
        Commands::Run(args) => commands::run::run(args, install_dir, cli.quiet).await,
    }
}

/// Exit code for the first hazetunnel error in the chain
fn exit_code(err: &anyhow::Error) -> u8 {
    let code = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<hazetunnel_core::Error>())
        .map(hazetunnel_core::Error::exit_code)
        .unwrap_or(EXIT_FAILURE);
    u8::try_from(code).unwrap_or(1)
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
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
