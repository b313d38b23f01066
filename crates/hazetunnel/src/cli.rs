//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// hazetunnel - TLS-intercepting proxy with browser fingerprint spoofing
#[derive(Parser, Debug)]
#[command(name = "hazetunnel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    pub log_level: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding the native library and default key pair
    #[arg(long, global = true, env = "HAZETUNNEL_INSTALL_DIR")]
    pub install_dir: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the latest version of hazetunnel-api
    Fetch(FetchArgs),

    /// Remove all library files
    Remove,

    /// Display the current version
    Version(VersionArgs),

    /// Run the MITM proxy
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Only report whether an update is available
    #[arg(long)]
    pub check: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Port to run the proxy on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Path to the certificate file
    #[arg(long)]
    pub cert: Option<PathBuf>,

    /// Path to the key file
    #[arg(long)]
    pub key: Option<PathBuf>,

    /// Enable verbose proxy output
    #[arg(long)]
    pub verbose: bool,

    /// Script injected into proxied HTML responses
    #[arg(long)]
    pub payload: Option<String>,

    /// User agent whose TLS fingerprint to present
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Forward traffic through this proxy
    #[arg(long)]
    pub upstream_proxy: Option<String>,

    /// Address to bind the proxy to
    #[arg(long)]
    pub addr: Option<String>,
}
