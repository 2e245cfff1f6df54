//! CLI interface for Gatehouse

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gatehouse")]
#[command(version)]
#[command(about = "Session gate and authentication layer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the resolved configuration
    Config,

    /// Try to connect to the configured database and report the auth mode
    CheckDb,

    /// Write a gatehouse.toml with default settings
    Init,
}
