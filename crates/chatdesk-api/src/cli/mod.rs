//! CLI command definitions for the `chatdesk` binary.

pub mod check;

use clap::{Parser, Subcommand};

/// Chat with a DeepSeek assistant over HTTP.
#[derive(Parser)]
#[command(name = "chatdesk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit log events as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on (defaults to the configured port).
        #[arg(long, env = "CHATDESK_PORT")]
        port: Option<u16>,

        /// Host to bind to (defaults to the configured host).
        #[arg(long, env = "CHATDESK_HOST")]
        host: Option<String>,
    },

    /// Create or upgrade the database schema, then exit.
    Migrate,

    /// Show configuration and connectivity diagnostics.
    Check,
}
