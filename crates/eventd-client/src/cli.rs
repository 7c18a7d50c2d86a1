//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// eventd - query calendar events from the event store daemon
#[derive(Debug, Parser)]
#[command(name = "eventd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the daemon socket
    #[arg(long, env = "EVENTD_SOCKET", global = true)]
    pub socket_path: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, default_value = "5", global = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query events in a date window
    Events {
        /// Only events relevant on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only events relevant on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Which timestamp the window applies to: start, end or overlap
        #[arg(long)]
        at: Option<String>,
    },

    /// List events starting in a given month
    Month {
        /// Year (e.g. 2024)
        year: i32,
        /// Month (1-12)
        month: u32,
    },

    /// Show a single event by id
    Show {
        /// Event id
        id: String,
    },

    /// Show daemon status
    Status,

    /// Check daemon liveness
    Ping,

    /// Ask the daemon to shut down
    Stop,

    /// Run the daemon
    Serve {
        /// JSON seed file with event records
        #[arg(long)]
        data: Option<PathBuf>,

        /// Site root permalinks resolve under
        #[arg(long, default_value = "http://localhost/")]
        site_url: String,

        /// PID file path
        #[arg(long)]
        pid_file: Option<PathBuf>,

        /// Emit logs as JSON
        #[arg(long)]
        log_json: bool,
    },
}
