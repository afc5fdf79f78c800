//! CLI command definitions for the `voxskill` binary.

pub mod invoke;
pub mod locales;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Serve and exercise the voxskill greeting skill.
#[derive(Parser)]
#[command(name = "voxskill", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter for the chosen verbosity; `RUST_LOG` overrides it.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,voxskill_core=debug,voxskill_infra=debug,voxskill_api=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP skill endpoint.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000", env = "VOXSKILL_PORT")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1", env = "VOXSKILL_HOST")]
        host: String,

        /// Keep persistent attributes in memory instead of SQLite.
        #[arg(long)]
        memory: bool,
    },

    /// Run one request envelope through the skill and print the response.
    Invoke {
        /// Path to a request envelope JSON file (`-` for stdin).
        request: PathBuf,

        /// Keep persistent attributes in memory instead of SQLite.
        #[arg(long)]
        memory: bool,
    },

    /// Verify every locale file defines every prompt the skill uses.
    CheckLocales {
        /// Languages directory (defaults to the configured one).
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}
