//! CLI for pinfetch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use commands::{run_completions, run_fetch, run_pins, run_thumbprint, FetchArgs};

/// Top-level CLI for pinfetch.
#[derive(Debug, Parser)]
#[command(name = "pinfetch")]
#[command(about = "pinfetch: HTTPS downloads with pinned server certificates", long_about = None)]
pub struct Cli {
    /// Log TLS handshake details as well.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download one or more HTTPS URLs, in order.
    Fetch {
        /// HTTPS URLs to download.
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,

        /// Destination filename for the URL in the same position. Repeatable.
        #[arg(short, long = "output", value_name = "NAME")]
        outputs: Vec<String>,

        /// Directory to write into (default: config `download_dir`, else the current directory).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,

        /// Delete a destination file if its transfer fails midway.
        #[arg(long)]
        remove_partial: bool,
    },

    /// List the compiled-in certificate pins.
    Pins,

    /// Print the SHA-1 thumbprint and SHA-256 fingerprint of a DER certificate.
    Thumbprint {
        /// Path to the DER-encoded certificate.
        path: PathBuf,
    },

    /// Generate shell completions on stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn run(self) -> Result<()> {
        match self.command {
            CliCommand::Fetch {
                urls,
                outputs,
                download_dir,
                remove_partial,
            } => run_fetch(FetchArgs {
                urls,
                outputs,
                download_dir,
                remove_partial,
            }),
            CliCommand::Pins => run_pins(),
            CliCommand::Thumbprint { path } => run_thumbprint(&path),
            CliCommand::Completions { shell } => run_completions(shell),
        }
    }
}

#[cfg(test)]
mod tests;
