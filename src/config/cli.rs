//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// NetSentinel: endpoint status change monitor
///
/// Probes every endpoint in the target list once, records the status codes
/// and reports the ones that changed since the last run by email and/or
/// Telegram.
#[derive(Debug, Parser)]
#[command(name = "net-sentinel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Email address to send the report to
    #[arg(long, value_name = "ADDRESS")]
    pub email: Option<String>,

    /// Telegram chat ID and API token to send the report to
    #[arg(long, num_args = 2, value_names = ["CHAT_ID", "API_TOKEN"])]
    pub telegram: Option<Vec<String>>,

    /// Path to the target list (one URL per line)
    #[arg(long, value_name = "PATH")]
    pub targets: Option<PathBuf>,

    /// Path to the state file holding the last observed statuses
    #[arg(long = "state-file", value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// Per-probe timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Test mode - check and save state, but log reports instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for net-sentinel
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "net-sentinel.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Parses CLI arguments from an iterator, returning clap's error
    /// instead of exiting.
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown or malformed arguments.
    pub fn try_parse_from_iter<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }

    /// Returns the `--telegram` pair as `(chat_id, api_token)`.
    #[must_use]
    pub fn telegram_pair(&self) -> Option<(&str, &str)> {
        match self.telegram.as_deref() {
            Some([chat_id, api_token]) => Some((chat_id.as_str(), api_token.as_str())),
            _ => None,
        }
    }
}
