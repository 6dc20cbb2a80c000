//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use net_sentinel::config::ConfigError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid args, bad credentials, missing mail utility.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - unreadable target list, state load/save failure.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Returns a follow-up hint for common configuration errors.
pub const fn config_hint(error: &ConfigError) -> Option<&'static str> {
    match error {
        ConfigError::FileRead { .. } | ConfigError::TomlParse(_) => {
            Some("Run 'net-sentinel init' to generate a configuration template.")
        }
        ConfigError::InvalidChatId { .. }
        | ConfigError::InvalidApiToken
        | ConfigError::IncompleteTelegram { .. } => {
            Some("Usage: --telegram <CHAT_ID> <API_TOKEN>, the chat ID is numeric.")
        }
        ConfigError::MailUnavailable { .. } => {
            Some("Install a mail client (for example mailutils) or drop --email.")
        }
        _ => None,
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    if let Some(hint) = config_hint(error) {
        eprintln!("\n{hint}");
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
