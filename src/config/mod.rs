//! Configuration layer for NetSentinel.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! `--telegram` carries both credentials, so a CLI pair replaces the TOML
//! `chat_id` and `api_token` together. The user agent, API base URL, title
//! and template are TOML-only.
//!
//! Every check runs before the first probe. A bad email address, a
//! non-numeric chat id or an empty token stops the run with a
//! configuration error.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::ConfigError;
pub use toml::{TomlConfig, default_config_template};
pub use validated::{
    TelegramConfig, ValidatedConfig, expand_tilde, validate_api_token, validate_chat_id,
    validate_email, write_default_config,
};
