//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Every variant is raised before the first probe is sent, so a bad
/// invocation never touches the network or the state file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Recipient address is not plausible.
    #[error("Invalid email address format '{value}'")]
    InvalidEmail {
        /// The rejected address
        value: String,
    },

    /// Telegram chat id is not purely numeric.
    #[error("Invalid Telegram chat ID format '{value}': expected digits only")]
    InvalidChatId {
        /// The rejected chat id
        value: String,
    },

    /// Telegram bot token is empty.
    #[error("Invalid Telegram API token format: token must not be empty")]
    InvalidApiToken,

    /// Only half of the Telegram credentials were configured.
    #[error("Incomplete Telegram configuration: missing {missing}")]
    IncompleteTelegram {
        /// Name of the missing setting
        missing: &'static str,
    },

    /// The mail program required by `--email` is not installed.
    #[error(
        "The '{program}' utility is not installed, please install and configure a mail client"
    )]
    MailUnavailable {
        /// Program that was looked up
        program: &'static str,
    },

    /// Invalid URL provided.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The invalid URL string
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid duration value.
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// User agent is not a valid header value.
    #[error("Invalid user agent: {reason}")]
    InvalidUserAgent {
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid message template (Handlebars syntax error).
    #[error("Invalid message template: {reason}")]
    InvalidTemplate {
        /// Reason for invalidity
        reason: String,
    },
}

/// Well-known setting names for `IncompleteTelegram` errors.
pub mod field {
    /// The Telegram chat id.
    pub const CHAT_ID: &str = "telegram.chat_id";
    /// The Telegram bot token.
    pub const API_TOKEN: &str = "telegram.api_token";
}
