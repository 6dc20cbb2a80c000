//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// File locations
    #[serde(default)]
    pub paths: PathsSection,

    /// Probe settings
    #[serde(default)]
    pub probe: ProbeSection,

    /// Mail notification settings
    #[serde(default)]
    pub email: EmailSection,

    /// Telegram notification settings
    #[serde(default)]
    pub telegram: TelegramSection,

    /// Message rendering settings
    #[serde(default)]
    pub notify: NotifySection,
}

/// File locations section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    /// Target list path
    pub targets: Option<String>,

    /// State file path
    pub state_file: Option<String>,
}

/// Probe settings section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    /// Per-probe timeout in seconds
    pub timeout: Option<u64>,

    /// User-Agent header sent with every probe
    pub user_agent: Option<String>,
}

/// Mail notification section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailSection {
    /// Address the report is mailed to
    pub recipient: Option<String>,
}

/// Telegram notification section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramSection {
    /// Numeric chat identifier
    pub chat_id: Option<String>,

    /// Bot API token
    pub api_token: Option<String>,

    /// Bot API base URL
    pub api_base: Option<String>,
}

/// Message rendering section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifySection {
    /// Message title and mail subject
    pub title: Option<String>,

    /// Handlebars body template
    pub template: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# NetSentinel Configuration File

[paths]
# Target list, one URL per line (default: data/DomainsToWatch.txt)
# targets = "data/DomainsToWatch.txt"

# State file holding the last observed statuses (default: data/history.json)
# state_file = "data/history.json"

[probe]
# Per-probe timeout in seconds (default: 30)
timeout = 30

# User-Agent header sent with every probe (default: desktop Chrome)
# user_agent = "Mozilla/5.0"

[email]
# Mail the report with the local `mail` utility
# recipient = "ops@example.com"

[telegram]
# Post the report to a Telegram chat (both values required)
# chat_id = "123456789"
# api_token = "123456:ABC-DEF"

# Bot API base URL (default: https://api.telegram.org)
# api_base = "https://api.telegram.org"

[notify]
# Message title and mail subject
# title = "NetSentinel - Reported Changes"

# Handlebars body template (default: the report as pretty-printed JSON)
# Available variables: {{title}}, {{count}}, {{report}}, {{changes}}
# template = '{{count}} change(s):{{#each changes}} {{name}}={{status}}{{/each}}'
"#
    .to_string()
}
