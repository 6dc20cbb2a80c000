//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use http::header::HeaderValue;
use url::Url;

use crate::notify::{DEFAULT_API_BASE, MessageFormatter, NotifyError};
use crate::probe::DEFAULT_USER_AGENT;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Telegram destination, present only when both credentials are given.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    /// Numeric chat identifier
    pub chat_id: String,

    /// Bot API token
    pub api_token: String,

    /// Bot API base URL
    pub api_base: Url,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("chat_id", &self.chat_id)
            .field("api_token", &"<redacted>")
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Path to the target list
    pub targets_file: PathBuf,

    /// Path to the state file
    pub state_file: PathBuf,

    /// Per-probe timeout
    pub probe_timeout: Duration,

    /// User-Agent header sent with every probe
    pub user_agent: HeaderValue,

    /// Mail recipient, if reports should be mailed
    pub email: Option<String>,

    /// Telegram destination, if reports should be posted to a chat
    pub telegram: Option<TelegramConfig>,

    /// Message formatter shared by all channels
    pub formatter: MessageFormatter,

    /// Dry-run mode (check and save, log reports instead of sending them)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let email = self.email.as_deref().unwrap_or("none");
        let telegram = self
            .telegram
            .as_ref()
            .map_or("none", |t| t.chat_id.as_str());

        write!(
            f,
            "Config {{ targets: {}, state_file: {}, timeout: {}s, email: {}, telegram: {}, \
             dry_run: {} }}",
            self.targets_file.display(),
            self.state_file.display(),
            self.probe_timeout.as_secs(),
            email,
            telegram,
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email address is implausible
    /// - The Telegram chat id is not numeric, the token is empty, or only one
    ///   of them is configured
    /// - The timeout is zero
    /// - The user agent or API base URL is invalid
    /// - The message template does not compile
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let targets_file = Self::resolve_path(
            cli.targets.as_deref(),
            toml.and_then(|t| t.paths.targets.as_deref()),
            defaults::TARGETS_FILE,
        );
        let state_file = Self::resolve_path(
            cli.state_file.as_deref(),
            toml.and_then(|t| t.paths.state_file.as_deref()),
            defaults::STATE_FILE,
        );

        let probe_timeout = Self::resolve_timeout(cli, toml)?;
        let user_agent = Self::resolve_user_agent(toml)?;

        let email = Self::resolve_email(cli, toml)?;
        let telegram = Self::resolve_telegram(cli, toml)?;

        let formatter = Self::build_formatter(toml)?;

        Ok(Self {
            targets_file,
            state_file,
            probe_timeout,
            user_agent,
            email,
            telegram,
            formatter,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(&expand_tilde(path))?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Returns true if at least one notification channel is configured.
    #[must_use]
    pub const fn has_channels(&self) -> bool {
        self.email.is_some() || self.telegram.is_some()
    }

    fn resolve_path(cli: Option<&Path>, toml: Option<&str>, default: &str) -> PathBuf {
        let path = cli.map_or_else(
            || PathBuf::from(toml.unwrap_or(default)),
            Path::to_path_buf,
        );
        expand_tilde(&path)
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let secs = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.probe.timeout))
            .unwrap_or(defaults::PROBE_TIMEOUT_SECS);

        if secs == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Duration::from_secs(secs))
    }

    fn resolve_user_agent(toml: Option<&TomlConfig>) -> Result<HeaderValue, ConfigError> {
        let Some(agent) = toml.and_then(|t| t.probe.user_agent.as_deref()) else {
            return Ok(HeaderValue::from_static(DEFAULT_USER_AGENT));
        };

        if agent.trim().is_empty() {
            return Err(ConfigError::InvalidUserAgent {
                reason: "must not be empty".to_string(),
            });
        }

        HeaderValue::from_str(agent).map_err(|e| ConfigError::InvalidUserAgent {
            reason: e.to_string(),
        })
    }

    fn resolve_email(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Option<String>, ConfigError> {
        let Some(address) = cli
            .email
            .as_deref()
            .or_else(|| toml.and_then(|t| t.email.recipient.as_deref()))
        else {
            return Ok(None);
        };

        validate_email(address)?;
        Ok(Some(address.to_string()))
    }

    fn resolve_telegram(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<TelegramConfig>, ConfigError> {
        // CLI pair replaces TOML credentials entirely
        let (chat_id, api_token) = match cli.telegram_pair() {
            Some((chat_id, api_token)) => (Some(chat_id), Some(api_token)),
            None => (
                toml.and_then(|t| t.telegram.chat_id.as_deref()),
                toml.and_then(|t| t.telegram.api_token.as_deref()),
            ),
        };

        let (chat_id, api_token) = match (chat_id, api_token) {
            (None, None) => return Ok(None),
            (Some(_), None) => {
                return Err(ConfigError::IncompleteTelegram {
                    missing: field::API_TOKEN,
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteTelegram {
                    missing: field::CHAT_ID,
                });
            }
            (Some(chat_id), Some(api_token)) => (chat_id, api_token),
        };

        validate_chat_id(chat_id)?;
        validate_api_token(api_token)?;

        let base = toml
            .and_then(|t| t.telegram.api_base.as_deref())
            .unwrap_or(DEFAULT_API_BASE);
        let api_base = Url::parse(base).map_err(|e| ConfigError::InvalidUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: base.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(Some(TelegramConfig {
            chat_id: chat_id.to_string(),
            api_token: api_token.to_string(),
            api_base,
        }))
    }

    fn build_formatter(toml: Option<&TomlConfig>) -> Result<MessageFormatter, ConfigError> {
        let mut formatter = MessageFormatter::new();

        let Some(toml) = toml else {
            return Ok(formatter);
        };

        if let Some(ref title) = toml.notify.title {
            formatter = formatter.with_title(title.as_str());
        }

        if let Some(ref template) = toml.notify.template {
            MessageFormatter::validate_template(template).map_err(|e| {
                ConfigError::InvalidTemplate {
                    reason: match e {
                        NotifyError::Render(reason) => reason,
                        other => other.to_string(),
                    },
                }
            })?;
            formatter = formatter.with_template(template.as_str());
        }

        Ok(formatter)
    }
}

/// Checks that `address` looks like an email address.
///
/// Only plausibility is checked: an `@` and a `.` must both be present.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEmail`] otherwise.
pub fn validate_email(address: &str) -> Result<(), ConfigError> {
    if address.contains('@') && address.contains('.') {
        return Ok(());
    }
    Err(ConfigError::InvalidEmail {
        value: address.to_string(),
    })
}

/// Checks that `chat_id` is a non-empty string of ASCII digits.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidChatId`] otherwise.
pub fn validate_chat_id(chat_id: &str) -> Result<(), ConfigError> {
    if !chat_id.is_empty() && chat_id.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(());
    }
    Err(ConfigError::InvalidChatId {
        value: chat_id.to_string(),
    })
}

/// Checks that `api_token` is not empty.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidApiToken`] otherwise.
pub fn validate_api_token(api_token: &str) -> Result<(), ConfigError> {
    if api_token.trim().is_empty() {
        return Err(ConfigError::InvalidApiToken);
    }
    Ok(())
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without the prefix, or hosts without a home directory, are
/// returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
