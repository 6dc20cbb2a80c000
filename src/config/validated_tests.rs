//! Tests for configuration merging and validation.

use std::path::PathBuf;
use std::time::Duration;

use super::cli::Cli;
use super::error::ConfigError;
use super::toml::TomlConfig;
use super::validated::{
    ValidatedConfig, expand_tilde, validate_api_token, validate_chat_id, validate_email,
    write_default_config,
};
use crate::probe::DEFAULT_USER_AGENT;

fn cli(args: &[&str]) -> Cli {
    let mut full = vec!["net-sentinel"];
    full.extend_from_slice(args);
    Cli::parse_from_iter(full)
}

fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

mod defaults {
    use super::*;

    #[test]
    fn no_args_uses_built_in_defaults() {
        let config = ValidatedConfig::from_raw(&cli(&[]), None).unwrap();

        assert_eq!(config.targets_file, PathBuf::from("data/DomainsToWatch.txt"));
        assert_eq!(config.state_file, PathBuf::from("data/history.json"));
        assert_eq!(config.probe_timeout, Duration::from_secs(30));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(config.email.is_none());
        assert!(config.telegram.is_none());
        assert!(!config.has_channels());
        assert!(!config.dry_run);
    }

    #[test]
    fn default_telegram_api_base() {
        let config = ValidatedConfig::from_raw(&cli(&["--telegram", "1", "t"]), None).unwrap();

        let telegram = config.telegram.unwrap();
        assert_eq!(telegram.api_base.as_str(), "https://api.telegram.org/");
    }
}

mod precedence {
    use super::*;

    #[test]
    fn toml_overrides_defaults() {
        let toml = toml(
            r#"
            [paths]
            targets = "/srv/targets.txt"
            state_file = "/srv/history.json"

            [probe]
            timeout = 7
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.targets_file, PathBuf::from("/srv/targets.txt"));
        assert_eq!(config.state_file, PathBuf::from("/srv/history.json"));
        assert_eq!(config.probe_timeout, Duration::from_secs(7));
    }

    #[test]
    fn cli_overrides_toml() {
        let toml = toml(
            r#"
            [paths]
            targets = "/srv/targets.txt"

            [probe]
            timeout = 7

            [email]
            recipient = "toml@example.com"
        "#,
        );
        let cli = cli(&[
            "--targets",
            "cli.txt",
            "--timeout",
            "3",
            "--email",
            "cli@example.com",
        ]);

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.targets_file, PathBuf::from("cli.txt"));
        assert_eq!(config.probe_timeout, Duration::from_secs(3));
        assert_eq!(config.email.as_deref(), Some("cli@example.com"));
    }

    #[test]
    fn cli_telegram_pair_replaces_toml_credentials() {
        let toml = toml(
            r#"
            [telegram]
            chat_id = "111"
            api_token = "toml-token"
        "#,
        );

        let config =
            ValidatedConfig::from_raw(&cli(&["--telegram", "222", "cli-token"]), Some(&toml))
                .unwrap();

        let telegram = config.telegram.unwrap();
        assert_eq!(telegram.chat_id, "222");
        assert_eq!(telegram.api_token, "cli-token");
    }

    #[test]
    fn telegram_from_toml_with_custom_base() {
        let toml = toml(
            r#"
            [telegram]
            chat_id = "111"
            api_token = "toml-token"
            api_base = "http://127.0.0.1:8081"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        let telegram = config.telegram.unwrap();
        assert_eq!(telegram.chat_id, "111");
        assert_eq!(telegram.api_base.as_str(), "http://127.0.0.1:8081/");
    }

    #[test]
    fn flags_come_from_cli() {
        let config = ValidatedConfig::from_raw(&cli(&["--dry-run", "--verbose"]), None).unwrap();

        assert!(config.dry_run);
        assert!(config.verbose);
    }

    #[test]
    fn notify_title_is_applied() {
        let toml = toml("[notify]\ntitle = \"Changes\"");

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.formatter.title(), "Changes");
    }
}

mod email {
    use super::*;

    #[test]
    fn plausible_address_is_accepted() {
        assert!(validate_email("ops@example.com").is_ok());
    }

    #[test]
    fn address_without_at_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--email", "ops.example.com"]), None);
        assert!(matches!(result, Err(ConfigError::InvalidEmail { value }) if value == "ops.example.com"));
    }

    #[test]
    fn address_without_dot_is_rejected() {
        assert!(matches!(
            validate_email("ops@localhost"),
            Err(ConfigError::InvalidEmail { .. })
        ));
    }

    #[test]
    fn toml_address_is_validated() {
        let toml = toml("[email]\nrecipient = \"nobody\"");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));
        assert!(matches!(result, Err(ConfigError::InvalidEmail { .. })));
    }
}

mod telegram {
    use super::*;

    #[test]
    fn numeric_chat_id_is_accepted() {
        assert!(validate_chat_id("0123456789").is_ok());
    }

    #[test]
    fn non_numeric_chat_id_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--telegram", "12a45", "token"]), None);
        assert!(matches!(result, Err(ConfigError::InvalidChatId { value }) if value == "12a45"));
    }

    #[test]
    fn negative_chat_id_is_rejected() {
        assert!(matches!(
            validate_chat_id("-100123"),
            Err(ConfigError::InvalidChatId { .. })
        ));
    }

    #[test]
    fn empty_chat_id_is_rejected() {
        assert!(matches!(
            validate_chat_id(""),
            Err(ConfigError::InvalidChatId { .. })
        ));
    }

    #[test]
    fn empty_token_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--telegram", "12345", ""]), None);
        assert!(matches!(result, Err(ConfigError::InvalidApiToken)));
    }

    #[test]
    fn blank_token_is_rejected() {
        assert!(matches!(
            validate_api_token("   "),
            Err(ConfigError::InvalidApiToken)
        ));
    }

    #[test]
    fn chat_id_without_token_is_incomplete() {
        let toml = toml("[telegram]\nchat_id = \"123\"");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));
        assert!(matches!(
            result,
            Err(ConfigError::IncompleteTelegram { missing: "telegram.api_token" })
        ));
    }

    #[test]
    fn token_without_chat_id_is_incomplete() {
        let toml = toml("[telegram]\napi_token = \"abc\"");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));
        assert!(matches!(
            result,
            Err(ConfigError::IncompleteTelegram { missing: "telegram.chat_id" })
        ));
    }

    #[test]
    fn invalid_api_base_is_rejected() {
        let toml = toml(
            r#"
            [telegram]
            chat_id = "1"
            api_token = "t"
            api_base = "not a url"
        "#,
        );
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn non_http_api_base_is_rejected() {
        let toml = toml(
            r#"
            [telegram]
            chat_id = "1"
            api_token = "t"
            api_base = "ftp://bots.example.com"
        "#,
        );
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn token_is_redacted_in_debug() {
        let config =
            ValidatedConfig::from_raw(&cli(&["--telegram", "42", "super-secret"]), None).unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!config.to_string().contains("super-secret"));
    }
}

mod probe {
    use super::*;

    #[test]
    fn zero_timeout_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--timeout", "0"]), None);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration { field: "timeout", .. })
        ));
    }

    #[test]
    fn zero_timeout_in_toml_is_rejected() {
        let toml = toml("[probe]\ntimeout = 0");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));
        assert!(matches!(result, Err(ConfigError::InvalidDuration { .. })));
    }

    #[test]
    fn custom_user_agent() {
        let toml = toml("[probe]\nuser_agent = \"sentinel/1.0\"");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();
        assert_eq!(config.user_agent, "sentinel/1.0");
    }

    #[test]
    fn user_agent_with_newline_is_rejected() {
        let toml = toml("[probe]\nuser_agent = \"bad\\nagent\"");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));
        assert!(matches!(result, Err(ConfigError::InvalidUserAgent { .. })));
    }

    #[test]
    fn empty_user_agent_is_rejected() {
        let toml = toml("[probe]\nuser_agent = \"\"");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));
        assert!(matches!(result, Err(ConfigError::InvalidUserAgent { .. })));
    }
}

mod template {
    use super::*;

    #[test]
    fn valid_template_is_accepted() {
        let toml = toml("[notify]\ntemplate = \"{{count}}:{{#each changes}}{{name}}{{/each}}\"");
        assert!(ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).is_ok());
    }

    #[test]
    fn unclosed_block_is_rejected() {
        let toml = toml("[notify]\ntemplate = \"{{#each changes}}{{name}}\"");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));
        assert!(matches!(result, Err(ConfigError::InvalidTemplate { .. })));
    }
}

mod paths {
    use super::*;

    #[test]
    fn plain_path_is_unchanged() {
        assert_eq!(
            expand_tilde(&PathBuf::from("data/history.json")),
            PathBuf::from("data/history.json")
        );
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(
            expand_tilde(&PathBuf::from("~/sentinel/history.json")),
            home.join("sentinel/history.json")
        );
    }

    #[test]
    fn tilde_inside_name_is_unchanged() {
        assert_eq!(
            expand_tilde(&PathBuf::from("data/~backup.json")),
            PathBuf::from("data/~backup.json")
        );
    }
}

mod loading {
    use super::*;

    #[test]
    fn load_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.toml");
        std::fs::write(&path, "[email]\nrecipient = \"ops@example.com\"").unwrap();

        let config = ValidatedConfig::load(&cli(&["-c", path.to_str().unwrap()])).unwrap();

        assert_eq!(config.email.as_deref(), Some("ops@example.com"));
    }

    #[test]
    fn load_without_config_file() {
        let config = ValidatedConfig::load(&cli(&[])).unwrap();
        assert!(!config.has_channels());
    }

    #[test]
    fn load_missing_config_file() {
        let result = ValidatedConfig::load(&cli(&["-c", "/nonexistent/sentinel.toml"]));
        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn written_default_config_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net-sentinel.toml");

        write_default_config(&path).unwrap();
        let config = ValidatedConfig::load(&cli(&["-c", path.to_str().unwrap()])).unwrap();

        assert_eq!(config.probe_timeout, Duration::from_secs(30));
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("net-sentinel.toml");

        let result = write_default_config(&path);

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}
