//! Application execution logic.
//!
//! This module wires the validated configuration into one check cycle:
//! probe every target, persist the new state and deliver the report.

use thiserror::Error;

use net_sentinel::checker::{ChangeReport, StatusChecker};
use net_sentinel::config::{ConfigError, TelegramConfig, ValidatedConfig};
use net_sentinel::notify::{
    CommandRunner, MAIL_PROGRAM, MailNotifier, SystemCommandRunner, TelegramNotifier, deliver,
};
use net_sentinel::probe::HttpProber;
use net_sentinel::state::{FileStateStore, StateError};
use net_sentinel::targets::{TargetsError, load_targets};
use net_sentinel::transport::{HttpError, ReqwestClient};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// A configured channel cannot work on this host.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to read the target list.
    #[error(transparent)]
    Targets(#[from] TargetsError),

    /// Failed to load the state file.
    #[error("Failed to load state: {0}")]
    StateLoad(#[source] StateError),

    /// Failed to save the state file.
    #[error("Failed to save state: {0}")]
    StateSave(#[source] StateError),

    /// Failed to build the HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[source] HttpError),
}

impl From<StateError> for RunError {
    fn from(error: StateError) -> Self {
        if error.is_load_error() {
            Self::StateLoad(error)
        } else {
            Self::StateSave(error)
        }
    }
}

/// Executes one check-and-notify cycle.
///
/// This function:
/// 1. Verifies the mail utility is installed (if email is configured)
/// 2. Reads the target list
/// 3. Loads the state, probes every target and saves the state once
/// 4. Hands the change report to each configured channel
///
/// # Errors
///
/// Returns an error if:
/// - Email is requested but the mail utility is missing
/// - The target list cannot be read
/// - The state file cannot be loaded or saved
///
/// Notification failures are logged, not returned.
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let mail = create_mail(&config, SystemCommandRunner);
    if let Some(ref mail) = mail {
        ensure_mail_available(mail).await?;
    }
    let telegram = create_telegram(&config)?;

    if config.dry_run {
        tracing::info!("Dry-run mode enabled - reports will be logged but not sent");
    }

    let report = check(&config).await?;
    log_report(&report, config.dry_run);

    if !config.has_channels() && !report.is_empty() {
        tracing::info!("No notification channel configured");
    }

    if let Some(ref telegram) = telegram {
        deliver(telegram, &report, config.dry_run).await;
    }
    if let Some(ref mail) = mail {
        deliver(mail, &report, config.dry_run).await;
    }

    Ok(())
}

/// Probes all targets and persists the result, returning the change report.
async fn check(config: &ValidatedConfig) -> Result<ChangeReport, RunError> {
    let targets = load_targets(&config.targets_file)?;
    tracing::info!(
        "Checking {} target(s) from {}",
        targets.len(),
        config.targets_file.display()
    );

    let client = ReqwestClient::with_timeout(config.probe_timeout).map_err(RunError::HttpClient)?;
    let prober = HttpProber::new(client).with_user_agent(config.user_agent.clone());
    let checker = StatusChecker::new(prober);

    let store = FileStateStore::new(&config.state_file);
    let report = checker.run(&store, &targets).await?;
    tracing::debug!("State saved to {}", store.path().display());

    Ok(report)
}

/// Fails the run early if the mail utility is not installed.
async fn ensure_mail_available<R: CommandRunner>(mail: &MailNotifier<R>) -> Result<(), RunError> {
    if mail.is_available().await {
        return Ok(());
    }
    Err(ConfigError::MailUnavailable {
        program: MAIL_PROGRAM,
    }
    .into())
}

/// Creates the mail notifier from configuration.
fn create_mail<R>(config: &ValidatedConfig, runner: R) -> Option<MailNotifier<R>> {
    config.email.as_ref().map(|recipient| {
        MailNotifier::new(runner, recipient.as_str()).with_formatter(config.formatter.clone())
    })
}

/// Creates the Telegram notifier from configuration.
///
/// The Bot API call shares the probe timeout so a stalled endpoint cannot
/// hold the process once the state is saved.
fn create_telegram(
    config: &ValidatedConfig,
) -> Result<Option<TelegramNotifier<ReqwestClient>>, RunError> {
    let Some(TelegramConfig {
        chat_id,
        api_token,
        api_base,
    }) = config.telegram.as_ref()
    else {
        return Ok(None);
    };

    let client = ReqwestClient::with_timeout(config.probe_timeout).map_err(RunError::HttpClient)?;
    let notifier = TelegramNotifier::new(client, chat_id.as_str(), api_token.as_str())
        .with_api_base(api_base)
        .with_formatter(config.formatter.clone());

    Ok(Some(notifier))
}

/// Logs a summary of the report.
fn log_report(report: &ChangeReport, dry_run: bool) {
    if report.is_empty() {
        tracing::info!("No status changes detected");
        return;
    }

    tracing::info!("Detected {} status change(s)", report.len());

    match report.to_pretty_json() {
        Ok(json) if dry_run => tracing::info!("[DRY-RUN] Report:\n{json}"),
        Ok(json) => tracing::debug!("Report:\n{json}"),
        Err(e) => tracing::warn!("Failed to serialize report: {e}"),
    }
}
