//! Notification channels for change reports.
//!
//! This module provides:
//! - The sink abstraction ([`NotificationSink`])
//! - Chat delivery through the Telegram Bot API ([`TelegramNotifier`])
//! - Mail delivery through the local `mail` program ([`MailNotifier`])
//! - Report rendering ([`MessageFormatter`])
//! - Failure-tolerant dispatch ([`deliver`])
//!
//! Every sink is a no-op for an empty report: no request is sent and no
//! process is spawned.

mod mail;
mod message;
mod telegram;


pub use mail::{CommandOutput, CommandRunner, MAIL_PROGRAM, MailNotifier, SystemCommandRunner};
pub use message::{DEFAULT_TITLE, Message, MessageFormatter};
pub use telegram::{DEFAULT_API_BASE, TelegramNotifier};

use thiserror::Error;

use crate::checker::ChangeReport;
use crate::transport::HttpError;

/// Error delivering a notification.
///
/// Never fatal to a run: the state is already saved by the time reports
/// are sent.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The report could not be turned into a message.
    #[error("Failed to render report: {0}")]
    Render(String),

    /// The chat endpoint URL could not be built.
    #[error("Invalid notification endpoint: {0}")]
    InvalidEndpoint(String),

    /// The HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// The server answered with a non-2xx status.
    #[error("Rejected with HTTP {status}{}", detail(body.as_deref()))]
    Rejected {
        /// HTTP status code
        status: http::StatusCode,
        /// Response body, if valid UTF-8
        body: Option<String>,
    },

    /// The external program could not be started.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        /// Program name
        program: &'static str,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The external program exited unsuccessfully.
    #[error("'{program}' exited with {}{}", exit_reason(*code), detail(Some(stderr.as_str())))]
    CommandFailed {
        /// Program name
        program: &'static str,
        /// Exit code, `None` if killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },
}

fn exit_reason(code: Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}"))
}

fn detail(text: Option<&str>) -> String {
    match text {
        Some(t) if !t.is_empty() => format!(": {t}"),
        _ => String::new(),
    }
}

/// A channel that can deliver a change report.
pub trait NotificationSink: Send + Sync {
    /// Short channel name for logs.
    fn name(&self) -> &'static str;

    /// Delivers `report`. Returns `Ok` without doing anything if the
    /// report is empty.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if rendering or delivery fails.
    fn notify(
        &self,
        report: &ChangeReport,
    ) -> impl std::future::Future<Output = Result<(), NotifyError>> + Send;
}

/// What [`deliver`] did with a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The report was empty.
    Skipped,
    /// Dry-run mode; nothing was sent.
    DryRun,
    /// The sink accepted the report.
    Sent,
    /// The sink failed; the error was logged.
    Failed,
}

/// Hands `report` to `sink`, logging the result instead of returning errors.
pub async fn deliver<N: NotificationSink>(sink: &N, report: &ChangeReport, dry_run: bool) -> Delivery {
    if report.is_empty() {
        tracing::debug!("No changes, {} notification skipped", sink.name());
        return Delivery::Skipped;
    }

    if dry_run {
        tracing::info!(
            "Dry-run: would send {} change(s) via {}",
            report.len(),
            sink.name()
        );
        return Delivery::DryRun;
    }

    match sink.notify(report).await {
        Ok(()) => {
            tracing::info!("Report sent via {}", sink.name());
            Delivery::Sent
        }
        Err(e) => {
            tracing::error!("Failed to send report via {}: {e}", sink.name());
            Delivery::Failed
        }
    }
}
