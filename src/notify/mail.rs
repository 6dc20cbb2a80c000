//! Local `mail` program notifier.

use std::io;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::checker::ChangeReport;

use super::{MessageFormatter, NotificationSink, NotifyError};

/// Mail program invoked to deliver reports.
pub const MAIL_PROGRAM: &str = "mail";

/// What is kept from a finished external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited successfully.
    pub success: bool,
    /// Exit code, if the command exited normally.
    pub code: Option<i32>,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// A successful exit with no output.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            stderr: String::new(),
        }
    }

    /// A failed exit with `code`.
    #[must_use]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stderr: stderr.into(),
        }
    }
}

/// Abstraction over spawning external programs.
///
/// Lets the mail notifier be tested without a mail transfer agent.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args`, feeding `stdin` if given, and waits
    /// for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be spawned or its pipes fail.
    fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> impl std::future::Future<Output = io::Result<CommandOutput>> + Send;
}

/// Runs programs on the host with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> io::Result<CommandOutput> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn()?;

        if let Some(input) = stdin {
            if let Some(mut pipe) = child.stdin.take() {
                pipe.write_all(input.as_bytes()).await?;
                // Dropping the pipe sends EOF
            }
        }

        let output = child.wait_with_output().await?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Sends the report with `mail -s <subject> -- <recipient>`.
#[derive(Debug)]
pub struct MailNotifier<R = SystemCommandRunner> {
    runner: R,
    recipient: String,
    formatter: MessageFormatter,
}

impl<R> MailNotifier<R> {
    /// Creates a notifier mailing `recipient` through `runner`.
    #[must_use]
    pub fn new(runner: R, recipient: impl Into<String>) -> Self {
        Self {
            runner,
            recipient: recipient.into(),
            formatter: MessageFormatter::default(),
        }
    }

    /// Sets the message formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: MessageFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Returns the recipient address.
    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Returns the command runner.
    #[cfg(test)]
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: CommandRunner> MailNotifier<R> {
    /// Returns true if the mail program can be found on `PATH`.
    pub async fn is_available(&self) -> bool {
        let args = [MAIL_PROGRAM.to_string()];
        match self.runner.run("which", &args, None).await {
            Ok(output) => output.success,
            Err(e) => {
                tracing::debug!("Could not look up '{MAIL_PROGRAM}': {e}");
                false
            }
        }
    }
}

impl<R: CommandRunner> NotificationSink for MailNotifier<R> {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn notify(&self, report: &ChangeReport) -> Result<(), NotifyError> {
        if report.is_empty() {
            return Ok(());
        }

        let message = self.formatter.render(report)?;
        let args = [
            "-s".to_string(),
            message.title.clone(),
            // Ends option parsing so the address is never read as a flag
            "--".to_string(),
            self.recipient.clone(),
        ];

        let output = self
            .runner
            .run(MAIL_PROGRAM, &args, Some(&message.body))
            .await
            .map_err(|source| NotifyError::Spawn {
                program: MAIL_PROGRAM,
                source,
            })?;

        if output.success {
            return Ok(());
        }

        Err(NotifyError::CommandFailed {
            program: MAIL_PROGRAM,
            code: output.code,
            stderr: output.stderr,
        })
    }
}
