//! Telegram Bot API notifier.

use std::fmt;

use serde::Serialize;

use crate::checker::ChangeReport;
use crate::transport::{HttpClient, HttpRequest};

use super::{MessageFormatter, NotificationSink, NotifyError};

/// Default Bot API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Posts the report to a Telegram chat through `sendMessage`.
///
/// The bot token is part of the request URL, so it is kept out of the
/// `Debug` output.
pub struct TelegramNotifier<H> {
    client: H,
    chat_id: String,
    api_token: String,
    api_base: String,
    formatter: MessageFormatter,
}

impl<H> fmt::Debug for TelegramNotifier<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .field("api_token", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl<H> TelegramNotifier<H> {
    /// Creates a notifier for `chat_id` using the public Bot API.
    #[must_use]
    pub fn new(client: H, chat_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            client,
            chat_id: chat_id.into(),
            api_token: api_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            formatter: MessageFormatter::default(),
        }
    }

    /// Sets the Bot API base URL (for self-hosted Bot API servers).
    #[must_use]
    pub fn with_api_base(mut self, api_base: &url::Url) -> Self {
        self.api_base = api_base.to_string();
        self
    }

    /// Sets the message formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: MessageFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Returns the chat identifier.
    #[must_use]
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Returns the `sendMessage` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::InvalidEndpoint`] if the token makes the URL
    /// unparsable.
    pub fn endpoint(&self) -> Result<url::Url, NotifyError> {
        let base = self.api_base.trim_end_matches('/');
        let endpoint = format!("{base}/bot{}/sendMessage", self.api_token);
        url::Url::parse(&endpoint).map_err(|e| NotifyError::InvalidEndpoint(e.to_string()))
    }
}

impl<H: HttpClient> NotificationSink for TelegramNotifier<H> {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn notify(&self, report: &ChangeReport) -> Result<(), NotifyError> {
        if report.is_empty() {
            return Ok(());
        }

        let message = self.formatter.render(report)?;
        let text = message.text();
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text: &text,
        };
        let request = HttpRequest::post(self.endpoint()?).with_json(&payload)?;

        let response = self.client.request(request).await?;
        if response.is_success() {
            return Ok(());
        }

        Err(NotifyError::Rejected {
            status: response.status,
            body: response.body_text().map(ToString::to_string),
        })
    }
}
