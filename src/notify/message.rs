//! Rendering a change report into a human-readable message.

use handlebars::Handlebars;
use serde::Serialize;

use crate::checker::ChangeReport;
use crate::state::Observation;

use super::NotifyError;

/// Title used for the chat message and the mail subject.
pub const DEFAULT_TITLE: &str = "🛡️👺 NetSentinel - Reported Changes";

/// A rendered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Short title (mail subject, first line of a chat message)
    pub title: String,
    /// Report body
    pub body: String,
}

impl Message {
    /// Title and body separated by a blank line.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{}\n\n{}", self.title, self.body)
    }
}

/// Variables available to a body template.
#[derive(Serialize)]
struct TemplateData<'a> {
    title: &'a str,
    count: usize,
    report: &'a str,
    changes: &'a [Observation],
}

/// Turns a [`ChangeReport`] into a [`Message`].
///
/// The default body is the report as pretty-printed JSON. A Handlebars
/// template can replace it; available variables:
/// - `title`: the message title
/// - `count`: number of changed targets
/// - `report`: the pretty-printed JSON report
/// - `changes`: array of observations (`name`, `status`,
///   `statusChangedRecently`, `last_checked`)
///
/// Output is not HTML-escaped.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    title: String,
    template: Option<String>,
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            template: None,
        }
    }
}

impl MessageFormatter {
    /// Creates a formatter with the default title and JSON body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the body template.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Checks that `template` compiles.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Render`] with the Handlebars error message.
    pub fn validate_template(template: &str) -> Result<(), NotifyError> {
        let data = TemplateData {
            title: DEFAULT_TITLE,
            count: 0,
            report: "[]",
            changes: &[],
        };
        Self::handlebars()
            .render_template(template, &data)
            .map(|_| ())
            .map_err(|e| NotifyError::Render(e.to_string()))
    }

    /// Renders `report`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Render`] if the report cannot be serialized
    /// or the template fails to render.
    pub fn render(&self, report: &ChangeReport) -> Result<Message, NotifyError> {
        let json = report
            .to_pretty_json()
            .map_err(|e| NotifyError::Render(e.to_string()))?;

        let body = match &self.template {
            None => json,
            Some(template) => {
                let data = TemplateData {
                    title: &self.title,
                    count: report.len(),
                    report: &json,
                    changes: report.entries(),
                };
                Self::handlebars()
                    .render_template(template, &data)
                    .map_err(|e| NotifyError::Render(e.to_string()))?
            }
        };

        Ok(Message {
            title: self.title.clone(),
            body,
        })
    }

    fn handlebars() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }
}
