//! HTTP GET prober.

use http::HeaderValue;
use http::header::USER_AGENT;

use crate::targets::Target;
use crate::transport::{HttpClient, HttpRequest};

use super::{ProbeError, ProbeOutcome, Prober};

/// User agent sent with every probe unless configured otherwise.
///
/// Some sites answer unknown clients differently from browsers, which would
/// show up as spurious status changes.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";

/// Probes targets with a single GET request.
///
/// Only the status line matters: the body is never read, so a slow or
/// endless body cannot turn an answer into a timeout.
///
/// Redirect following and timeouts are properties of the client `H`;
/// [`ReqwestClient::with_timeout`] provides both.
///
/// [`ReqwestClient::with_timeout`]: crate::transport::ReqwestClient::with_timeout
#[derive(Debug)]
pub struct HttpProber<H> {
    client: H,
    user_agent: HeaderValue,
}

impl<H> HttpProber<H> {
    /// Creates a prober using [`DEFAULT_USER_AGENT`].
    #[must_use]
    pub fn new(client: H) -> Self {
        Self {
            client,
            user_agent: HeaderValue::from_static(DEFAULT_USER_AGENT),
        }
    }

    /// Sets the user agent header value.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: HeaderValue) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Returns the configured user agent.
    #[cfg(test)]
    #[must_use]
    pub const fn user_agent(&self) -> &HeaderValue {
        &self.user_agent
    }

    fn build_request(&self, target: &Target) -> Result<HttpRequest, ProbeError> {
        let url = url::Url::parse(target.as_str()).map_err(|e| ProbeError::InvalidTarget {
            target: target.to_string(),
            reason: e.to_string(),
        })?;

        Ok(HttpRequest::get(url)
            .with_header(USER_AGENT, self.user_agent.clone())
            .status_only())
    }
}

impl<H: HttpClient> HttpProber<H> {
    async fn fetch_status(&self, target: &Target) -> Result<u16, ProbeError> {
        let request = self.build_request(target)?;
        let response = self.client.request(request).await?;
        Ok(response.status.as_u16())
    }
}

impl<H: HttpClient> Prober for HttpProber<H> {
    async fn probe(&self, target: &Target) -> ProbeOutcome {
        self.fetch_status(target).await.into()
    }
}
