//! Production HTTP client implementation using reqwest.

use std::time::Duration;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse, ReadMode};

/// Maximum number of redirects followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// Production HTTP client using reqwest.
///
/// Follows up to [`MAX_REDIRECTS`] redirects, so the status reported for a
/// probe is the status of the final hop.
///
/// # Example
///
/// ```no_run
/// use net_sentinel::transport::{ReqwestClient, HttpClient, HttpRequest};
/// use std::time::Duration;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::with_timeout(Duration::from_secs(10))?;
/// let url = Url::parse("https://example.com/")?;
/// let response = client.request(HttpRequest::get(url)).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new HTTP client with reqwest's default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates a client that aborts any request taking longer than `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Build`] if the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpError::Build(Box::new(e)))?;

        Ok(Self { inner })
    }

    /// Creates an HTTP client from an existing reqwest client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a reqwest failure, dropping the URL so path-embedded credentials
/// never reach error messages.
fn map_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidRequest(e.without_url().to_string())
    } else {
        HttpError::Connection(Box::new(e.without_url()))
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_error)?;

        let status = response.status();
        let headers = response.headers().clone();

        // Dropping the response closes the connection without reading the body
        let body = match req.read {
            ReadMode::StatusOnly => Vec::new(),
            ReadMode::Full => response.bytes().await.map_err(map_error)?.to_vec(),
        };

        Ok(HttpResponse::new(status, headers, body))
    }
}
