//! Plain request/response values exchanged with an [`HttpClient`].

use serde::Serialize;

use super::HttpError;

/// How much of the response a caller needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// Buffer the whole body (notifier replies are small).
    #[default]
    Full,
    /// Stop once the status line and headers are in; the body is discarded
    /// unread.
    StatusOnly,
}

/// Outgoing request built by a prober or notifier.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Verb
    pub method: http::Method,
    /// Absolute endpoint, may carry credentials in the path
    pub url: url::Url,
    /// Extra headers
    pub headers: http::HeaderMap,
    /// Raw payload, `None` for GET
    pub body: Option<Vec<u8>>,
    /// Whether the client reads past the headers
    pub read: ReadMode,
}

impl HttpRequest {
    /// Starts a request with no headers and no payload.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
            read: ReadMode::Full,
        }
    }

    /// GET `url`.
    #[must_use]
    pub fn get(url: url::Url) -> Self {
        Self::new(http::Method::GET, url)
    }

    /// POST to `url`.
    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self::new(http::Method::POST, url)
    }

    /// Asks the client to return as soon as the status is known.
    #[must_use]
    pub const fn status_only(mut self) -> Self {
        self.read = ReadMode::StatusOnly;
        self
    }

    /// Encodes `payload` as JSON and marks the body `application/json`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] if `payload` does not serialize.
    pub fn with_json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self, HttpError> {
        let body =
            serde_json::to_vec(payload).map_err(|e| HttpError::InvalidRequest(e.to_string()))?;
        self.headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        self.body = Some(body);
        Ok(self)
    }

    /// Appends `name: value`, keeping earlier values for the same name.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }
}

/// What came back from the server.
///
/// `body` is empty for [`ReadMode::StatusOnly`] requests.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status of the last hop once redirects are followed
    pub status: http::StatusCode,
    /// Headers of the last hop
    pub headers: http::HeaderMap,
    /// Buffered payload
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Assembles a response from its parts.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A bare response carrying only `status`.
    #[must_use]
    pub fn with_status(status: http::StatusCode) -> Self {
        Self::new(status, http::HeaderMap::new(), Vec::new())
    }

    /// 2xx check.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The payload as text, `None` when it is not UTF-8.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Sends one request and waits for the answer.
///
/// Probes and the chat notifier only see this trait, so they run against
/// scripted clients in tests.
pub trait HttpClient: Send + Sync {
    /// Sends `req`. Any status code, 4xx and 5xx included, is a response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Connection`] or [`HttpError::Timeout`] for
    /// network failures and [`HttpError::InvalidRequest`] when `req`
    /// cannot be sent at all.
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}
