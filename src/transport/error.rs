//! Error types for HTTP operations.

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Covers transport-level failures only. A response with any status code,
/// including 4xx and 5xx, is not an error at this layer.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// TLS handshake failures and redirect loops.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built from the given URL or headers.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The underlying client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl HttpError {
    /// Returns true if the error came from the network rather than from
    /// how the request was put together.
    #[cfg(test)]
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }
}
