//! Error types for the Bookshare webservice client.
//!
//! # Design
//! URI and encoding problems are detected before any I/O and never reach the
//! network. Transport failures surface as `Network` with no retry. Non-2xx
//! statuses are not errors at all: the caller reads the status from the
//! returned stream. `Read` only appears when the client runs in strict read
//! mode; the default best-effort mode logs and keeps the partial body.

use thiserror::Error;

/// Errors returned by `WebserviceClient` and the digest helpers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request URI (or the configured host) could not be parsed.
    #[error("invalid request URI {uri:?}: {message}")]
    UriSyntax { uri: String, message: String },

    /// Connection, DNS, TLS or timeout failure while sending the request.
    #[error("network error: {0}")]
    Network(String),

    /// Digest input was not valid UTF-8.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Reading the response body failed (strict read mode only).
    #[error("failed to read response body: {0}")]
    Read(String),
}

impl ApiError {
    pub(crate) fn uri_syntax(uri: &str, message: impl ToString) -> Self {
        ApiError::UriSyntax {
            uri: uri.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}
