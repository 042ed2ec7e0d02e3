//! HTTP request and response types.
//!
//! # Design
//! `HttpRequest` is the fully resolved GET as plain data: the client builds it
//! before touching the network, so URI handling and header selection can be
//! tested without a server. `ResponseStream` is the other end: a lazily read
//! body that the caller owns. Dropping it (or calling `close`) releases the
//! underlying connection, and ownership guarantees that happens exactly once.

use std::fmt;
use std::io::{self, Read};

use crate::body::read_body;
use crate::config::ReadMode;
use crate::error::ApiError;

/// Header carrying the password digest.
pub const PASSWORD_HEADER: &str = "X-password";

/// A GET request described as plain data.
///
/// Built by `WebserviceClient::build_request` and executed by
/// `WebserviceClient::fetch_stream`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// The body of a response, read on demand, plus its status line and headers.
///
/// Any status, including 4xx and 5xx, produces a stream; check `status()`.
pub struct ResponseStream {
    status: u16,
    headers: Vec<(String, String)>,
    body: Box<dyn Read + Send>,
}

impl ResponseStream {
    pub fn new<R>(status: u16, headers: Vec<(String, String)>, body: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            status,
            headers,
            body: Box::new(body),
        }
    }

    pub(crate) fn from_response(response: ureq::http::Response<ureq::Body>) -> Self {
        let (parts, body) = response.into_parts();
        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        Self::new(parts.status.as_u16(), headers, body.into_reader())
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Read the rest of the body as trimmed text, then release the stream.
    pub fn into_string(self, mode: ReadMode) -> Result<String, ApiError> {
        read_body(self.body, mode)
    }

    /// Release the stream without reading the rest of the body.
    pub fn close(self) {
        drop(self);
    }
}

impl Read for ResponseStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.body.read(buf)
    }
}

impl fmt::Debug for ResponseStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseStream")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
