//! Blocking client for the Bookshare webservice API.
//!
//! # Overview
//! Builds one authenticated GET per call against a configured host (default
//! `api.bookshare.org`) and hands back either the raw response stream or its
//! trimmed text. The account password never travels in clear: the client
//! sends its uppercase hex MD5 in the `X-password` header.
//!
//! # Design
//! - `WebserviceClient` is immutable after construction and safe to share.
//! - `build_request` resolves URL and headers without I/O; `fetch_stream`
//!   executes it with `ureq`; `fetch_string` reads the stream to text.
//! - HTTP error statuses are data, not errors. The caller checks
//!   `ResponseStream::status`.
//! - Body read failures in `fetch_string` follow `ReadMode`: best-effort
//!   (log, return partial text) by default, or strict.
//! - Response parsing (XML/JSON) is left to the caller.

pub mod body;
pub mod client;
pub mod config;
pub mod digest;
pub mod error;
pub mod http;

pub use client::WebserviceClient;
pub use config::{ClientConfig, ReadMode, DEFAULT_HOST};
pub use digest::{digest, digest_utf8};
pub use error::ApiError;
pub use http::{HttpRequest, ResponseStream, PASSWORD_HEADER};
