//! Blocking client for the Bookshare webservice.
//!
//! # Design
//! `WebserviceClient` holds an immutable `ClientConfig` and a `ureq::Agent`;
//! there is no state shared between calls beyond the agent's connection pool,
//! so one client can be used from many threads. Every fetch is split into
//! `build_request`, which resolves the URL and headers without I/O, and the
//! single GET that executes it. Statuses are never interpreted here.

use std::fmt;

use ureq::http::uri::{Authority, Uri};

use crate::config::ClientConfig;
use crate::digest;
use crate::error::ApiError;
use crate::http::{HttpRequest, ResponseStream, PASSWORD_HEADER};

#[derive(Clone)]
pub struct WebserviceClient {
    config: ClientConfig,
    agent: ureq::Agent,
}

impl WebserviceClient {
    /// Client bound to `api.bookshare.org`.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Client bound to `host` (`name` or `name:port`).
    pub fn with_host(host: &str) -> Self {
        Self::with_config(ClientConfig::with_host(host))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .build()
            .new_agent();
        Self { config, agent }
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Uppercase hex MD5 of `secret`, as sent in the `X-password` header.
    pub fn digest(secret: &str) -> String {
        digest::digest(secret)
    }

    /// Resolve `request_uri` against the configured host without sending
    /// anything.
    ///
    /// The scheme comes from the URI (default `http`), the authority from the
    /// configured host, and the path and query from the URI. A port in the
    /// URI is kept only when the host does not name one. A bare authority
    /// such as `foo` or `host:8080` names no resource and is rejected.
    pub fn build_request(
        &self,
        password: Option<&str>,
        request_uri: &str,
    ) -> Result<HttpRequest, ApiError> {
        let uri: Uri = request_uri
            .parse()
            .map_err(|e| ApiError::uri_syntax(request_uri, e))?;
        if uri.scheme().is_none() && uri.authority().is_some() {
            return Err(ApiError::uri_syntax(
                request_uri,
                "expected a path or an absolute URI",
            ));
        }
        let host: Authority = self
            .config
            .host
            .parse()
            .map_err(|e| ApiError::uri_syntax(&self.config.host, e))?;

        let scheme = uri.scheme_str().unwrap_or("http");
        let authority = match (host.port_u16(), uri.port_u16()) {
            (None, Some(port)) => format!("{}:{port}", host.host()),
            _ => host.to_string(),
        };
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .filter(|pq| !pq.is_empty())
            .unwrap_or("/");

        let mut headers = Vec::new();
        if let Some(password) = password {
            headers.push((PASSWORD_HEADER.to_string(), digest::digest(password)));
        }
        if let Some(agent) = &self.config.user_agent {
            headers.push(("User-Agent".to_string(), agent.clone()));
        }

        Ok(HttpRequest {
            url: format!("{scheme}://{authority}{path_and_query}"),
            headers,
        })
    }

    /// Send one GET and hand the unread body to the caller.
    ///
    /// Fails only on URI or transport errors. The caller owns the returned
    /// stream and should check its status.
    pub fn fetch_stream(
        &self,
        password: Option<&str>,
        request_uri: &str,
    ) -> Result<ResponseStream, ApiError> {
        let request = self.build_request(password, request_uri)?;
        tracing::debug!(url = %request.url, authenticated = password.is_some(), "GET");

        let mut builder = self.agent.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let response = builder.call().map_err(|e| {
            tracing::debug!(url = %request.url, error = %e, "request failed");
            ApiError::from(e)
        })?;

        let stream = ResponseStream::from_response(response);
        tracing::debug!(url = %request.url, status = stream.status(), "response received");
        Ok(stream)
    }

    /// `fetch_stream`, then read the whole body as trimmed text.
    ///
    /// Read failures follow the configured `ReadMode`. The stream is released
    /// before this returns, whatever the outcome.
    pub fn fetch_string(&self, password: Option<&str>, request_uri: &str) -> Result<String, ApiError> {
        self.fetch_stream(password, request_uri)?
            .into_string(self.config.read_mode)
    }
}

impl Default for WebserviceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WebserviceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebserviceClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
