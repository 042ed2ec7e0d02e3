//! Client configuration.
//!
//! # Design
//! A `ClientConfig` is captured by value when a `WebserviceClient` is built
//! and never changes afterward, so one client can be shared across threads.
//! Every field has a default, which lets callers load a partial JSON document.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "api.bookshare.org";

/// What `fetch_string` does when the body fails mid-read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
    /// Log the error and return what was read so far.
    #[default]
    BestEffort,
    /// Fail with `ApiError::Read`.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Target host, optionally with `:port`.
    pub host: String,
    /// Global transport timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub read_mode: ReadMode,
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            timeout_secs: None,
            read_mode: ReadMode::default(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    pub fn with_host(host: &str) -> Self {
        Self {
            host: host.trim().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
