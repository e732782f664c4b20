//! JSON over HTTP.
//!
//! External sources only ever need "GET a URL, parse the body as JSON".
//! That is behind [`Fetch`] so caches can be exercised without a network.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Errors fetching or decoding a single external record.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid JSON response")]
    Json(#[source] std::io::Error),

    #[error("unexpected response: {0}")]
    Payload(String),
}

/// Something that can GET a URL and decode the body as JSON.
pub trait Fetch {
    fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// [`Fetch`] over a real HTTP agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("hovertip/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build();
        Self { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetcher {
    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.agent.get(url).call().map_err(|err| match err {
            ureq::Error::Status(code, _) => FetchError::Status(code),
            err => FetchError::Transport(err.to_string()),
        })?;
        response.into_json().map_err(FetchError::Json)
    }
}
