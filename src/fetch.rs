//! HTTP fetching with a fixed browser identity and timeout.
//!
//! All outbound requests in this crate go through [`Fetcher`]. A failed fetch
//! is never fatal: callers log a warning and treat the error as "no data
//! available", so a dead source or a flaky article page cannot abort a run.

use crate::config::FetchConfig;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, instrument};

/// Why a fetch produced no text.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure, timeout, or a body that could not be read.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },
}

/// Thin wrapper over a shared [`reqwest::Client`] configured from a
/// [`FetchConfig`].
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Build a fetcher with the configured User-Agent and timeout.
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }

    /// GET a URL and return the response body as text.
    ///
    /// Non-2xx statuses are reported as [`FetchError::Status`]; everything
    /// else that can go wrong on the wire is [`FetchError::Transport`].
    #[instrument(level = "debug", skip(self))]
    pub async fn text(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        debug!(bytes = body.len(), "Fetched body");
        Ok(body)
    }
}
