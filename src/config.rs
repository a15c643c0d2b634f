//! Runtime configuration passed explicitly into components.
//!
//! Nothing in this crate reads ambient globals for its network identity; the
//! [`FetchConfig`] is constructed once (usually via `Default`) and handed to
//! the [`Fetcher`](crate::fetch::Fetcher) at build time.

use std::time::Duration;

/// The browser identity sent with every outbound request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Per-request timeout applied to every fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// HTTP client settings for the [`Fetcher`](crate::fetch::Fetcher).
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User-Agent header value sent with every request.
    pub user_agent: String,
    /// Hard timeout for a single request, connect through body.
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
