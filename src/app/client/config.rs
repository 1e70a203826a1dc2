//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the HTTP
//! clients used against the lesson catalog backend and the file hosts
//! behind signed download URLs.

use std::time::Duration;

use reqwest::Client;

use crate::constants::http;
use crate::errors::{ApiError, ApiResult};

/// Configuration for HTTP client behavior
///
/// Connect, read and write phases are bounded so a stalled connection
/// cannot hang a screen; a timeout is terminal, there is no retry.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Overall timeout for API requests
    pub request_timeout: Duration,
    /// Overall timeout for signed-URL file downloads
    pub download_timeout: Duration,
    /// TCP keep-alive settings
    pub tcp_keepalive: Option<Duration>,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
    /// Maximum number of connections per host
    pub pool_max_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: http::CONNECT_TIMEOUT,
            request_timeout: http::REQUEST_TIMEOUT,
            download_timeout: http::DOWNLOAD_TIMEOUT,
            tcp_keepalive: Some(http::TCP_KEEPALIVE),
            tcp_nodelay: true,
            pool_max_per_host: http::POOL_MAX_PER_HOST,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client used for API requests
    pub fn build_api_client(&self) -> ApiResult<Client> {
        self.build_with_timeout(self.request_timeout)
    }

    /// Builds the HTTP client used for signed-URL downloads
    ///
    /// Download bodies can be large, so the overall timeout is wider than
    /// for API calls. This client never carries default headers; the
    /// signed URL itself is the access capability.
    pub fn build_download_client(&self) -> ApiResult<Client> {
        self.build_with_timeout(self.download_timeout)
    }

    fn build_with_timeout(&self, timeout: Duration) -> ApiResult<Client> {
        let mut client_builder = Client::builder()
            .timeout(timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(http::USER_AGENT)
            .tcp_nodelay(self.tcp_nodelay)
            .pool_max_idle_per_host(self.pool_max_per_host);

        // Configure TCP keep-alive if specified
        if let Some(keepalive) = self.tcp_keepalive {
            client_builder = client_builder.tcp_keepalive(keepalive);
        }

        client_builder.build().map_err(ApiError::Transport)
    }
}
