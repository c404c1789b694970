// src/fetch/mod.rs
// =============================================================================
// This module fetches page bodies over HTTP.
//
// Key functionality:
// - The Fetcher trait: the one seam the crawl coordinator fetches through,
//   so tests can substitute a canned-page fetcher for the real network
// - HttpFetcher: the reqwest-backed implementation with a per-request
//   timeout
// - FetchError: a tagged error kind the coordinator matches exhaustively,
//   instead of sniffing exception types
//
// Every failure here is non-fatal: the coordinator logs the category and
// abandons that one URL. Nothing in this module can take a worker down.
//
// Rust concepts:
// - Traits with async methods (impl Future return type)
// - Enums as error taxonomies, with Display for log lines
// =============================================================================

use reqwest::Client;
use std::fmt;
use std::future::Future;
use std::time::Duration;

// What went wrong while fetching one URL.
//
// The variants mirror the failure categories worth telling apart in the
// logs; everything reqwest reports collapses into one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request exceeded the configured timeout
    Timeout,
    /// The remote host refused (or dropped) the connection
    ConnectionRefused,
    /// The server answered, but not with a usable page (bad status,
    /// undecodable body, redirect loop)
    Protocol(String),
    /// Anything else: DNS failures, TLS errors, malformed URLs
    Other(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Timeout => write!(f, "request timed out"),
            FetchError::ConnectionRefused => write!(f, "connection refused"),
            FetchError::Protocol(detail) => write!(f, "protocol error: {}", detail),
            FetchError::Other(detail) => write!(f, "fetch error: {}", detail),
        }
    }
}

impl std::error::Error for FetchError {}

// The fetch capability the coordinator depends on.
//
// Send is required on the returned future because workers run as spawned
// tokio tasks.
pub trait Fetcher: Send + Sync {
    fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

// The real, network-backed fetcher.
//
// One Client is built up front and reused for every request (connection
// pooling); the timeout is applied per request so the coordinator stays
// in charge of it.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("crawlbound/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Other(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Protocol(format!("HTTP {}", status.as_u16())));
        }

        response.text().await.map_err(categorize_error)
    }
}

// Maps a reqwest error onto our taxonomy.
//
// reqwest errors can happen for many reasons: timeouts, DNS failures,
// refused connections, TLS problems, redirect loops. We probe the
// structured predicates first and fall back to the error text.
fn categorize_error(error: reqwest::Error) -> FetchError {
    let error_string = error.to_string();

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::Protocol("too many redirects".to_string())
    } else if error.is_connect() {
        if error_string.contains("refused") {
            FetchError::ConnectionRefused
        } else {
            // Connection errors also cover DNS and unreachable hosts
            FetchError::Other(error_string)
        }
    } else if error.is_decode() || error.is_status() {
        FetchError::Protocol(error_string)
    } else {
        FetchError::Other(error_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_categories() {
        assert_eq!(FetchError::Timeout.to_string(), "request timed out");
        assert_eq!(FetchError::ConnectionRefused.to_string(), "connection refused");
        assert_eq!(
            FetchError::Protocol("HTTP 404".to_string()).to_string(),
            "protocol error: HTTP 404"
        );
        assert!(FetchError::Other("dns".to_string()).to_string().contains("dns"));
    }

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpFetcher::new().is_ok());
    }
}
