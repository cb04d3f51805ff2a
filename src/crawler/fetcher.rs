//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured timeout and user agent
//! - GET requests with redirects followed by the client
//! - Classifying every outcome so no error escapes a single fetch

use crate::config::CrawlerConfig;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::fmt;
use std::time::Duration;

/// Maximum number of redirect hops followed for one request
pub const MAX_REDIRECTS: usize = 10;

/// User agent sent when the configuration does not name one
pub const DEFAULT_USER_AGENT: &str = concat!("pagemap/", env!("CARGO_PKG_VERSION"));

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered 200 OK
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Content-Type header value (empty when missing)
        content_type: String,
        /// Response body, decoded as text
        body: String,
    },

    /// Any status other than 200; the page is skipped
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Transport failure (timeout, refused connection, unreadable body)
    NetworkError {
        /// Error description
        error: String,
        /// Failure class
        kind: NetworkErrorKind,
    },
}

/// Classification of transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Timeout,
    Connect,
    Redirect,
    Body,
    Other,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Redirect => "redirect",
            Self::Body => "body",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (timeout and user agent)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use pagemap::config::CrawlerConfig;
/// use pagemap::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 | `Success` with the body |
/// | Any other status | `HttpError` |
/// | Timeout | `NetworkError` (`Timeout`) |
/// | Connection failure | `NetworkError` (`Connect`) |
/// | Too many redirects | `NetworkError` (`Redirect`) |
/// | Body read failure | `NetworkError` (`Body`) |
///
/// The body is not inspected: every 200 response is returned regardless of
/// its content type.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            content_type,
            body,
        },
        Err(e) => {
            let mut result = classify_error(&e);
            if let FetchResult::NetworkError { kind, .. } = &mut result {
                if *kind == NetworkErrorKind::Other {
                    *kind = NetworkErrorKind::Body;
                }
            }
            result
        }
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let kind = if e.is_timeout() {
        NetworkErrorKind::Timeout
    } else if e.is_connect() {
        NetworkErrorKind::Connect
    } else if e.is_redirect() {
        NetworkErrorKind::Redirect
    } else if e.is_body() || e.is_decode() {
        NetworkErrorKind::Body
    } else {
        NetworkErrorKind::Other
    };

    FetchResult::NetworkError {
        error: e.to_string(),
        kind,
    }
}
