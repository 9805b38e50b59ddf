//! HTTP transport for page and asset retrieval
//!
//! Builds the shared HTTP client and wraps requests into explicit outcome
//! types; nothing in here raises past its boundary.

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;

/// Result of fetching a page
#[derive(Debug)]
pub enum FetchOutcome {
    /// Page fetched with a 2xx status and a non-empty body
    Success {
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Anything else: network error, timeout, non-2xx status, empty body
    Failed {
        /// Human-readable failure description
        reason: String,
    },
}

/// Builds the HTTP client used for every request of a run
///
/// The user agent is formatted `name/version (+contact-url; contact-email)`.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body.
///
/// A timed-out request is indistinguishable from any other failed fetch;
/// an empty body counts as a failure because there is nothing to extract.
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            if !status.is_success() {
                return FetchOutcome::Failed {
                    reason: format!("HTTP {}", status.as_u16()),
                };
            }
            match response.text().await {
                Ok(body) if body.trim().is_empty() => FetchOutcome::Failed {
                    reason: "empty response body".to_string(),
                },
                Ok(body) => FetchOutcome::Success {
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchOutcome::Failed {
                    reason: e.to_string(),
                },
            }
        }
        Err(e) => FetchOutcome::Failed {
            reason: classify_error(&e),
        },
    }
}

/// Fetches raw bytes for an asset download.
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, String> {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            if !status.is_success() {
                return Err(format!("HTTP {}", status.as_u16()));
            }
            response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .map_err(|e| e.to_string())
        }
        Err(e) => Err(classify_error(&e)),
    }
}

fn classify_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        "connection refused".to_string()
    } else {
        error.to_string()
    }
}
