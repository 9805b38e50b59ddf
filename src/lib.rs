//! Kumo-Harvest: a depth-bounded website harvester
//!
//! This crate implements a crawler that walks a site from a seed URL,
//! saves extractable text for every page, downloads selected asset types
//! with content-addressed deduplication, and records the traversal as a
//! page tree.

pub mod config;
pub mod crawler;
pub mod files;
pub mod output;
pub mod state;
pub mod tree;
pub mod url;

use thiserror::Error;

/// Main error type for Kumo-Harvest operations
#[derive(Debug, Error)]
pub enum KumoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// The only fatal errors in the crate; they can occur solely before the
/// first node is visited.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for Kumo-Harvest operations
pub type Result<T> = std::result::Result<T, KumoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Orchestrator;
pub use state::PageState;
pub use tree::{PageId, PageNode, PageTree};
pub use url::{absolutize, extract_domain, is_crawlable, normalize, same_domain};
