//! Crawl outputs: progress events, saved text content, and statistics

mod events;
mod stats;
mod text;

pub use events::{NodeVisit, Progress, Reporter, TracingReporter};
pub use stats::{print_statistics, CrawlStats};
pub use text::{url_fingerprint, write_page_text};

use thiserror::Error;

/// Errors that can occur while writing crawl outputs
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
