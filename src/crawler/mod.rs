//! Crawl engine: fetching, extraction, session tracking, and orchestration

mod extractor;
mod fetcher;
mod orchestrator;
mod session;

pub use extractor::{
    element_by_id, extract_assets, extract_content, extract_links, LinkFilter, Selectors,
};
pub use fetcher::{build_http_client, fetch_bytes, fetch_page, FetchOutcome};
pub use orchestrator::Orchestrator;
pub use session::CrawlSession;

use crate::config::Config;
use crate::output::CrawlStats;
use crate::KumoError;

/// Runs a complete crawl for the given configuration.
///
/// Builds the HTTP client, compiles the selectors, walks the site from the
/// seed URL, and returns the final statistics. Configuration problems are
/// the only fatal errors; once traversal starts, per-node failures are
/// recorded and absorbed.
pub async fn crawl(config: Config) -> Result<CrawlStats, KumoError> {
    let mut orchestrator = Orchestrator::new(config)?;
    orchestrator.run().await
}
