//! Session-wide visited/failed tracking
//!
//! One [`CrawlSession`] lives for the duration of a crawl and is threaded
//! explicitly through the orchestration; nothing here is global or
//! persisted.

use std::collections::HashSet;

/// Tracks which URLs the traversal has committed to and which failed
#[derive(Debug, Default)]
pub struct CrawlSession {
    /// Normalized URLs for which traversal has begun; grow-only
    visited: HashSet<String>,

    /// Original URLs whose fetch or processing failed
    failed: HashSet<String>,
}

impl CrawlSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits traversal to a normalized URL.
    ///
    /// Returns true if the URL was new; false means it was already claimed
    /// and the caller must skip it. The insert happens before any fetch, so
    /// a later sibling rediscovering the same URL is rejected immediately.
    pub fn begin_visit(&mut self, normalized_url: &str) -> bool {
        self.visited.insert(normalized_url.to_string())
    }

    /// True if traversal has already begun for this normalized URL
    pub fn is_visited(&self, normalized_url: &str) -> bool {
        self.visited.contains(normalized_url)
    }

    /// Records a fetch/processing failure for an original (non-normalized) URL
    pub fn record_failure(&mut self, url: &str) {
        self.failed.insert(url.to_string());
    }

    /// True if this original URL failed at some point during the crawl
    pub fn has_failed(&self, url: &str) -> bool {
        self.failed.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}
