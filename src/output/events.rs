//! Progress events emitted by the orchestrator
//!
//! The surrounding CLI/UI consumes these through the [`Reporter`] trait;
//! the default implementation logs through `tracing`.

use crate::state::PageState;

/// Emitted once per node when its state becomes terminal
#[derive(Debug)]
pub struct NodeVisit<'a> {
    /// The node's original URL
    pub url: &'a str,

    /// Terminal state the node reached
    pub state: PageState,

    /// Links discovered on the page (zero unless the visit succeeded)
    pub links_found: usize,

    /// The node's depth in the page tree
    pub depth: u32,
}

/// Emitted when traversal reaches a node, before any fetch
#[derive(Debug)]
pub struct Progress<'a> {
    /// URL about to be processed
    pub url: &'a str,

    /// Depth of the node
    pub depth: u32,

    /// 1-based position among the parent's children
    pub processed: usize,

    /// Total number of the parent's children
    pub total: usize,
}

/// Consumer of crawl progress notifications
pub trait Reporter {
    /// A node reached a terminal state
    fn node_visited(&self, visit: &NodeVisit<'_>);

    /// Traversal moved on to the next node
    fn progress(&self, progress: &Progress<'_>);
}

/// Default reporter that forwards events to `tracing`
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn node_visited(&self, visit: &NodeVisit<'_>) {
        match visit.state {
            PageState::Succeeded => tracing::info!(
                "Visited {} at depth {} ({} links)",
                visit.url,
                visit.depth,
                visit.links_found
            ),
            PageState::Failed => tracing::warn!("Failed {} at depth {}", visit.url, visit.depth),
            _ => tracing::debug!("Skipped {} ({})", visit.url, visit.state),
        }
    }

    fn progress(&self, progress: &Progress<'_>) {
        tracing::debug!(
            "[depth {}] {}/{} {}",
            progress.depth,
            progress.processed,
            progress.total,
            progress.url
        );
    }
}
