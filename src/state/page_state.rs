/// Page state definitions for tracking crawl progress
use std::fmt;

/// Represents the current state of a page node in the crawl process
///
/// Transitions: `Pending -> Visiting -> {Succeeded, Failed}` for pages that
/// are actually fetched, or `Pending -> {DepthExceeded, DuplicateSkipped}`
/// for nodes rejected before any fetch is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Node has been created but traversal has not reached it yet
    Pending,

    /// Node is being processed; its normalized URL is committed to the
    /// visited set
    Visiting,

    /// Page was fetched and processed
    Succeeded,

    /// Fetch or processing failed; the original URL is in the failed set
    Failed,

    /// Node sits at or beyond the maximum depth, never fetched
    DepthExceeded,

    /// Normalized URL was already visited, never fetched
    DuplicateSkipped,
}

impl PageState {
    /// Returns true if no further processing will happen for this node
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Visiting)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Returns true if this node was rejected without a fetch
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::DepthExceeded | Self::DuplicateSkipped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Visiting => "visiting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::DepthExceeded => "depth_exceeded",
            Self::DuplicateSkipped => "duplicate_skipped",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
