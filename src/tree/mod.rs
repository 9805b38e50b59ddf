//! Page tree for recording the crawl as it unfolds
//!
//! Nodes live in an arena owned by [`PageTree`]; parent/child relations are
//! indices into the arena, never references. The tree is append-only for
//! the duration of a crawl.

use crate::state::PageState;
use chrono::{DateTime, Utc};
use url::Url;

/// Index of a node within its owning [`PageTree`]
pub type PageId = usize;

/// Maximum characters kept from the path portion of a folder segment
const SEGMENT_PATH_LIMIT: usize = 30;

/// One crawled (or pending) page
#[derive(Debug, Clone)]
pub struct PageNode {
    /// Original, non-normalized URL
    pub url: String,

    /// Distance from the root; root is 0
    pub depth: u32,

    /// Arena index of the parent; None only for the root
    pub parent: Option<PageId>,

    /// Children in discovery order
    pub children: Vec<PageId>,

    /// Raw fetched document body, present only if the fetch succeeded
    pub content: Option<String>,

    /// Set when the node begins processing
    pub crawled_at: Option<DateTime<Utc>>,

    /// Current position in the visit state machine
    pub state: PageState,
}

/// Arena of [`PageNode`]s rooted at the seed URL
#[derive(Debug)]
pub struct PageTree {
    nodes: Vec<PageNode>,
}

impl PageTree {
    /// Creates a tree containing only the root node for `seed_url`.
    pub fn new(seed_url: &str) -> Self {
        Self {
            nodes: vec![PageNode {
                url: seed_url.to_string(),
                depth: 0,
                parent: None,
                children: Vec::new(),
                content: None,
                crawled_at: None,
                state: PageState::Pending,
            }],
        }
    }

    /// The root node's id; valid for the lifetime of the tree.
    pub fn root(&self) -> PageId {
        0
    }

    /// Appends a child of `parent` at `parent.depth + 1`.
    pub fn add_child(&mut self, parent: PageId, url: &str) -> PageId {
        let depth = self.nodes[parent].depth + 1;
        let id = self.nodes.len();
        self.nodes.push(PageNode {
            url: url.to_string(),
            depth,
            parent: Some(parent),
            children: Vec::new(),
            content: None,
            crawled_at: None,
            state: PageState::Pending,
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn node(&self, id: PageId) -> &PageNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: PageId) -> &mut PageNode {
        &mut self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (PageId, &PageNode)> {
        self.nodes.iter().enumerate()
    }

    /// Node ids from the root down to `id`, inclusive.
    pub fn lineage(&self, id: PageId) -> Vec<PageId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            chain.push(node_id);
            current = self.nodes[node_id].parent;
        }
        chain.reverse();
        chain
    }

    /// Derives the lineage folder path for a node.
    ///
    /// Each ancestor contributes one segment, root first, joined with `/`.
    /// The layout reproduces the crawl's lineage as nested directories so
    /// every saved artifact is traceable back to the page that referenced it.
    pub fn folder_path(&self, id: PageId) -> String {
        self.lineage(id)
            .into_iter()
            .map(|node_id| folder_segment(&self.nodes[node_id].url))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Derives the single folder segment for one page URL.
///
/// The segment is the host with dots replaced by underscores, followed by
/// the path with slashes replaced by underscores; the path portion is
/// truncated to 30 characters. A root or empty path contributes nothing
/// beyond the host.
pub fn folder_segment(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => {
                let host = host.replace('.', "_");
                let path = parsed.path();
                if path.is_empty() || path == "/" {
                    host
                } else {
                    let flat: String = path.replace('/', "_").chars().take(SEGMENT_PATH_LIMIT).collect();
                    format!("{}{}", host, flat)
                }
            }
            None => fallback_segment(url),
        },
        Err(_) => fallback_segment(url),
    }
}

/// Segment for URLs that do not parse; keeps the folder layout usable.
fn fallback_segment(url: &str) -> String {
    url.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(40)
        .collect()
}
