//! Crawl orchestration: depth-bounded traversal over the page tree
//!
//! The orchestrator owns the session, the tree, and the file store, and
//! drives the whole crawl from the seed URL. Traversal uses an explicit
//! work stack that reproduces depth-first recursion: children are visited
//! strictly sequentially in discovery order, with the configured delay
//! before each descent. Every per-node failure is absorbed at the node
//! boundary; a single bad page never aborts the crawl.

use crate::config::Config;
use crate::crawler::extractor::{self, LinkFilter, Selectors};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchOutcome};
use crate::crawler::session::CrawlSession;
use crate::files::{FileCategory, FileStore};
use crate::output::{
    write_page_text, CrawlStats, NodeVisit, Progress, Reporter, TracingReporter,
};
use crate::state::PageState;
use crate::tree::{PageId, PageTree};
use crate::url::normalize;
use crate::KumoError;
use chrono::Utc;
use reqwest::Client;
use scraper::Html;
use std::path::PathBuf;
use std::time::Duration;

/// Everything pulled out of a fetched page before any further IO
struct Extraction {
    passages: Vec<String>,
    links: Vec<String>,
    assets: Vec<String>,
    section_missing: bool,
}

/// Drives one crawl from seed to completion
pub struct Orchestrator {
    config: Config,
    client: Client,
    selectors: Selectors,
    session: CrawlSession,
    store: FileStore,
    tree: PageTree,
    output_root: PathBuf,
    reporter: Box<dyn Reporter>,
    stats: CrawlStats,
}

impl Orchestrator {
    /// Creates an orchestrator with the default tracing reporter.
    pub fn new(config: Config) -> Result<Self, KumoError> {
        Self::with_reporter(config, Box::new(TracingReporter))
    }

    /// Creates an orchestrator with a custom progress reporter.
    ///
    /// Selector compilation and client construction happen here; these are
    /// the last places a crawl can fail fatally.
    pub fn with_reporter(config: Config, reporter: Box<dyn Reporter>) -> Result<Self, KumoError> {
        let selectors = Selectors::compile(&config.selectors)?;
        let client = build_http_client(&config.user_agent)?;
        let output_root = PathBuf::from(&config.output.root_path);
        let store = FileStore::new(&output_root, config.downloads.clone());
        let tree = PageTree::new(&config.crawler.seed_url);

        Ok(Self {
            config,
            client,
            selectors,
            session: CrawlSession::new(),
            store,
            tree,
            output_root,
            reporter,
            stats: CrawlStats::default(),
        })
    }

    /// Runs the crawl to completion and returns the final statistics.
    pub async fn run(&mut self) -> Result<CrawlStats, KumoError> {
        tracing::info!(
            "Starting crawl at {} (max depth {})",
            self.config.crawler.seed_url,
            self.config.crawler.max_depth
        );
        let start = std::time::Instant::now();

        // LIFO stack with children pushed in reverse discovery order:
        // identical visit order to direct recursion.
        let mut stack = vec![self.tree.root()];
        while let Some(id) = stack.pop() {
            let depth = self.tree.node(id).depth;
            if depth > 0 && self.config.crawler.request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.crawler.request_delay_ms))
                    .await;
            }

            self.emit_progress(id);
            let children = self.visit(id).await;
            for &child in children.iter().rev() {
                stack.push(child);
            }
        }

        self.stats.files_downloaded = self.store.files_written();
        self.stats.duplicate_files_skipped = self.store.duplicates_skipped();

        tracing::info!(
            "Crawl completed: {} nodes, {} visited, {} failed in {:?}",
            self.tree.len(),
            self.session.visited_count(),
            self.session.failed_count(),
            start.elapsed()
        );

        Ok(self.stats.clone())
    }

    /// Processes one node and returns the children to descend into.
    ///
    /// Implements the node state machine: depth bound and duplicate checks
    /// reject without fetching; otherwise the normalized URL is committed
    /// to the visited set before the fetch is issued, so a later sibling
    /// rediscovering it is rejected immediately.
    async fn visit(&mut self, id: PageId) -> Vec<PageId> {
        let (url, depth) = {
            let node = self.tree.node(id);
            (node.url.clone(), node.depth)
        };

        if depth >= self.config.crawler.max_depth {
            self.finish(id, PageState::DepthExceeded, 0);
            return Vec::new();
        }

        let key = normalize(&url);
        if !self.session.begin_visit(&key) {
            self.finish(id, PageState::DuplicateSkipped, 0);
            return Vec::new();
        }

        {
            let node = self.tree.node_mut(id);
            node.state = PageState::Visiting;
            node.crawled_at = Some(Utc::now());
        }

        let body = match fetch_page(&self.client, &url).await {
            FetchOutcome::Success { body, .. } => body,
            FetchOutcome::Failed { reason } => {
                tracing::warn!("Fetch failed for {}: {}", url, reason);
                self.session.record_failure(&url);
                self.finish(id, PageState::Failed, 0);
                return Vec::new();
            }
        };

        let extraction = self.extract_all(&body, depth, &url);
        self.tree.node_mut(id).content = Some(body);

        if extraction.section_missing {
            tracing::warn!(
                "Section id '{}' not found on root page, using whole document",
                self.config.crawler.section_id.as_deref().unwrap_or("")
            );
        }

        let folder = self.tree.folder_path(id);

        if !extraction.passages.is_empty() {
            match write_page_text(&self.output_root, &folder, &url, &extraction.passages) {
                Ok(dest) => {
                    self.stats.text_files_written += 1;
                    tracing::debug!("Saved text of {} -> {}", url, dest.display());
                }
                Err(e) => tracing::warn!("Text write failed for {}: {}", url, e),
            }
        }

        for asset in &extraction.assets {
            self.store
                .maybe_download(&self.client, asset, &url, &folder)
                .await;
        }

        let mut children = Vec::new();
        for link in &extraction.links {
            // Downloadable link types go to the file store; the rest are
            // followed as pages
            if FileCategory::from_url(link).is_some() {
                self.store
                    .maybe_download(&self.client, link, &url, &folder)
                    .await;
                continue;
            }
            if self.session.is_visited(&normalize(link)) {
                continue;
            }
            children.push(self.tree.add_child(id, link));
        }

        self.stats.links_discovered += extraction.links.len() as u64;
        self.finish(id, PageState::Succeeded, extraction.links.len());
        children
    }

    /// Parses the body and runs all three extractions under the active
    /// scoping rules. Synchronous; the parsed document never crosses an
    /// await point.
    fn extract_all(&self, body: &str, depth: u32, base_url: &str) -> Extraction {
        let document = Html::parse_document(body);
        let crawler = &self.config.crawler;

        // Section scoping applies to the root page only
        let mut section_missing = false;
        let section_root = if depth == 0 {
            match crawler.section_id.as_deref() {
                Some(section_id) => {
                    let found = extractor::element_by_id(&document, section_id);
                    if found.is_none() {
                        section_missing = true;
                    }
                    found
                }
                None => None,
            }
        } else {
            None
        };

        let whole = document.root_element();
        let scope = match section_root {
            Some(element) => vec![element],
            None => vec![whole],
        };

        // Links additionally honor the target-id restriction, but only when
        // no section id is configured at all; absent ids contribute nothing.
        let link_scope = if crawler.section_id.is_some() || crawler.target_ids.is_empty() {
            scope.clone()
        } else {
            crawler
                .target_ids
                .iter()
                .filter_map(|id| extractor::element_by_id(&document, id))
                .collect()
        };

        let filter = LinkFilter {
            seed_url: &crawler.seed_url,
            same_domain_only: crawler.same_domain_only,
        };

        Extraction {
            passages: extractor::extract_content(&scope, &self.selectors),
            links: extractor::extract_links(&link_scope, base_url, &self.selectors, &filter),
            assets: extractor::extract_assets(&scope, base_url, &self.selectors),
            section_missing,
        }
    }

    /// Moves a node into a terminal state and notifies the reporter.
    fn finish(&mut self, id: PageId, state: PageState, links_found: usize) {
        self.tree.node_mut(id).state = state;
        match state {
            PageState::Succeeded => self.stats.pages_succeeded += 1,
            PageState::Failed => self.stats.pages_failed += 1,
            PageState::DepthExceeded => self.stats.depth_exceeded += 1,
            PageState::DuplicateSkipped => self.stats.duplicates_skipped += 1,
            PageState::Pending | PageState::Visiting => {}
        }

        let node = self.tree.node(id);
        self.reporter.node_visited(&NodeVisit {
            url: &node.url,
            state,
            links_found,
            depth: node.depth,
        });
    }

    /// Emits a progress notification with sibling position information.
    fn emit_progress(&self, id: PageId) {
        let node = self.tree.node(id);
        let (processed, total) = match node.parent {
            Some(parent) => {
                let siblings = &self.tree.node(parent).children;
                let position = siblings.iter().position(|&c| c == id).unwrap_or(0);
                (position + 1, siblings.len())
            }
            None => (1, 1),
        };
        self.reporter.progress(&Progress {
            url: &node.url,
            depth: node.depth,
            processed,
            total,
        });
    }

    /// The page tree built so far.
    pub fn tree(&self) -> &PageTree {
        &self.tree
    }

    /// The session's visited/failed bookkeeping.
    pub fn session(&self) -> &CrawlSession {
        &self.session
    }

    /// Statistics accumulated so far.
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }
}
