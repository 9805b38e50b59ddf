//! Link, content, and asset extraction from parsed documents
//!
//! All extraction is driven by the configured CSS selectors and operates on
//! an explicit list of scope roots: the whole document, the root page's
//! section subtree, or the target-id subtrees for links.

use crate::config::SelectorConfig;
use crate::url::{absolutize, is_crawlable, same_domain};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Compiled selectors for one crawl run
///
/// Compilation failures surface as [`ConfigError::InvalidSelector`] before
/// the first node is visited.
pub struct Selectors {
    /// Configured direct-link selector
    pub link: Selector,
    /// Configured list-container selector
    pub item_list: Selector,
    /// Configured item selector within each container
    pub item: Selector,
    /// Configured content-passage selector
    pub content: Selector,
    /// First anchor within a list item
    pub anchor: Selector,
    /// Image elements considered for asset download
    pub image: Selector,
}

impl Selectors {
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            link: compile_one("link", &config.link)?,
            item_list: compile_one("item-list", &config.item_list)?,
            item: compile_one("item", &config.item)?,
            content: compile_one("content", &config.content)?,
            anchor: compile_one("anchor", "a[href]")?,
            image: compile_one("image", "img[src]")?,
        })
    }
}

fn compile_one(name: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: format!("{} = {}", name, selector),
        message: e.to_string(),
    })
}

/// Filtering rules applied to every extracted link
pub struct LinkFilter<'a> {
    /// The crawl's seed URL, the reference host for the domain restriction
    pub seed_url: &'a str,
    /// Drop links that leave the seed's host
    pub same_domain_only: bool,
}

/// Finds the element carrying the given id, anywhere in the document.
pub fn element_by_id<'a>(document: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(&format!("#{}", id)).ok()?;
    document.select(&selector).next()
}

/// Extracts followable page links within the given scope roots.
///
/// Two passes, results unioned and deduplicated in first-occurrence order:
/// direct links matching the link selector, then the first anchor of every
/// item inside every matching item list.
pub fn extract_links(
    roots: &[ElementRef<'_>],
    base_url: &str,
    selectors: &Selectors,
    filter: &LinkFilter<'_>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for root in roots {
        for element in root.select(&selectors.link) {
            if let Some(href) = element.value().attr("href") {
                consider(href, base_url, filter, &mut seen, &mut links);
            }
        }
    }

    for root in roots {
        for list in root.select(&selectors.item_list) {
            for item in list.select(&selectors.item) {
                if let Some(anchor) = item.select(&selectors.anchor).next() {
                    if let Some(href) = anchor.value().attr("href") {
                        consider(href, base_url, filter, &mut seen, &mut links);
                    }
                }
            }
        }
    }

    links
}

/// Resolves one href and appends it if it passes the filters.
fn consider(
    href: &str,
    base_url: &str,
    filter: &LinkFilter<'_>,
    seen: &mut HashSet<String>,
    links: &mut Vec<String>,
) {
    let href = href.trim();

    // Same-page anchors and non-navigational schemes
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return;
    }

    let absolute = absolutize(base_url, href);
    if !is_crawlable(&absolute) {
        return;
    }
    if filter.same_domain_only && !same_domain(filter.seed_url, &absolute) {
        return;
    }
    if seen.insert(absolute.clone()) {
        links.push(absolute);
    }
}

/// Minimum passage length; anything at or below is noise (stray whitespace,
/// icon glyphs)
const MIN_PASSAGE_CHARS: usize = 10;

/// Extracts textual passages within the given scope roots.
///
/// Returns trimmed text of every element matching the content selector,
/// keeping only passages strictly longer than ten characters; document
/// order is preserved. An empty result means no text file is written.
pub fn extract_content(roots: &[ElementRef<'_>], selectors: &Selectors) -> Vec<String> {
    let mut passages = Vec::new();
    for root in roots {
        for element in root.select(&selectors.content) {
            let text = element.text().collect::<String>().trim().to_string();
            if text.chars().count() > MIN_PASSAGE_CHARS {
                passages.push(text);
            }
        }
    }
    passages
}

/// Extracts embedded asset URLs (image sources) within the scope roots.
pub fn extract_assets(
    roots: &[ElementRef<'_>],
    base_url: &str,
    selectors: &Selectors,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut assets = Vec::new();
    for root in roots {
        for element in root.select(&selectors.image) {
            if let Some(src) = element.value().attr("src") {
                let absolute = absolutize(base_url, src.trim());
                if is_crawlable(&absolute) && seen.insert(absolute.clone()) {
                    assets.push(absolute);
                }
            }
        }
    }
    assets
}
