use serde::Deserialize;

/// Main configuration structure for Kumo-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub downloads: DownloadConfig,
    pub output: OutputConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the traversal starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum depth; nodes at this depth are recorded but never fetched
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Delay inserted before each descent into a child page (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Restrict followed links to the seed URL's host
    #[serde(rename = "same-domain-only", default)]
    pub same_domain_only: bool,

    /// Restrict root-page extraction to the subtree of this element id
    #[serde(rename = "section-id", default)]
    pub section_id: Option<String>,

    /// Restrict link extraction to the subtrees of these element ids
    /// (ignored entirely when `section-id` is configured)
    #[serde(rename = "target-ids", default)]
    pub target_ids: Vec<String>,
}

/// CSS selectors driving link, list-item, and content extraction
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Direct page links
    #[serde(default = "default_link_selector")]
    pub link: String,

    /// Containers searched during the list-item pass
    #[serde(rename = "item-list", default = "default_item_list_selector")]
    pub item_list: String,

    /// Items within each container; the first anchor inside each is taken
    #[serde(default = "default_item_selector")]
    pub item: String,

    /// Elements whose text becomes saved passages
    #[serde(default = "default_content_selector")]
    pub content: String,
}

fn default_link_selector() -> String {
    "a[href]".to_string()
}

fn default_item_list_selector() -> String {
    "ul".to_string()
}

fn default_item_selector() -> String {
    "li".to_string()
}

fn default_content_selector() -> String {
    "p".to_string()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            link: default_link_selector(),
            item_list: default_item_list_selector(),
            item: default_item_selector(),
            content: default_content_selector(),
        }
    }
}

/// Per-filetype download toggles, each independently enabled
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadConfig {
    #[serde(default)]
    pub images: bool,
    #[serde(default)]
    pub pdf: bool,
    #[serde(default)]
    pub word: bool,
    #[serde(default)]
    pub excel: bool,
    #[serde(default)]
    pub powerpoint: bool,
    #[serde(default)]
    pub video: bool,
    #[serde(default)]
    pub audio: bool,
}

impl DownloadConfig {
    /// True if at least one category is enabled
    pub fn any_enabled(&self) -> bool {
        self.images
            || self.pdf
            || self.word
            || self.excel
            || self.powerpoint
            || self.video
            || self.audio
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory under which `text_content/` and `file_content/` are created
    #[serde(rename = "root-path")]
    pub root_path: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}
