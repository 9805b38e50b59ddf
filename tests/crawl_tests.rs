//! Integration tests for the crawl engine
//!
//! These tests use wiremock to stand up mock HTTP servers and exercise the
//! full fetch -> extract -> recurse cycle end-to-end, including the dedup
//! and depth invariants.

use kumo_harvest::config::{
    Config, CrawlerConfig, DownloadConfig, OutputConfig, SelectorConfig, UserAgentConfig,
};
use kumo_harvest::crawler::Orchestrator;
use kumo_harvest::state::PageState;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from `seed_url` into `output_root`
fn make_config(seed_url: &str, output_root: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: seed_url.to_string(),
            max_depth: 5,
            request_delay_ms: 0,
            same_domain_only: false,
            section_id: None,
            target_ids: vec![],
        },
        selectors: SelectorConfig::default(),
        downloads: DownloadConfig::default(),
        output: OutputConfig {
            root_path: output_root.display().to_string(),
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
    }
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Counts regular files anywhere under `dir`
fn count_files(dir: &Path) -> usize {
    let mut count = 0;
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let entry_path = entry.path();
            if entry_path.is_dir() {
                count += count_files(&entry_path);
            } else {
                count += 1;
            }
        }
    }
    count
}

#[tokio::test]
async fn test_single_page_without_links_is_a_final_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            "<html><body><p>A lonely page with enough text.</p></body></html>".to_string(),
        ))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let mut config = make_config(&format!("{}/", server.uri()), tmp.path());
    config.crawler.max_depth = 10;

    let mut orchestrator = Orchestrator::new(config).unwrap();
    let stats = orchestrator.run().await.unwrap();

    let tree = orchestrator.tree();
    assert_eq!(tree.len(), 1, "expected exactly the root node");
    let root = tree.node(tree.root());
    assert_eq!(root.state, PageState::Succeeded);
    assert!(root.children.is_empty());
    assert!(root.content.is_some());
    assert_eq!(stats.pages_succeeded, 1);
    assert_eq!(stats.pages_failed, 0);
}

#[tokio::test]
async fn test_cycle_is_broken_by_visited_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body><a href="/page-b">B</a></body></html>"#.to_string(),
        ))
        .mount(&server)
        .await;

    // page-b links straight back to the seed
    Mock::given(method("GET"))
        .and(path("/page-b"))
        .respond_with(html_response(
            r#"<html><body><a href="/">Home</a></body></html>"#.to_string(),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let config = make_config(&format!("{}/", server.uri()), tmp.path());

    let mut orchestrator = Orchestrator::new(config).unwrap();
    orchestrator.run().await.unwrap();

    let tree = orchestrator.tree();
    assert_eq!(tree.len(), 2, "cycle must not create more nodes");
    let root = tree.node(tree.root());
    assert_eq!(root.children.len(), 1);
    let child = tree.node(root.children[0]);
    assert_eq!(child.state, PageState::Succeeded);
    assert!(
        child.children.is_empty(),
        "link back to the visited root must not become a child"
    );
    assert_eq!(orchestrator.session().visited_count(), 2);
}

#[tokio::test]
async fn test_case_variant_sibling_marked_duplicate() {
    let server = MockServer::start().await;

    // Two hrefs that normalize to the same key become siblings; the second
    // one must be rejected at visit time without a fetch
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body><a href="/Page">One</a><a href="/page">Two</a></body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Page"))
        .respond_with(html_response("<html><body></body></html>".to_string()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html_response("<html><body></body></html>".to_string()))
        .expect(0)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let config = make_config(&format!("{}/", server.uri()), tmp.path());

    let mut orchestrator = Orchestrator::new(config).unwrap();
    let stats = orchestrator.run().await.unwrap();

    let tree = orchestrator.tree();
    assert_eq!(tree.len(), 3);
    assert_eq!(stats.duplicates_skipped, 1);
    let duplicate = tree
        .iter()
        .find(|(_, node)| node.url.ends_with("/page"))
        .map(|(_, node)| node)
        .unwrap();
    assert_eq!(duplicate.state, PageState::DuplicateSkipped);
    assert!(duplicate.content.is_none());
    assert_eq!(orchestrator.session().visited_count(), 2);
}

#[tokio::test]
async fn test_same_domain_restriction_excludes_foreign_links() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body>
                <a href="/local">Local</a>
                <a href="https://other-domain.test/page">Elsewhere</a>
            </body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/local"))
        .respond_with(html_response("<html><body></body></html>".to_string()))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let mut config = make_config(&format!("{}/", server.uri()), tmp.path());
    config.crawler.same_domain_only = true;

    let mut orchestrator = Orchestrator::new(config).unwrap();
    orchestrator.run().await.unwrap();

    let tree = orchestrator.tree();
    assert_eq!(tree.len(), 2);
    assert!(
        tree.iter().all(|(_, node)| !node.url.contains("other-domain")),
        "foreign link must be excluded from the child set entirely"
    );
}

#[tokio::test]
async fn test_identical_image_payloads_stored_once() {
    let server = MockServer::start().await;
    let payload = vec![0x7au8; 1024];

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body>
                <img src="/img/one.png">
                <img src="/img/two.png">
            </body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    for img in ["/img/one.png", "/img/two.png"] {
        Mock::given(method("GET"))
            .and(path(img))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(payload.clone())
                    .insert_header("content-type", "image/png"),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let tmp = tempfile::tempdir().unwrap();
    let mut config = make_config(&format!("{}/", server.uri()), tmp.path());
    config.downloads.images = true;

    let mut orchestrator = Orchestrator::new(config).unwrap();
    let stats = orchestrator.run().await.unwrap();

    let file_root = tmp.path().join("file_content");
    assert_eq!(
        count_files(&file_root),
        1,
        "byte-identical payloads must produce exactly one file"
    );
    assert_eq!(stats.files_downloaded, 1);
    assert_eq!(stats.duplicate_files_skipped, 1);
}

#[tokio::test]
async fn test_missing_section_id_falls_back_to_whole_document() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body>
                <a href="/next">Next</a>
                <p>This text lives outside any section element.</p>
            </body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_response("<html><body></body></html>".to_string()))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let mut config = make_config(&format!("{}/", server.uri()), tmp.path());
    config.crawler.section_id = Some("content-area".to_string());

    let mut orchestrator = Orchestrator::new(config).unwrap();
    let stats = orchestrator.run().await.unwrap();

    // Fallback means the link and the passage are both found
    assert_eq!(stats.pages_succeeded, 2);
    assert_eq!(stats.text_files_written, 1);
}

#[tokio::test]
async fn test_section_scope_restricts_root_extraction() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body>
                <div id="main">
                    <a href="/inside">In</a>
                    <p>Passage inside the scoped section.</p>
                </div>
                <a href="/outside">Out</a>
                <p>Passage outside the scoped section.</p>
            </body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/inside"))
        .respond_with(html_response("<html><body></body></html>".to_string()))
        .mount(&server)
        .await;

    // Outside the section: must never be fetched
    Mock::given(method("GET"))
        .and(path("/outside"))
        .respond_with(html_response("<html><body></body></html>".to_string()))
        .expect(0)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let mut config = make_config(&format!("{}/", server.uri()), tmp.path());
    config.crawler.section_id = Some("main".to_string());

    let mut orchestrator = Orchestrator::new(config).unwrap();
    orchestrator.run().await.unwrap();

    let tree = orchestrator.tree();
    assert_eq!(tree.len(), 2);
    assert!(tree.iter().all(|(_, node)| !node.url.contains("outside")));

    // The saved root text carries only the scoped passage
    let text_root = tmp.path().join("text_content");
    assert_eq!(count_files(&text_root), 1);
    let mut content = String::new();
    fn read_all(dir: &Path, out: &mut String) {
        for entry in std::fs::read_dir(dir).unwrap().flatten() {
            let p = entry.path();
            if p.is_dir() {
                read_all(&p, out);
            } else {
                out.push_str(&std::fs::read_to_string(&p).unwrap());
            }
        }
    }
    read_all(&text_root, &mut content);
    assert!(content.contains("inside the scoped section"));
    assert!(!content.contains("outside the scoped section"));
}

#[tokio::test]
async fn test_depth_bound_stops_descent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body><a href="/level1">L1</a></body></html>"#.to_string(),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level1"))
        .respond_with(html_response(
            r#"<html><body><a href="/level2">L2</a></body></html>"#.to_string(),
        ))
        .mount(&server)
        .await;

    // Depth 2 equals max-depth: recorded but never fetched
    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html_response("<html><body></body></html>".to_string()))
        .expect(0)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let mut config = make_config(&format!("{}/", server.uri()), tmp.path());
    config.crawler.max_depth = 2;

    let mut orchestrator = Orchestrator::new(config).unwrap();
    let stats = orchestrator.run().await.unwrap();

    let tree = orchestrator.tree();
    assert_eq!(stats.pages_succeeded, 2);
    assert_eq!(stats.depth_exceeded, 1);
    assert!(tree.iter().all(|(_, node)| node.depth <= 2));
    let bounded = tree
        .iter()
        .find(|(_, node)| node.url.contains("level2"))
        .map(|(_, node)| node)
        .unwrap();
    assert_eq!(bounded.state, PageState::DepthExceeded);
    assert!(bounded.content.is_none());
}

#[tokio::test]
async fn test_failed_fetch_does_not_abort_crawl() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body>
                <a href="/missing">Broken</a>
                <a href="/good">Good</a>
            </body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/good"))
        .respond_with(html_response("<html><body></body></html>".to_string()))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let config = make_config(&format!("{}/", server.uri()), tmp.path());

    let mut orchestrator = Orchestrator::new(config).unwrap();
    let stats = orchestrator.run().await.unwrap();

    assert_eq!(stats.pages_succeeded, 2, "root and /good");
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(orchestrator.session().failed_count(), 1);

    let tree = orchestrator.tree();
    let failed = tree
        .iter()
        .find(|(_, node)| node.url.contains("missing"))
        .map(|(_, node)| node)
        .unwrap();
    assert_eq!(failed.state, PageState::Failed);
    assert!(orchestrator.session().has_failed(&failed.url));
    // The sibling processed after the failure still succeeded
    let good = tree
        .iter()
        .find(|(_, node)| node.url.contains("good"))
        .map(|(_, node)| node)
        .unwrap();
    assert_eq!(good.state, PageState::Succeeded);
}

#[tokio::test]
async fn test_pdf_links_are_downloaded_not_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body>
                <a href="/files/report.pdf">Report</a>
                <a href="/page2">Page 2</a>
            </body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"%PDF-1.4 test".to_vec())
                .insert_header("content-type", "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_response("<html><body></body></html>".to_string()))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let mut config = make_config(&format!("{}/", server.uri()), tmp.path());
    config.downloads.pdf = true;

    let mut orchestrator = Orchestrator::new(config).unwrap();
    let stats = orchestrator.run().await.unwrap();

    let tree = orchestrator.tree();
    assert_eq!(tree.len(), 2, "the pdf link must not become a page node");
    assert!(tree.iter().all(|(_, node)| !node.url.ends_with(".pdf")));
    assert_eq!(stats.files_downloaded, 1);
    assert_eq!(count_files(&tmp.path().join("file_content")), 1);
}

#[tokio::test]
async fn test_existing_file_short_circuits_refetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body><img src="/logo.png"></body></html>"#.to_string(),
        ))
        .expect(2)
        .mount(&server)
        .await;

    // The asset must be fetched on the first run only
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![1u8; 64])
                .insert_header("content-type", "image/png"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();

    for _ in 0..2 {
        let mut config = make_config(&format!("{}/", server.uri()), tmp.path());
        config.downloads.images = true;
        let mut orchestrator = Orchestrator::new(config).unwrap();
        orchestrator.run().await.unwrap();
    }

    assert_eq!(count_files(&tmp.path().join("file_content")), 1);
}

#[tokio::test]
async fn test_text_content_written_with_lineage_layout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body>
                <p>First qualifying passage of text.</p>
                <p>tiny</p>
                <p>Second qualifying passage of text.</p>
            </body></html>"#
                .to_string(),
        ))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let config = make_config(&format!("{}/", server.uri()), tmp.path());

    let mut orchestrator = Orchestrator::new(config).unwrap();
    let stats = orchestrator.run().await.unwrap();

    assert_eq!(stats.text_files_written, 1);

    // Host dots become underscores in the lineage folder
    let folder = tmp.path().join("text_content").join("127_0_0_1");
    let entries: Vec<_> = std::fs::read_dir(&folder)
        .expect("lineage folder must exist")
        .flatten()
        .collect();
    assert_eq!(entries.len(), 1);
    let name = entries[0].file_name().to_string_lossy().to_string();
    assert!(name.starts_with("content_") && name.ends_with(".txt"));

    let content = std::fs::read_to_string(entries[0].path()).unwrap();
    assert_eq!(
        content,
        "First qualifying passage of text.\n\nSecond qualifying passage of text."
    );
}
