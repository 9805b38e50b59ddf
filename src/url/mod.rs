//! URL handling for Kumo-Harvest
//!
//! Provides the canonical dedup-key normalization, relative-reference
//! resolution, and the host comparisons used by the same-domain restriction.

mod normalize;

pub use normalize::normalize;

use url::Url;

/// Extracts the lowercase host from a parsed URL.
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true iff both URLs parse and share a host, case-insensitively.
///
/// Any parse failure yields false, so an unparseable candidate can never
/// slip past the same-domain restriction.
pub fn same_domain(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => match (a.host_str(), b.host_str()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        },
        _ => false,
    }
}

/// Resolves a possibly-relative reference against a base URL.
///
/// On any failure the reference is returned unchanged; callers filter with
/// [`is_crawlable`] afterwards.
pub fn absolutize(base: &str, reference: &str) -> String {
    match Url::parse(base) {
        Ok(base_url) => match base_url.join(reference.trim()) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => reference.to_string(),
        },
        Err(_) => reference.to_string(),
    }
}

/// Returns true only for absolute `http`/`https` URLs.
pub fn is_crawlable(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://example.com/path").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_domain_lowercases() {
        let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_same_domain_case_insensitive() {
        assert!(same_domain(
            "https://Example.COM/a",
            "http://example.com/b?q=1"
        ));
    }

    #[test]
    fn test_same_domain_different_hosts() {
        assert!(!same_domain("https://example.com/", "https://other.com/"));
    }

    #[test]
    fn test_same_domain_subdomain_is_different() {
        assert!(!same_domain(
            "https://example.com/",
            "https://www.example.com/"
        ));
    }

    #[test]
    fn test_same_domain_fails_closed_on_parse_error() {
        assert!(!same_domain("not a url", "https://example.com/"));
        assert!(!same_domain("https://example.com/", "::::"));
    }

    #[test]
    fn test_absolutize_relative_path() {
        assert_eq!(
            absolutize("https://example.com/docs/intro", "../assets/a.png"),
            "https://example.com/assets/a.png"
        );
    }

    #[test]
    fn test_absolutize_root_relative() {
        assert_eq!(
            absolutize("https://example.com/docs/intro", "/about"),
            "https://example.com/about"
        );
    }

    #[test]
    fn test_absolutize_already_absolute() {
        assert_eq!(
            absolutize("https://example.com/", "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_absolutize_unparseable_base_returns_reference() {
        assert_eq!(absolutize("not a url", "page.html"), "page.html");
    }

    #[test]
    fn test_is_crawlable() {
        assert!(is_crawlable("https://example.com/"));
        assert!(is_crawlable("http://example.com/page"));
        assert!(!is_crawlable("ftp://example.com/file"));
        assert!(!is_crawlable("mailto:someone@example.com"));
        assert!(!is_crawlable("/relative/path"));
    }
}
