use url::Url;

/// Normalizes a URL into the canonical dedup key.
///
/// # Normalization Steps
///
/// 1. Lowercase the scheme and host
/// 2. Drop the port when it is the scheme's default (80 for http, 443 for https)
/// 3. Keep only the path: query string and fragment are dropped, so two URLs
///    differing only there are the same resource
/// 4. Strip a single trailing `/` unless the path is the root `/`
/// 5. Lowercase the final string
///
/// This function never fails: input that does not parse as a URL is returned
/// trimmed and lowercased. The result is idempotent, so
/// `normalize(normalize(u)) == normalize(u)` holds for every input.
///
/// # Examples
///
/// ```
/// use kumo_harvest::url::normalize;
///
/// assert_eq!(normalize("HTTPS://Example.COM:443/Docs/"), "https://example.com/docs");
/// assert_eq!(normalize("https://example.com/page?q=1#top"), "https://example.com/page");
/// ```
pub fn normalize(url_str: &str) -> String {
    let parsed = match Url::parse(url_str.trim()) {
        Ok(parsed) => parsed,
        // Best-effort fallback for unparseable input
        Err(_) => return url_str.trim().to_lowercase(),
    };

    let host = match parsed.host_str() {
        Some(host) => host,
        None => return url_str.trim().to_lowercase(),
    };

    // The url crate already strips default ports during parsing, so
    // `port()` is Some only for non-default ports.
    let port = match parsed.port() {
        Some(port) => format!(":{}", port),
        None => String::new(),
    };

    let mut path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }

    format!("{}://{}{}{}", parsed.scheme(), host, port, path).to_lowercase()
}
