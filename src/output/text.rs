//! Saved text content for crawled pages

use crate::output::OutputError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Length of the hex fingerprint embedded in text filenames
const FINGERPRINT_LEN: usize = 16;

/// Short, stable fingerprint of a page URL.
///
/// Truncated SHA-256; reproducible for the same URL within and across runs.
/// Collisions across different URLs are a tolerated rare edge case.
pub fn url_fingerprint(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))[..FINGERPRINT_LEN].to_string()
}

/// Writes a page's extracted passages under
/// `<root>/text_content/<folder>/content_<fingerprint>.txt`.
///
/// Passages are joined by blank lines. Callers skip this entirely when no
/// passage qualified; an empty file is never produced here.
pub fn write_page_text(
    output_root: &Path,
    folder: &str,
    url: &str,
    passages: &[String],
) -> Result<PathBuf, OutputError> {
    let dir = output_root.join("text_content").join(folder);
    std::fs::create_dir_all(&dir)?;

    let dest = dir.join(format!("content_{}.txt", url_fingerprint(url)));
    std::fs::write(&dest, passages.join("\n\n"))?;
    Ok(dest)
}
