//! Content-addressed asset downloads
//!
//! The [`FileStore`] decides which URLs are downloadable, where their bytes
//! land on disk, and deduplicates payloads by SHA-256 digest: two different
//! URLs whose fetched bytes hash identically result in exactly one file.

use crate::config::DownloadConfig;
use crate::crawler::fetch_bytes;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Downloadable asset categories, each toggled independently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Image,
    Pdf,
    Word,
    Excel,
    Powerpoint,
    Video,
    Audio,
}

impl FileCategory {
    /// Classifies a URL by the extension of its final path segment.
    ///
    /// Matching is case-insensitive. PDF is additionally matched by a raw
    /// `.pdf` suffix on the whole URL string, which tolerates
    /// query-string-trailing PDFs.
    pub fn from_url(url: &str) -> Option<Self> {
        if let Some(ext) = extension_of(url) {
            if let Some(category) = Self::from_extension(&ext) {
                return Some(category);
            }
        }
        if url.trim().to_ascii_lowercase().ends_with(".pdf") {
            return Some(Self::Pdf);
        }
        None
    }

    fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" | "svg" | "ico" | "tiff" => {
                Some(Self::Image)
            }
            "pdf" => Some(Self::Pdf),
            "doc" | "docx" => Some(Self::Word),
            "xls" | "xlsx" => Some(Self::Excel),
            "ppt" | "pptx" => Some(Self::Powerpoint),
            "mp4" | "avi" | "mov" | "wmv" | "mkv" | "webm" | "flv" => Some(Self::Video),
            "mp3" | "wav" | "ogg" | "flac" | "m4a" | "aac" => Some(Self::Audio),
            _ => None,
        }
    }

    /// True if this category's download toggle is on
    pub fn is_enabled(&self, config: &DownloadConfig) -> bool {
        match self {
            Self::Image => config.images,
            Self::Pdf => config.pdf,
            Self::Word => config.word,
            Self::Excel => config.excel,
            Self::Powerpoint => config.powerpoint,
            Self::Video => config.video,
            Self::Audio => config.audio,
        }
    }
}

/// Extension of the final path segment, lowercased; query and fragment are
/// ignored.
fn extension_of(url: &str) -> Option<String> {
    let stripped = url.split(['?', '#']).next()?;
    let segment = stripped.rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Final path segment of a URL, before query and fragment.
fn file_name_of(url: &str) -> String {
    let stripped = url.split(['?', '#']).next().unwrap_or(url);
    let segment = stripped.rsplit('/').next().unwrap_or("");
    if segment.is_empty() {
        "download".to_string()
    } else {
        segment.to_string()
    }
}

/// Replaces filesystem-invalid characters with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if sanitized.is_empty() {
        "download".to_string()
    } else {
        sanitized
    }
}

/// Content-addressed download store rooted at `<output>/file_content`
pub struct FileStore {
    root: PathBuf,
    downloads: DownloadConfig,
    hashes: HashSet<String>,
    files_written: u64,
    duplicates_skipped: u64,
}

impl FileStore {
    pub fn new(output_root: &Path, downloads: DownloadConfig) -> Self {
        Self {
            root: output_root.join("file_content"),
            downloads,
            hashes: HashSet::new(),
            files_written: 0,
            duplicates_skipped: 0,
        }
    }

    /// Number of distinct asset payloads written this run
    pub fn files_written(&self) -> u64 {
        self.files_written
    }

    /// Number of payloads discarded because their content hash was already
    /// recorded
    pub fn duplicates_skipped(&self) -> u64 {
        self.duplicates_skipped
    }

    /// Number of distinct content hashes seen
    pub fn hash_count(&self) -> usize {
        self.hashes.len()
    }

    /// Downloads `raw_url` under `folder` if it belongs to an enabled
    /// category and its content is new.
    ///
    /// Returns the stored path, or None when the URL is rejected, the
    /// transport fails, the payload is a duplicate, or the write fails.
    /// Failures never propagate; an undownloadable asset costs the crawl
    /// nothing but a log line.
    pub async fn maybe_download(
        &mut self,
        client: &Client,
        raw_url: &str,
        owner_url: &str,
        folder: &str,
    ) -> Option<PathBuf> {
        let absolute = crate::url::absolutize(owner_url, raw_url);

        let category = FileCategory::from_url(&absolute)?;
        if !category.is_enabled(&self.downloads) {
            return None;
        }

        let name = sanitize_file_name(&file_name_of(&absolute));
        let dir = self.root.join(folder);
        let dest = dir.join(&name);

        // Name-based short-circuit: a file already present at the exact
        // destination counts as downloaded across repeated runs.
        if dest.exists() {
            tracing::debug!("Already on disk, skipping fetch: {}", dest.display());
            return Some(dest);
        }

        let bytes = match fetch_bytes(client, &absolute).await {
            Ok(bytes) => bytes,
            Err(reason) => {
                tracing::debug!("Asset fetch failed for {}: {}", absolute, reason);
                return None;
            }
        };

        let digest = hex::encode(Sha256::digest(&bytes));
        if self.hashes.contains(&digest) {
            tracing::debug!("Duplicate content, discarding {}", absolute);
            self.duplicates_skipped += 1;
            return None;
        }

        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!("Cannot create {}: {}", dir.display(), e);
            return None;
        }
        if let Err(e) = std::fs::write(&dest, &bytes) {
            tracing::warn!("Cannot write {}: {}", dest.display(), e);
            return None;
        }

        self.hashes.insert(digest);
        self.files_written += 1;
        tracing::info!("Saved {} -> {}", absolute, dest.display());
        Some(dest)
    }
}
