//! The external fetch capability
//!
//! All heavy lifting (authentication, pagination, media URL resolution,
//! HTTP retries) is delegated to an external downloader. The orchestrator
//! only sees the [`PostFetcher`] trait, so tests can substitute an
//! implementation returning canned descriptors or errors.

use crate::cookies::{self, Cookie};
use crate::error::{Error, Result};
use crate::placement::{is_media_file, is_video_file};
use crate::types::{PostDescriptor, PostKind, Shortcode};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Default external downloader binary, searched for in PATH
pub const DEFAULT_FETCHER_BINARY: &str = "gallery-dl";

/// Fetches one post's media into a caller-supplied directory
///
/// May fail with network, authentication, or not-found errors; the
/// orchestrator surfaces all of them as a per-URL [`Error::Fetch`] and
/// moves on to the next URL.
#[async_trait]
pub trait PostFetcher: Send + Sync {
    /// Fetch the post identified by `shortcode` into `dest_dir`
    ///
    /// `dest_dir` exists and is empty when called. On success the returned
    /// descriptor lists the downloaded media files inside `dest_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] on any failure.
    async fn fetch_post(&self, shortcode: &Shortcode, dest_dir: &Path) -> Result<PostDescriptor>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// CLI-based fetcher shelling out to an external downloader binary
///
/// The binary receives the post URL, an exact destination directory, and
/// the configured proxy and cookies. The fetched directory is then scanned
/// and classified by its recognized media files.
pub struct CliPostFetcher {
    binary_path: PathBuf,
    proxy: Option<String>,
    cookies: Vec<Cookie>,
}

impl CliPostFetcher {
    /// Create a fetcher with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            proxy: None,
            cookies: Vec::new(),
        }
    }

    /// Attempt to find the default downloader binary in PATH
    ///
    /// Returns `None` when [`DEFAULT_FETCHER_BINARY`] is not installed.
    pub fn from_path() -> Option<Self> {
        which::which(DEFAULT_FETCHER_BINARY).ok().map(Self::new)
    }

    /// Route all of the binary's requests through a proxy
    #[must_use]
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy = Some(proxy_url.into());
        self
    }

    /// Apply session cookies before any fetch
    #[must_use]
    pub fn with_cookies(mut self, cookies: Vec<Cookie>) -> Self {
        self.cookies = cookies;
        self
    }

    fn post_url(shortcode: &Shortcode) -> String {
        format!("https://www.instagram.com/p/{shortcode}/")
    }
}

#[async_trait]
impl PostFetcher for CliPostFetcher {
    async fn fetch_post(&self, shortcode: &Shortcode, dest_dir: &Path) -> Result<PostDescriptor> {
        let mut cmd = Command::new(&self.binary_path);
        cmd.arg("--directory").arg(dest_dir);

        if let Some(proxy) = &self.proxy {
            cmd.arg("--proxy").arg(proxy);
        }
        if !self.cookies.is_empty() {
            // The cookie file lands inside the temp directory, so the
            // unconditional cleanup discards it with everything else.
            let cookie_file = dest_dir.join("cookies.txt");
            cookies::write_netscape_file(&self.cookies, &cookie_file)?;
            cmd.arg("--cookies").arg(&cookie_file);
        }

        cmd.arg(Self::post_url(shortcode));

        debug!(%shortcode, binary = %self.binary_path.display(), "invoking fetch binary");
        let output = cmd.output().await.map_err(|e| {
            Error::Fetch(format!(
                "failed to execute {}: {e}",
                self.binary_path.display()
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Fetch(format!(
                "{} exited with {}: {}",
                self.binary_path.display(),
                output.status,
                stderr.trim()
            )));
        }

        let files = downloaded_media_files(dest_dir)?;
        let kind = classify_media_files(&files)?;
        Ok(PostDescriptor {
            shortcode: shortcode.clone(),
            kind,
            files,
        })
    }

    fn name(&self) -> &'static str {
        "cli-gallery-dl"
    }
}

/// List the recognized media files in the fetched directory, sorted
fn downloaded_media_files(dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dest_dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_media_file(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Classify a fetched post by its recognized media files
///
/// The external binary does not report the platform's container type, so
/// the container is inferred: more than one media file is an album, a
/// single `.mp4` is a video, a single image is an image. Zero media files
/// means the fetch produced nothing usable and is treated as a failure.
pub fn classify_media_files(files: &[PathBuf]) -> Result<PostKind> {
    match files {
        [] => Err(Error::Fetch("no media files downloaded".to_string())),
        [single] => {
            if is_video_file(single) {
                Ok(PostKind::Video)
            } else {
                Ok(PostKind::Image)
            }
        }
        _ => Ok(PostKind::Album),
    }
}
