//! Core types for insta-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unique identifier for a post, extracted from its URL path segment
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shortcode(pub String);

impl Shortcode {
    /// Create a new Shortcode
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the shortcode as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Shortcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Shortcode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for Shortcode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// Media classification of a fetched post
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    /// Multi-media-item post (container of several images/videos)
    Album,
    /// Single image post
    Image,
    /// Single video post
    Video,
}

impl std::fmt::Display for PostKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostKind::Album => write!(f, "album"),
            PostKind::Image => write!(f, "image"),
            PostKind::Video => write!(f, "video"),
        }
    }
}

/// A parsed post URL
///
/// Immutable pairing of the raw URL (kept for logging and the success log)
/// with the shortcode extracted from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostReference {
    /// The URL exactly as it appeared in the input file
    pub raw_url: String,
    /// The shortcode extracted from the URL
    pub shortcode: Shortcode,
}

impl PostReference {
    /// Parse a post URL into a reference
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedUrl`](crate::Error::MalformedUrl) when the
    /// URL does not contain a `/p/<token>/` segment.
    pub fn parse(url: &str) -> crate::Result<Self> {
        let shortcode = crate::shortcode::extract_shortcode(url)?;
        Ok(Self {
            raw_url: url.to_string(),
            shortcode,
        })
    }
}

/// Result of fetching one post, produced by the fetch capability
///
/// The files live in the caller-supplied temp directory and are listed in
/// stable (sorted) order.
#[must_use]
#[derive(Clone, Debug)]
pub struct PostDescriptor {
    /// The post's shortcode
    pub shortcode: Shortcode,
    /// Media classification reported by the fetch capability
    pub kind: PostKind,
    /// Downloaded files inside the temp directory
    pub files: Vec<PathBuf>,
}

/// End-of-run counters
///
/// Owned exclusively by one [`Downloader::run`](crate::Downloader::run)
/// invocation; there is a single control loop and no concurrent writers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of non-blank lines in the input file
    pub total: usize,
    /// URLs whose shortcode parsed (includes skipped and failed fetches)
    pub processed: usize,
    /// URLs skipped because the post was already downloaded
    pub skipped: usize,
    /// URLs that failed (malformed URL, fetch error, or placement error)
    pub failed: usize,
}

impl RunSummary {
    /// Successfully downloaded posts, computed at the end of the run
    ///
    /// Saturates at zero: a run consisting only of malformed URLs reports
    /// zero successes (failed parses count toward `failed` but not
    /// `processed`).
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.processed
            .saturating_sub(self.skipped)
            .saturating_sub(self.failed)
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "total={} succeeded={} skipped={} failed={}",
            self.total,
            self.succeeded(),
            self.skipped,
            self.failed
        )
    }
}
