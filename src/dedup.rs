//! Filesystem layout and deduplication checks
//!
//! The final layout is three fixed directories under a base directory:
//!
//! ```text
//! <base>/albums/<shortcode>/...
//! <base>/individual_images/...
//! <base>/individual_videos/...
//! ```
//!
//! A completed shortcode's media lives in exactly one of these locations;
//! the dedup check relies on that invariant holding for every finished
//! download.

use crate::error::Result;
use crate::types::{PostKind, Shortcode};
use std::fs;
use std::path::{Path, PathBuf};

/// Album subdirectory name under the base directory
pub const ALBUMS_DIR: &str = "albums";
/// Single-image subdirectory name under the base directory
pub const IMAGES_DIR: &str = "individual_images";
/// Single-video subdirectory name under the base directory
pub const VIDEOS_DIR: &str = "individual_videos";

/// The fixed output directory layout
#[derive(Clone, Debug)]
pub struct Layout {
    base_dir: PathBuf,
}

impl Layout {
    /// Create a layout rooted at `base_dir`
    ///
    /// Does not touch the filesystem; call [`ensure_dirs`](Self::ensure_dirs)
    /// to create the directories.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The base directory
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `<base>/albums`
    #[must_use]
    pub fn albums_dir(&self) -> PathBuf {
        self.base_dir.join(ALBUMS_DIR)
    }

    /// `<base>/individual_images`
    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.base_dir.join(IMAGES_DIR)
    }

    /// `<base>/individual_videos`
    #[must_use]
    pub fn videos_dir(&self) -> PathBuf {
        self.base_dir.join(VIDEOS_DIR)
    }

    /// `<base>/albums/<shortcode>`
    #[must_use]
    pub fn album_dir(&self, shortcode: &Shortcode) -> PathBuf {
        self.albums_dir().join(shortcode.as_str())
    }

    /// Create all three layout directories (and the base) if missing
    ///
    /// # Errors
    ///
    /// Returns an I/O error if any directory cannot be created.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(self.albums_dir())?;
        fs::create_dir_all(self.images_dir())?;
        fs::create_dir_all(self.videos_dir())?;
        Ok(())
    }

    /// Check whether a post's media already exists in the final layout
    ///
    /// With a kind hint, only the corresponding location is checked; without
    /// one, all three are checked in the order album, image, video. Albums
    /// are checked by directory existence; single images and videos by
    /// scanning the flat directory for any filename containing the shortcode
    /// as a substring. The substring match is deliberate: a shortcode that is
    /// a substring of another shortcode can produce a false positive, but
    /// tightening the match would silently change observable skip behavior.
    ///
    /// Nonexistent directories are treated as "no match", not an error.
    /// Filesystem reads only, no mutation.
    #[must_use]
    pub fn is_already_downloaded(&self, shortcode: &Shortcode, hint: Option<PostKind>) -> bool {
        match hint {
            Some(PostKind::Album) => self.album_dir(shortcode).exists(),
            Some(PostKind::Image) => dir_contains_shortcode(&self.images_dir(), shortcode),
            Some(PostKind::Video) => dir_contains_shortcode(&self.videos_dir(), shortcode),
            None => {
                self.album_dir(shortcode).exists()
                    || dir_contains_shortcode(&self.images_dir(), shortcode)
                    || dir_contains_shortcode(&self.videos_dir(), shortcode)
            }
        }
    }
}

/// Scan a flat directory for any filename containing the shortcode
fn dir_contains_shortcode(dir: &Path, shortcode: &Shortcode) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        // Missing or unreadable directory means "no match"
        return false;
    };
    for entry in entries.flatten() {
        if entry
            .file_name()
            .to_string_lossy()
            .contains(shortcode.as_str())
        {
            return true;
        }
    }
    false
}
