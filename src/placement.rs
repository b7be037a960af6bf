//! File classification and placement into the final layout
//!
//! After a post is fetched into its temp directory, the recognized media
//! files are moved to their canonical destination. Anything else in the
//! temp directory (sidecar metadata, thumbnails with odd extensions) is
//! left behind for the unconditional temp-directory cleanup to discard.

use crate::dedup::Layout;
use crate::error::{PlacementError, Result};
use crate::types::{PostKind, Shortcode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Recognized image file extensions (lowercase)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Recognized video file extension (lowercase)
pub const VIDEO_EXTENSION: &str = "mp4";

/// True if the path has a recognized image extension
#[must_use]
pub fn is_image_file(path: &Path) -> bool {
    match lowercase_extension(path) {
        Some(ext) => IMAGE_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}

/// True if the path has the recognized video extension
#[must_use]
pub fn is_video_file(path: &Path) -> bool {
    lowercase_extension(path).as_deref() == Some(VIDEO_EXTENSION)
}

/// True if the path is a recognized media file (image or video)
#[must_use]
pub fn is_media_file(path: &Path) -> bool {
    is_image_file(path) || is_video_file(path)
}

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Move a fetched post's media files from its temp directory into the layout
///
/// - `Album`: creates `albums/<shortcode>/` and moves every recognized
///   image/video file there, preserving original filenames.
/// - `Video`: moves every `.mp4` file to `individual_videos/`.
/// - `Image`: moves every image-extension file to `individual_images/`;
///   a `.mp4` present in an image-classified post is not moved.
///
/// Unrecognized files are ignored and stay in the temp directory.
///
/// # Errors
///
/// Directory creation and move failures surface as
/// [`PlacementError`](crate::error::PlacementError) for the orchestrator's
/// per-URL failure handler.
pub fn place(
    temp_dir: &Path,
    kind: PostKind,
    shortcode: &Shortcode,
    layout: &Layout,
) -> Result<()> {
    match kind {
        PostKind::Album => {
            let album_dir = layout.album_dir(shortcode);
            create_dir(&album_dir)?;
            for file in media_files(temp_dir, is_media_file)? {
                move_into(&file, &album_dir)?;
            }
        }
        PostKind::Video => {
            for file in media_files(temp_dir, is_video_file)? {
                move_into(&file, &layout.videos_dir())?;
            }
        }
        PostKind::Image => {
            for file in media_files(temp_dir, is_image_file)? {
                move_into(&file, &layout.images_dir())?;
            }
        }
    }
    Ok(())
}

/// List matching files in the temp directory, sorted for stable move order
fn media_files(temp_dir: &Path, matches: fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(temp_dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && matches(path))
        .collect();
    files.sort();
    Ok(files)
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        PlacementError::CreateDirFailed {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Move `file` into `dest_dir`, preserving its filename
fn move_into(file: &Path, dest_dir: &Path) -> Result<()> {
    let file_name = file.file_name().ok_or_else(|| PlacementError::InvalidPath {
        path: file.to_path_buf(),
        reason: "no filename component".to_string(),
    })?;
    let dest = dest_dir.join(file_name);
    move_file(file, &dest)?;
    debug!(src = %file.display(), dest = %dest.display(), "placed media file");
    Ok(())
}

/// Rename a file, falling back to copy+remove for cross-device moves
fn move_file(src: &Path, dest: &Path) -> Result<()> {
    if fs::rename(src, dest).is_ok() {
        return Ok(());
    }
    // Rename failed — likely EXDEV when temp and base dirs are on
    // different filesystems. Copy then remove the source.
    fs::copy(src, dest)
        .and_then(|_| fs::remove_file(src))
        .map_err(|e| {
            PlacementError::MoveFailed {
                source_path: src.to_path_buf(),
                dest_path: dest.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
}
