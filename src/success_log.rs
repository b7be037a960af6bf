//! Durable append-only log of successfully completed downloads
//!
//! One timestamped line per completed URL, independent of per-run
//! summaries, so an operator can audit what has ever finished even after
//! many runs.

use crate::error::Result;
use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only success log
#[derive(Debug)]
pub struct SuccessLog {
    file: File,
    path: PathBuf,
}

impl SuccessLog {
    /// Open (or create) the success log for appending
    ///
    /// Parent directories are created if missing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened for appending.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { file, path })
    }

    /// The log file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one completed URL, flushed immediately
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the write or flush fails.
    pub fn append(&mut self, url: &str) -> Result<()> {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(self.file, "{timestamp} - Successfully downloaded: {url}")?;
        self.file.flush()?;
        Ok(())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_missing_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs").join("successful_downloads.log");
        let log = SuccessLog::open(&path).unwrap();
        assert_eq!(log.path(), path);
        assert!(path.exists());
    }

    #[test]
    fn append_writes_one_timestamped_line_per_url() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("success.log");
        let mut log = SuccessLog::open(&path).unwrap();

        log.append("https://www.instagram.com/p/AAA/").unwrap();
        log.append("https://www.instagram.com/p/BBB/").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Successfully downloaded: https://www.instagram.com/p/AAA/"));
        assert!(lines[1].ends_with("Successfully downloaded: https://www.instagram.com/p/BBB/"));
    }

    #[test]
    fn reopening_appends_rather_than_truncates() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("success.log");

        {
            let mut log = SuccessLog::open(&path).unwrap();
            log.append("https://www.instagram.com/p/First/").unwrap();
        }
        {
            let mut log = SuccessLog::open(&path).unwrap();
            log.append("https://www.instagram.com/p/Second/").unwrap();
        }

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("First"));
        assert!(contents.contains("Second"));
    }
}
