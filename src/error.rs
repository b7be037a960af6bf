//! Error types for insta-dl
//!
//! The taxonomy follows the run lifecycle: configuration errors are fatal and
//! abort before the URL loop starts; everything else is recorded as a per-URL
//! failure and never stops the run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for insta-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for insta-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid.
    /// Fatal: aborts the run before any URL is processed.
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "input_file")
        key: Option<String>,
    },

    /// Shortcode could not be extracted from a post URL
    #[error("could not extract shortcode from URL: {0}")]
    MalformedUrl(String),

    /// The external fetch capability failed (network, rate-limit,
    /// private/deleted post, tool execution failure)
    #[error("fetch error: {0}")]
    Fetch(String),

    /// File placement into the final layout failed
    #[error("placement error: {0}")]
    Placement(#[from] PlacementError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error (proxy probe)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error (cookie file parsing)
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error for a specific setting
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// True for errors that must abort the run before the loop starts
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config { .. })
    }

    /// Get the machine-readable error code
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Config { .. } => ErrorCode::ConfigError,
            Error::MalformedUrl(_) => ErrorCode::MalformedUrl,
            Error::Fetch(_) => ErrorCode::FetchError,
            Error::Placement(_) => ErrorCode::PlacementError,
            Error::Io(_) => ErrorCode::IoError,
            Error::Network(_) => ErrorCode::NetworkError,
            Error::Serialization(_) => ErrorCode::SerializationError,
        }
    }
}

/// File placement errors (moves into the final layout)
#[derive(Debug, Error)]
pub enum PlacementError {
    /// File move failed
    #[error("failed to move {source_path} to {dest_path}: {reason}")]
    MoveFailed {
        /// The source path of the file being moved
        source_path: PathBuf,
        /// The destination path where the file should be moved
        dest_path: PathBuf,
        /// The reason the move failed
        reason: String,
    },

    /// Destination directory could not be created
    #[error("failed to create directory {path}: {reason}")]
    CreateDirFailed {
        /// The directory that could not be created
        path: PathBuf,
        /// The reason creation failed
        reason: String,
    },

    /// Invalid path encountered during placement
    #[error("invalid path {path}: {reason}")]
    InvalidPath {
        /// The invalid path that was encountered
        path: PathBuf,
        /// The reason the path is invalid
        reason: String,
    },
}

/// Machine-readable error codes, attached to failure log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Fatal configuration error
    ConfigError,
    /// Shortcode extraction failed
    MalformedUrl,
    /// External fetch capability failed
    FetchError,
    /// Placement into the final layout failed
    PlacementError,
    /// I/O error
    IoError,
    /// Network error
    NetworkError,
    /// Serialization error
    SerializationError,
}

impl ErrorCode {
    /// The snake_case code string, for structured log fields
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigError => "config_error",
            ErrorCode::MalformedUrl => "malformed_url",
            ErrorCode::FetchError => "fetch_error",
            ErrorCode::PlacementError => "placement_error",
            ErrorCode::IoError => "io_error",
            ErrorCode::NetworkError => "network_error",
            ErrorCode::SerializationError => "serialization_error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
