//! # insta-dl
//!
//! Batch Instagram post downloader with filesystem dedup and media sorting.
//!
//! Reads a newline-delimited list of post URLs, skips posts whose media
//! already exists under the output layout, fetches the rest one at a time
//! through an external downloader, and sorts the results into
//! `albums/`, `individual_images/`, and `individual_videos/` directories.
//!
//! ## Design
//!
//! - **Sequential by design** — one post is fully fetched, placed, and
//!   cleaned up before the next begins, with a configurable delay between
//!   fetches for rate-limit avoidance.
//! - **Idempotent resumability** — per-URL failures are counted and logged
//!   but never abort the run; re-running the tool skips everything that
//!   already completed.
//! - **Injected fetch capability** — all authentication, pagination, and
//!   media resolution is delegated to an external binary behind the
//!   [`PostFetcher`] trait, so the orchestrator is testable with canned
//!   descriptors.
//!
//! ## Quick Start
//!
//! ```no_run
//! use insta_dl::{CliPostFetcher, Config, Downloader};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let fetcher = CliPostFetcher::from_path()
//!         .ok_or("no downloader binary found in PATH")?;
//!
//!     let downloader = Downloader::new(config, Arc::new(fetcher));
//!     let summary = downloader.run().await?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Cookie file loading for the fetch session
pub mod cookies;
/// Filesystem layout and deduplication checks
pub mod dedup;
/// Download orchestration loop
pub mod downloader;
/// Error types
pub mod error;
/// External fetch capability (trait and CLI implementation)
pub mod fetcher;
/// File classification and placement into the final layout
pub mod placement;
/// Proxy connectivity probe
pub mod proxy;
/// Shortcode extraction from post URLs
pub mod shortcode;
/// Durable append-only success log
pub mod success_log;
/// Core types
pub mod types;

pub use config::{Config, DownloadConfig, FetcherConfig, NetworkConfig};
pub use cookies::Cookie;
pub use dedup::Layout;
pub use downloader::Downloader;
pub use error::{Error, ErrorCode, PlacementError, Result};
pub use fetcher::{CliPostFetcher, PostFetcher};
pub use types::{PostDescriptor, PostKind, PostReference, RunSummary, Shortcode};
