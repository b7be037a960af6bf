//! Download orchestration: the sequential URL-processing loop
//!
//! Per URL the loop runs parse → dedup → (skip | delay → fetch → place →
//! cleanup → success log). Every per-URL failure is caught at the loop
//! boundary, counted, and logged; the run never aborts early because one
//! URL failed. Resumability comes entirely from the dedup check on the
//! next manual run — there are no automatic retries.

use crate::config::Config;
use crate::dedup::Layout;
use crate::error::{Error, Result};
use crate::fetcher::PostFetcher;
use crate::success_log::SuccessLog;
use crate::types::{PostDescriptor, PostReference, RunSummary};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// The download orchestrator
///
/// Owns the configuration, the output layout, and the injected fetch
/// capability. One [`run`](Self::run) invocation owns its counters
/// exclusively; the loop is fully sequential with no concurrent state.
pub struct Downloader {
    config: Config,
    layout: Layout,
    fetcher: Arc<dyn PostFetcher>,
}

impl Downloader {
    /// Create an orchestrator with an injected fetch capability
    pub fn new(config: Config, fetcher: Arc<dyn PostFetcher>) -> Self {
        let layout = Layout::new(config.base_dir());
        Self {
            config,
            layout,
            fetcher,
        }
    }

    /// The output layout this orchestrator places files into
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Process every URL in the configured input file
    ///
    /// Blank lines are ignored; `total` counts the non-blank lines. An
    /// empty input completes immediately with an all-zero summary.
    ///
    /// # Errors
    ///
    /// Only pre-loop setup failures return an error: a missing input file,
    /// an uncreatable output layout, or an unopenable success log. Per-URL
    /// failures are recorded in the summary instead.
    pub async fn run(&self) -> Result<RunSummary> {
        let input_file = &self.config.download.input_file;
        let contents = fs::read_to_string(input_file).map_err(|e| {
            Error::config(
                format!("input file {} not readable: {e}", input_file.display()),
                "input_file",
            )
        })?;

        self.layout.ensure_dirs()?;
        let mut success_log = SuccessLog::open(&self.config.download.success_log)?;

        let urls: Vec<&str> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut summary = RunSummary {
            total: urls.len(),
            ..RunSummary::default()
        };
        info!(total = summary.total, "found URLs to process");

        for url in urls {
            let post = match PostReference::parse(url) {
                Ok(post) => post,
                Err(e) => {
                    summary.failed += 1;
                    error!(url, code = e.code().as_str(), error = %e, "error processing URL");
                    continue;
                }
            };
            summary.processed += 1;

            if self
                .layout
                .is_already_downloaded(&post.shortcode, None)
            {
                summary.skipped += 1;
                info!(url, "skipping already downloaded post");
                continue;
            }

            // Rate-limit avoidance between fetches; the very first
            // processed URL of the run never waits.
            if summary.processed > 1 {
                tokio::time::sleep(self.config.download.delay()).await;
            }

            info!(
                url,
                progress = format!("{}/{}", summary.processed, summary.total),
                "downloading post"
            );
            match self.download_one(&post).await {
                Ok(descriptor) => {
                    if let Err(e) = success_log.append(&post.raw_url) {
                        warn!(url, error = %e, "failed to append to success log");
                    }
                    info!(
                        shortcode = %post.shortcode,
                        kind = %descriptor.kind,
                        files = descriptor.files.len(),
                        "download finished"
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(url, code = e.code().as_str(), error = %e, "error processing URL");
                }
            }
        }

        info!(%summary, "download run complete");
        Ok(summary)
    }

    /// Fetch and place one post, with guaranteed temp-directory cleanup
    ///
    /// The temp directory is deleted whether the fetch/place attempt
    /// succeeded or errored; the attempt's error (if any) wins over a
    /// cleanup error.
    async fn download_one(&self, post: &PostReference) -> Result<PostDescriptor> {
        let temp_dir = self.temp_dir_for(post);
        fs::create_dir_all(&temp_dir)?;

        let outcome = self.fetch_and_place(post, &temp_dir).await;
        let cleanup = fs::remove_dir_all(&temp_dir);

        match (outcome, cleanup) {
            (Ok(descriptor), Ok(())) => Ok(descriptor),
            (Ok(_), Err(e)) => Err(e.into()),
            (Err(e), cleanup_result) => {
                if let Err(c) = cleanup_result {
                    warn!(temp_dir = %temp_dir.display(), error = %c, "temp dir cleanup failed");
                }
                Err(e)
            }
        }
    }

    async fn fetch_and_place(
        &self,
        post: &PostReference,
        temp_dir: &std::path::Path,
    ) -> Result<PostDescriptor> {
        let descriptor = self.fetcher.fetch_post(&post.shortcode, temp_dir).await?;
        crate::placement::place(temp_dir, descriptor.kind, &post.shortcode, &self.layout)?;
        Ok(descriptor)
    }

    /// Per-shortcode scratch directory, used for one fetch-and-place cycle
    fn temp_dir_for(&self, post: &PostReference) -> PathBuf {
        self.config
            .temp_dir()
            .join(format!("temp_{}", post.shortcode))
    }
}
