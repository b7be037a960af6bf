//! End-to-end orchestrator tests with a canned fetch capability
//!
//! The external downloader is replaced by a scripted fetcher that writes
//! files into the temp directory and returns canned descriptors or errors,
//! so the whole loop (dedup, delay policy, placement, cleanup, summary)
//! runs against a real filesystem without any network.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use insta_dl::{
    Config, DownloadConfig, Downloader, Error, PostDescriptor, PostFetcher, PostKind, Result,
    Shortcode,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// What the scripted fetcher should do for one shortcode
#[derive(Clone)]
enum Script {
    /// Write the given files and report the post kind
    Media(PostKind, Vec<&'static str>),
    /// Fail with a fetch error
    Fail(&'static str),
}

/// Fetcher driven by a per-shortcode script, counting invocations
struct ScriptedFetcher {
    scripts: HashMap<String, Script>,
    fetch_count: AtomicUsize,
}

impl ScriptedFetcher {
    fn new(scripts: Vec<(&str, Script)>) -> Self {
        Self {
            scripts: scripts
                .into_iter()
                .map(|(code, script)| (code.to_string(), script))
                .collect(),
            fetch_count: AtomicUsize::new(0),
        }
    }

    fn fetches(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostFetcher for ScriptedFetcher {
    async fn fetch_post(&self, shortcode: &Shortcode, dest_dir: &Path) -> Result<PostDescriptor> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        match self.scripts.get(shortcode.as_str()) {
            Some(Script::Media(kind, names)) => {
                let mut files = Vec::new();
                for name in names {
                    let path = dest_dir.join(name);
                    fs::write(&path, b"media").unwrap();
                    files.push(path);
                }
                Ok(PostDescriptor {
                    shortcode: shortcode.clone(),
                    kind: *kind,
                    files,
                })
            }
            Some(Script::Fail(reason)) => Err(Error::Fetch((*reason).to_string())),
            None => Err(Error::Fetch(format!("no script for {shortcode}"))),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

struct Harness {
    _root: TempDir,
    config: Config,
    base_dir: PathBuf,
    temp_parent: PathBuf,
}

impl Harness {
    fn new(urls: &[&str]) -> Self {
        let root = TempDir::new().unwrap();
        let base_dir = root.path().join("downloads");
        let temp_parent = root.path().join("temp");
        let input_file = root.path().join("urls.txt");
        fs::write(&input_file, urls.join("\n")).unwrap();

        let config = Config {
            download: DownloadConfig {
                base_dir: base_dir.clone(),
                temp_dir: temp_parent.clone(),
                input_file,
                delay_secs: 0,
                success_log: root.path().join("logs/success.log"),
            },
            ..Config::default()
        };

        Self {
            _root: root,
            config,
            base_dir,
            temp_parent,
        }
    }

    fn downloader(&self, fetcher: Arc<ScriptedFetcher>) -> Downloader {
        Downloader::new(self.config.clone(), fetcher)
    }
}

fn post_url(code: &str) -> String {
    format!("https://www.instagram.com/p/{code}/")
}

#[tokio::test]
async fn album_post_lands_in_album_subdir_and_temp_dir_is_gone() {
    let harness = Harness::new(&[&post_url("XYZ")]);
    let fetcher = Arc::new(ScriptedFetcher::new(vec![(
        "XYZ",
        Script::Media(PostKind::Album, vec!["a.jpg", "b.jpg"]),
    )]));

    let summary = harness.downloader(Arc::clone(&fetcher)).run().await.unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.succeeded(), 1);
    let album = harness.base_dir.join("albums").join("XYZ");
    assert!(album.join("a.jpg").is_file());
    assert!(album.join("b.jpg").is_file());
    assert!(
        !harness.temp_parent.join("temp_XYZ").exists(),
        "temp directory must be deleted after placement"
    );
}

#[tokio::test]
async fn single_video_post_lands_in_individual_videos() {
    let harness = Harness::new(&[&post_url("VID01")]);
    let fetcher = Arc::new(ScriptedFetcher::new(vec![(
        "VID01",
        Script::Media(PostKind::Video, vec!["v.mp4"]),
    )]));

    let summary = harness.downloader(fetcher).run().await.unwrap();

    assert_eq!(summary.succeeded(), 1);
    assert!(harness
        .base_dir
        .join("individual_videos")
        .join("v.mp4")
        .is_file());
}

#[tokio::test]
async fn second_run_skips_everything_already_downloaded() {
    let urls = [post_url("AAA"), post_url("BBB")];
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
    let harness = Harness::new(&url_refs);
    let fetcher = Arc::new(ScriptedFetcher::new(vec![
        ("AAA", Script::Media(PostKind::Image, vec!["AAA.jpg"])),
        ("BBB", Script::Media(PostKind::Video, vec!["BBB.mp4"])),
    ]));

    let first = harness
        .downloader(Arc::clone(&fetcher))
        .run()
        .await
        .unwrap();
    assert_eq!(first.succeeded(), 2);
    assert_eq!(fetcher.fetches(), 2);

    // Same list, no intervening changes: nothing is newly fetched
    let second = harness
        .downloader(Arc::clone(&fetcher))
        .run()
        .await
        .unwrap();
    assert_eq!(second.total, 2);
    assert_eq!(second.skipped, 2);
    assert_eq!(second.failed, 0);
    assert_eq!(second.succeeded(), 0);
    assert_eq!(fetcher.fetches(), 2, "second run must not fetch anything");
}

#[tokio::test]
async fn one_failing_url_does_not_short_circuit_the_run() {
    let urls: Vec<String> = ["U1", "U2", "U3", "U4", "U5"].iter().map(|c| post_url(c)).collect();
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
    let harness = Harness::new(&url_refs);
    let fetcher = Arc::new(ScriptedFetcher::new(vec![
        ("U1", Script::Media(PostKind::Image, vec!["U1.jpg"])),
        ("U2", Script::Media(PostKind::Image, vec!["U2.jpg"])),
        ("U3", Script::Fail("rate limited")),
        ("U4", Script::Media(PostKind::Image, vec!["U4.jpg"])),
        ("U5", Script::Media(PostKind::Image, vec!["U5.jpg"])),
    ]));

    let summary = harness
        .downloader(Arc::clone(&fetcher))
        .run()
        .await
        .unwrap();

    assert_eq!(summary.total, 5);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded(), 4);
    assert_eq!(fetcher.fetches(), 5, "all five URLs must be attempted");

    let images = harness.base_dir.join("individual_images");
    for code in ["U1", "U2", "U4", "U5"] {
        assert!(images.join(format!("{code}.jpg")).is_file());
    }
    assert!(!images.join("U3.jpg").exists());
}

#[tokio::test]
async fn failed_post_is_retried_on_the_next_run() {
    // No automatic retries within a run; a re-run picks up only the
    // posts that are still missing from the layout.
    let urls = [post_url("OK1"), post_url("BAD")];
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
    let harness = Harness::new(&url_refs);

    let failing = Arc::new(ScriptedFetcher::new(vec![
        ("OK1", Script::Media(PostKind::Image, vec!["OK1.jpg"])),
        ("BAD", Script::Fail("temporarily unavailable")),
    ]));
    let first = harness
        .downloader(Arc::clone(&failing))
        .run()
        .await
        .unwrap();
    assert_eq!(first.failed, 1);

    let recovered = Arc::new(ScriptedFetcher::new(vec![
        ("OK1", Script::Media(PostKind::Image, vec!["OK1.jpg"])),
        ("BAD", Script::Media(PostKind::Image, vec!["BAD.jpg"])),
    ]));
    let second = harness
        .downloader(Arc::clone(&recovered))
        .run()
        .await
        .unwrap();
    assert_eq!(second.skipped, 1, "OK1 already downloaded");
    assert_eq!(second.succeeded(), 1, "BAD is fetched this time");
    assert_eq!(recovered.fetches(), 1);
}

#[tokio::test]
async fn empty_input_completes_immediately_with_zero_total() {
    let harness = Harness::new(&[]);
    let fetcher = Arc::new(ScriptedFetcher::new(vec![]));

    let summary = harness.downloader(Arc::clone(&fetcher)).run().await.unwrap();

    assert_eq!(summary.total, 0);
    assert_eq!(summary.succeeded(), 0);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.failed, 0);
    assert_eq!(fetcher.fetches(), 0);
}

#[tokio::test]
async fn mixed_input_reports_consistent_summary_counters() {
    let urls = [
        post_url("M1"),
        "https://www.instagram.com/not-a-post/".to_string(),
        post_url("M2"),
        post_url("M3"),
    ];
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
    let harness = Harness::new(&url_refs);
    let fetcher = Arc::new(ScriptedFetcher::new(vec![
        ("M1", Script::Media(PostKind::Image, vec!["M1.jpg"])),
        ("M2", Script::Fail("deleted post")),
        ("M3", Script::Media(PostKind::Album, vec!["x.jpg", "y.mp4"])),
    ]));

    let summary = harness.downloader(fetcher).run().await.unwrap();

    assert_eq!(summary.total, 4);
    // M1, M2, M3 parsed; the profile URL did not
    assert_eq!(summary.processed, 3);
    // malformed URL + failed fetch
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.succeeded(), 1);

    assert!(harness
        .base_dir
        .join("albums")
        .join("M3")
        .join("y.mp4")
        .is_file());
}
