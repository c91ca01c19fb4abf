//! Run-level orchestration
//!
//! Classifies every input URL up front, validates flag usage and then drives
//! one [`Folder`] crawl or [`Video`] download per input under a single
//! admission gate.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::client::CdaClient;
use crate::error::{CdaError, Result};
use crate::folder::Folder;
use crate::progress::Progress;
use crate::types::{DownloadReport, Resolution};
use crate::url::{UrlKind, classify};
use crate::video::Video;

/// Options for one downloader run
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Root directory for downloads (default: current directory)
    pub directory: PathBuf,
    /// Forced resolution label; only valid when every input is a video
    pub resolution: Option<String>,
    /// Re-download files that already exist (default: false)
    pub overwrite: bool,
    /// Maximum video downloads in flight across the run (default: 3)
    pub max_concurrent: usize,
    /// Draw per-folder progress bars on stderr (default: false)
    pub progress: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            resolution: None,
            overwrite: false,
            max_concurrent: 3,
            progress: false,
        }
    }
}

/// A classified input URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Video(String),
    Folder(String),
}

/// Entry point for downloading a list of URLs
pub struct Downloader {
    client: Arc<CdaClient>,
    options: DownloadOptions,
    progress: Progress,
}

impl Downloader {
    pub fn new(client: Arc<CdaClient>, options: DownloadOptions) -> Self {
        let progress = if options.progress {
            Progress::new()
        } else {
            Progress::hidden()
        };
        Self {
            client,
            options,
            progress,
        }
    }

    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    /// Classifies all inputs before any work starts
    ///
    /// # Errors
    /// - `UnrecognizedUrl` if any input is neither a video nor a folder
    /// - `FlagMisuse` if a resolution is forced and any input is a folder
    pub fn plan(&self, urls: &[String]) -> Result<Vec<Target>> {
        let targets = classify_all(urls)?;
        if self.options.resolution.is_some() && has_folder(&targets) {
            return Err(CdaError::FlagMisuse(
                "-r flag is only available for videos.".to_string(),
            ));
        }
        Ok(targets)
    }

    /// Lists the resolutions of every input video
    ///
    /// # Errors
    /// - `UnrecognizedUrl` if any input is neither a video nor a folder
    /// - `FlagMisuse` if any input is a folder
    pub async fn list_resolutions(&self, urls: &[String]) -> Result<Vec<(String, Vec<Resolution>)>> {
        let targets = classify_all(urls)?;
        if has_folder(&targets) {
            return Err(CdaError::FlagMisuse(
                "-R flag is only available for videos.".to_string(),
            ));
        }

        let mut listed = Vec::with_capacity(targets.len());
        for target in targets {
            if let Target::Video(url) = target {
                let video = self.video(&url)?;
                let resolutions = video.list_resolutions().await?;
                listed.push((video.url().to_string(), resolutions));
            }
        }
        Ok(listed)
    }

    /// Downloads every input in order
    ///
    /// One gate with `max_concurrent` permits bounds video downloads across
    /// all inputs, including videos found deep inside folders.
    pub async fn download(&self, urls: &[String]) -> Result<DownloadReport> {
        let targets = self.plan(urls)?;
        let gate = Semaphore::new(self.options.max_concurrent.max(1));
        tokio::fs::create_dir_all(&self.options.directory).await?;

        let mut report = DownloadReport::default();
        for target in targets {
            match target {
                Target::Video(url) => {
                    let video = self.video(&url)?;
                    let outcome = video.download_gated(&gate, self.options.overwrite).await?;
                    report.record(outcome);
                }
                Target::Folder(url) => {
                    let mut folder =
                        Folder::new(&url, &self.options.directory, Arc::clone(&self.client));
                    report += folder
                        .crawl(&gate, &self.progress, self.options.overwrite)
                        .await?;
                }
            }
        }

        tracing::info!(
            downloaded = report.downloaded,
            skipped = report.skipped,
            failed = report.failed,
            "run finished"
        );
        Ok(report)
    }

    fn video(&self, url: &str) -> Result<Video> {
        let requested = match &self.options.resolution {
            Some(label) => label.parse().unwrap_or_default(),
            None => Resolution::Best,
        };
        Video::new(url, &self.options.directory, requested, Arc::clone(&self.client))
    }
}

fn classify_all(urls: &[String]) -> Result<Vec<Target>> {
    urls.iter()
        .map(|url| match classify(url) {
            UrlKind::Video { .. } => Ok(Target::Video(url.clone())),
            UrlKind::Folder { .. } => Ok(Target::Folder(url.clone())),
            UrlKind::Unrecognized => Err(CdaError::UnrecognizedUrl(url.clone())),
        })
        .collect()
}

fn has_folder(targets: &[Target]) -> bool {
    targets.iter().any(|t| matches!(t, Target::Folder(_)))
}
