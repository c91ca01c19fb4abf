//! Recursive crawl of a cda.pl folder
//!
//! A [`Folder`] resolves its title, mirrors it as a directory, crawls its
//! subfolders depth-first, walks every listing page for videos and finally
//! downloads those videos concurrently under a shared admission gate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::try_join_all;
use indicatif::ProgressBar;
use tokio::sync::Semaphore;

use crate::client::CdaClient;
use crate::error::{CdaError, Result};
use crate::parser::{parse_folder_title, parse_subfolder_links, parse_video_links};
use crate::progress::Progress;
use crate::types::{DownloadReport, Resolution};
use crate::url::{absolute_url, adjust_folder_url, is_video, next_page_url, sanitize_title};
use crate::video::Video;

/// One folder node of the crawl tree
#[derive(Debug)]
pub struct Folder {
    url: String,
    title: Option<String>,
    directory: PathBuf,
    subfolders: Vec<Folder>,
    videos: Vec<Video>,
    client: Arc<CdaClient>,
}

impl Folder {
    /// Create a folder rooted under `directory`
    ///
    /// The URL is page-adjusted so it always points at a listing page.
    pub fn new(url: &str, directory: impl Into<PathBuf>, client: Arc<CdaClient>) -> Self {
        Self {
            url: adjust_folder_url(url),
            title: None,
            directory: directory.into(),
            subfolders: Vec::new(),
            videos: Vec::new(),
            client,
        }
    }

    /// Current listing page URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sanitized title, once resolved
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Destination directory (the parent until the title is resolved)
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn subfolders(&self) -> &[Folder] {
        &self.subfolders
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    /// Crawls this folder and everything below it
    ///
    /// Subfolders are crawled one at a time and finish before this folder's
    /// own videos start. Videos run concurrently, each holding a `gate`
    /// permit while it talks to the network. Both stages tick a bar on
    /// `progress` labelled with the folder title.
    pub async fn crawl(
        &mut self,
        gate: &Semaphore,
        progress: &Progress,
        overwrite: bool,
    ) -> Result<DownloadReport> {
        let landing = self.client.fetch(&self.url).await?;
        self.resolve_title(&landing)?;
        self.make_directory().await?;

        let title = self.title.clone().unwrap_or_default();
        tracing::info!(folder = %title, url = %self.url, "crawling folder");

        let mut report = DownloadReport::default();

        self.subfolders = self.discover_subfolders(&landing)?;
        let folder_bar = progress.folder_bar(&title, self.subfolders.len());
        for subfolder in &mut self.subfolders {
            report += Box::pin(subfolder.crawl(gate, progress, overwrite)).await?;
            folder_bar.inc(1);
        }
        folder_bar.finish_and_clear();

        self.videos = self.discover_videos().await?;
        let video_bar = progress.video_bar(&title, self.videos.len());
        report += self.download_videos(gate, &video_bar, overwrite).await?;
        video_bar.finish_and_clear();

        tracing::info!(
            folder = %title,
            downloaded = report.downloaded,
            skipped = report.skipped,
            failed = report.failed,
            "folder finished"
        );
        Ok(report)
    }

    /// Sets the title from the landing page
    ///
    /// # Errors
    /// Returns `ParseError` if the page has no title marker
    pub fn resolve_title(&mut self, landing_html: &str) -> Result<&str> {
        let raw = parse_folder_title(landing_html)?;
        Ok(self.title.insert(sanitize_title(&raw)).as_str())
    }

    /// Moves into `{parent}/{title}` and creates it
    async fn make_directory(&mut self) -> Result<()> {
        let title = self
            .title
            .as_deref()
            .ok_or_else(|| CdaError::ParseError("Folder title not resolved".to_string()))?;
        self.directory = self.directory.join(title);
        tokio::fs::create_dir_all(&self.directory).await?;
        Ok(())
    }

    /// Builds child folders from the landing page links
    ///
    /// Children inherit the current directory, so call this after the
    /// title is resolved.
    pub fn discover_subfolders(&self, landing_html: &str) -> Result<Vec<Folder>> {
        Ok(parse_subfolder_links(landing_html)?
            .iter()
            .map(|href| Folder::new(&absolute_url(href), &self.directory, Arc::clone(&self.client)))
            .collect())
    }

    /// Walks listing pages until one has no videos
    ///
    /// Leaves `url` pointing at the empty page. An empty page caused by a
    /// transient server hiccup ends the walk just like the real last page.
    /// Thumbnails that do not point at a video page are skipped.
    pub async fn discover_videos(&mut self) -> Result<Vec<Video>> {
        let mut videos = Vec::new();

        loop {
            let html = self.client.fetch(&self.url).await?;
            let links = parse_video_links(&html)?;
            tracing::debug!(url = %self.url, count = links.len(), "listing page");

            if links.is_empty() {
                break;
            }

            for href in links {
                let url = absolute_url(&href);
                if !is_video(&url) {
                    tracing::warn!(url = %url, folder = %self.url, "skipping non-video thumbnail");
                    continue;
                }
                videos.push(Video::new(
                    &url,
                    &self.directory,
                    Resolution::Best,
                    Arc::clone(&self.client),
                )?);
            }
            self.url = next_page_url(&self.url)?;
        }

        Ok(videos)
    }

    async fn download_videos(
        &self,
        gate: &Semaphore,
        bar: &ProgressBar,
        overwrite: bool,
    ) -> Result<DownloadReport> {
        let downloads = self.videos.iter().map(|video| async move {
            let outcome = video.download_gated(gate, overwrite).await;
            bar.inc(1);
            outcome
        });

        let mut report = DownloadReport::default();
        for outcome in try_join_all(downloads).await? {
            report.record(outcome);
        }
        Ok(report)
    }
}
