//! A single downloadable cda.pl video
//!
//! A [`Video`] resolves the resolutions its page offers, picks one, decodes
//! the media URL for it and streams the file into its directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::client::CdaClient;
use crate::decoder::decrypt_url;
use crate::error::{CdaError, Result};
use crate::parser::{parse_encoded_media_reference, parse_resolution_labels};
use crate::types::{DownloadOutcome, Resolution};
use crate::url::video_match;

/// File extension of downloaded media
pub const MEDIA_EXTENSION: &str = "mp4";

/// One video page and where to store it
#[derive(Debug, Clone)]
pub struct Video {
    url: String,
    video_id: String,
    directory: PathBuf,
    requested: Resolution,
    client: Arc<CdaClient>,
}

impl Video {
    /// Create a video from its page URL
    ///
    /// # Errors
    /// Returns `InvalidUrl` if `url` is not a video URL
    pub fn new(
        url: &str,
        directory: impl Into<PathBuf>,
        requested: Resolution,
        client: Arc<CdaClient>,
    ) -> Result<Self> {
        let video_id =
            video_match(url).ok_or_else(|| CdaError::InvalidUrl(url.to_string()))?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            video_id,
            directory: directory.into(),
            requested,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn requested(&self) -> &Resolution {
        &self.requested
    }

    /// Where the file ends up: `{directory}/{video_id}.mp4`
    pub fn target_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.video_id, MEDIA_EXTENSION))
    }

    /// Fetches the video page and lists its resolutions
    ///
    /// The first entry is always [`Resolution::Best`], followed by the
    /// explicit labels in page order.
    pub async fn list_resolutions(&self) -> Result<Vec<Resolution>> {
        let html = self.client.fetch(&self.url).await?;
        let labels = parse_resolution_labels(&html, &self.video_id)?;

        Ok(std::iter::once(Resolution::Best)
            .chain(labels.into_iter().map(Resolution::Explicit))
            .collect())
    }

    /// Picks the label to download from `available`
    ///
    /// For [`Resolution::Best`] this is the explicit label with the greatest
    /// height; among equal heights the one listed first wins. `None` means the
    /// page lists no explicit labels, so the default rendition is used.
    ///
    /// # Errors
    /// Returns `ResolutionUnavailable` if an explicit request is not offered
    pub fn select_resolution(&self, available: &[Resolution]) -> Result<Option<String>> {
        match &self.requested {
            Resolution::Best => Ok(available
                .iter()
                .filter(|res| res.label().is_some())
                .rev()
                .max_by_key(|res| res.height())
                .and_then(|res| res.label())
                .map(str::to_string)),
            Resolution::Explicit(label) => {
                if available.contains(&self.requested) {
                    Ok(Some(label.clone()))
                } else {
                    Err(CdaError::ResolutionUnavailable {
                        resolution: label.clone(),
                        url: self.url.clone(),
                    })
                }
            }
        }
    }

    /// Fetches the page rendered for `resolution` and decodes its media URL
    ///
    /// Never cached; each call hits the network.
    pub async fn fetch_source_url(&self, resolution: Option<&str>) -> Result<String> {
        let page_url = match resolution {
            Some(label) => format!("{}?wersja={}", self.url, urlencoding::encode(label)),
            None => self.url.clone(),
        };

        let html = self.client.fetch(&page_url).await?;
        let encoded = parse_encoded_media_reference(&html, &self.video_id)?;
        Ok(decrypt_url(&encoded))
    }

    /// Downloads the video unless it is already on disk
    ///
    /// With `overwrite` off an existing target is skipped before any request
    /// is made.
    pub async fn download(&self, overwrite: bool) -> Result<DownloadOutcome> {
        let target = self.target_path();
        if !overwrite && target.exists() {
            tracing::info!(video = %self.video_id, path = %target.display(), "already downloaded, skipping");
            return Ok(DownloadOutcome::Skipped);
        }

        let available = self.list_resolutions().await?;
        let resolution = self.select_resolution(&available)?;
        let source = self.fetch_source_url(resolution.as_deref()).await?;

        tracing::debug!(
            video = %self.video_id,
            resolution = resolution.as_deref().unwrap_or("default"),
            "resolved media url"
        );

        let bytes = self.client.stream_to_file(&source, &target).await?;
        tracing::info!(video = %self.video_id, bytes, path = %target.display(), "downloaded");

        Ok(DownloadOutcome::Downloaded)
    }

    /// [`Video::download`] behind an admission gate permit
    ///
    /// Transport and storage errors are logged and reported as
    /// [`DownloadOutcome::Failed`]; fatal errors are returned.
    pub async fn download_gated(&self, gate: &Semaphore, overwrite: bool) -> Result<DownloadOutcome> {
        let _permit = gate.acquire().await.map_err(|_| CdaError::GateClosed)?;
        match self.download(overwrite).await {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::error!(video = %self.url, error = %e, "download failed");
                Ok(DownloadOutcome::Failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(requested: Resolution) -> Video {
        let client = Arc::new(CdaClient::new().unwrap());
        Video::new("https://www.cda.pl/video/abc123", "/tmp/out", requested, client).unwrap()
    }

    fn available(labels: &[&str]) -> Vec<Resolution> {
        std::iter::once(Resolution::Best)
            .chain(labels.iter().map(|l| Resolution::Explicit(l.to_string())))
            .collect()
    }

    #[test]
    fn test_new_extracts_video_id() {
        let v = video(Resolution::Best);
        assert_eq!(v.video_id(), "abc123");
        assert_eq!(v.url(), "https://www.cda.pl/video/abc123");
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = Arc::new(CdaClient::new().unwrap());
        let v = Video::new("https://www.cda.pl/video/abc123/", ".", Resolution::Best, client)
            .unwrap();
        assert_eq!(v.url(), "https://www.cda.pl/video/abc123");
    }

    #[test]
    fn test_new_rejects_folder_url() {
        let client = Arc::new(CdaClient::new().unwrap());
        let result = Video::new("https://www.cda.pl/user/myfolder", ".", Resolution::Best, client);
        assert!(matches!(result, Err(CdaError::InvalidUrl(_))));
    }

    #[test]
    fn test_target_path() {
        let v = video(Resolution::Best);
        assert_eq!(v.target_path(), PathBuf::from("/tmp/out/abc123.mp4"));
    }

    #[test]
    fn test_select_best_picks_highest() {
        let v = video(Resolution::Best);
        let selected = v.select_resolution(&available(&["480p", "720p"])).unwrap();
        assert_eq!(selected.as_deref(), Some("720p"));
    }

    #[test]
    fn test_select_best_ignores_page_order() {
        let v = video(Resolution::Best);
        let selected = v
            .select_resolution(&available(&["1080p", "360p", "720p"]))
            .unwrap();
        assert_eq!(selected.as_deref(), Some("1080p"));
    }

    #[test]
    fn test_select_best_without_explicit_labels() {
        let v = video(Resolution::Best);
        assert_eq!(v.select_resolution(&available(&[])).unwrap(), None);
    }

    #[test]
    fn test_select_best_ties_take_first() {
        let v = video(Resolution::Best);
        let selected = v.select_resolution(&available(&["hd", "sd"])).unwrap();
        assert_eq!(selected.as_deref(), Some("hd"));

        let selected = v
            .select_resolution(&available(&["360p", "720p", "720P"]))
            .unwrap();
        assert_eq!(selected.as_deref(), Some("720p"));
    }

    #[test]
    fn test_select_explicit_available() {
        let v = video(Resolution::Explicit("480p".to_string()));
        let selected = v.select_resolution(&available(&["480p", "720p"])).unwrap();
        assert_eq!(selected.as_deref(), Some("480p"));
    }

    #[test]
    fn test_select_explicit_unavailable() {
        let v = video(Resolution::Explicit("1080p".to_string()));
        match v.select_resolution(&available(&["480p", "720p"])) {
            Err(CdaError::ResolutionUnavailable { resolution, url }) => {
                assert_eq!(resolution, "1080p");
                assert_eq!(url, "https://www.cda.pl/video/abc123");
            }
            other => panic!("Expected ResolutionUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_download_skips_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(CdaClient::new().unwrap());
        let v = Video::new(
            "https://www.cda.pl/video/abc123",
            dir.path(),
            Resolution::Best,
            client,
        )
        .unwrap();
        std::fs::write(v.target_path(), b"already here").unwrap();

        let outcome = v.download(false).await.unwrap();
        assert_eq!(outcome, DownloadOutcome::Skipped);
        assert_eq!(std::fs::read(v.target_path()).unwrap(), b"already here");
    }

    #[tokio::test]
    async fn test_download_gated_releases_permit() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(CdaClient::new().unwrap());
        let v = Video::new("https://www.cda.pl/video/abc123", dir.path(), Resolution::Best, client)
            .unwrap();
        std::fs::write(v.target_path(), b"x").unwrap();

        let gate = Semaphore::new(1);
        assert_eq!(v.download_gated(&gate, false).await.unwrap(), DownloadOutcome::Skipped);
        assert_eq!(gate.available_permits(), 1);
    }

    #[tokio::test]
    async fn test_download_gated_closed_gate() {
        let v = video(Resolution::Best);
        let gate = Semaphore::new(1);
        gate.close();
        assert!(matches!(
            v.download_gated(&gate, false).await,
            Err(CdaError::GateClosed)
        ));
    }
}
