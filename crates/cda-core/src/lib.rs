//! cda.pl Downloader Core Library
//!
//! Crawls cda.pl folder hierarchies and downloads the videos they contain.
//!
//! # Overview
//!
//! This crate provides:
//! - URL classification for video and folder links
//! - De-obfuscation of the player's encoded media URLs
//! - A recursive folder crawler with listing-page pagination
//! - Bounded-concurrency video downloads behind one shared semaphore
//! - Optional per-folder progress bars
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cda_core::{CdaClient, DownloadOptions, Downloader, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Arc::new(CdaClient::new()?);
//!     let downloader = Downloader::new(client, DownloadOptions::default());
//!
//!     let urls = vec!["https://www.cda.pl/user/myfolder".to_string()];
//!     let report = downloader.download(&urls).await?;
//!     println!("{} downloaded, {} skipped", report.downloaded, report.skipped);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Failure policy
//!
//! Unrecognized URLs, flag misuse, missing page structure and unavailable
//! resolutions abort the run. Transport and disk errors while downloading one
//! video are logged and counted in [`DownloadReport::failed`]; the other
//! videos carry on.

mod client;
pub mod decoder;
mod downloader;
mod error;
mod folder;
pub mod parser;
mod progress;
mod types;
pub mod url;
mod video;

// Re-export client types
pub use client::{CdaClient, ClientConfig};

// Re-export error types
pub use error::{CdaError, Result};

// Re-export the crawl tree
pub use folder::Folder;
pub use video::{MEDIA_EXTENSION, Video};

// Re-export orchestration
pub use downloader::{DownloadOptions, Downloader, Target};
pub use progress::Progress;

// Re-export data types
pub use types::{DownloadOutcome, DownloadReport, PlayerData, PlayerVideo, Resolution};

// Re-export helpers for convenience
pub use decoder::decrypt_url;
pub use url::{UrlKind, adjust_folder_url, classify, is_folder, is_video};
