//! Core data types shared by the crawler and downloader

use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Requested or available video resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Highest explicit resolution the video offers
    #[default]
    Best,
    /// A label shown by the player, e.g. `720p`
    Explicit(String),
}

impl Resolution {
    /// The explicit label, `None` for [`Resolution::Best`]
    pub fn label(&self) -> Option<&str> {
        match self {
            Resolution::Best => None,
            Resolution::Explicit(label) => Some(label),
        }
    }

    /// Numeric height of the label (`"720p"` -> 720), 0 when not numeric
    pub fn height(&self) -> u32 {
        self.label()
            .map(|label| {
                label
                    .trim()
                    .to_lowercase()
                    .trim_end_matches('p')
                    .parse::<u32>()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Best => f.write_str("best"),
            Resolution::Explicit(label) => f.write_str(label),
        }
    }
}

impl FromStr for Resolution {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("best") || trimmed.eq_ignore_ascii_case("najlepsza") {
            Ok(Resolution::Best)
        } else {
            Ok(Resolution::Explicit(trimmed.to_string()))
        }
    }
}

/// Result of one video download attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// File was fetched and written
    Downloaded,
    /// File already existed and overwriting was off
    Skipped,
    /// Transport or storage failed for this video only
    Failed,
}

/// Counters for a crawl or a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadReport {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl DownloadReport {
    /// Counts a single outcome
    pub fn record(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded => self.downloaded += 1,
            DownloadOutcome::Skipped => self.skipped += 1,
            DownloadOutcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }
}

impl AddAssign for DownloadReport {
    fn add_assign(&mut self, other: Self) {
        self.downloaded += other.downloaded;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// `player_data` attribute of the video page's media player element
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerData {
    pub video: PlayerVideo,
}

/// Video section of [`PlayerData`]
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerVideo {
    #[serde(default)]
    pub id: Option<String>,

    /// Obfuscated media reference for the currently selected quality
    #[serde(default)]
    pub file: Option<String>,

    /// Resolution label -> internal quality code, in page order
    #[serde(default)]
    pub qualities: serde_json::Map<String, serde_json::Value>,
}
