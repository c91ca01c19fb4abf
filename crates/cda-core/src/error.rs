//! Error types for the cda.pl downloader
//!
//! Every failure in the crawl/download engine is a [`CdaError`]. Most of them
//! end the run; transport and storage failures inside a single video download
//! are reported for that video only (see [`CdaError::is_fatal`]).

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all crawl and download operations
#[derive(Error, Debug)]
pub enum CdaError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading or writing the local filesystem failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Expected page structure was missing
    #[error("{0}")]
    ParseError(String),

    /// Embedded player metadata was not valid JSON
    #[error("Failed to parse player data: {0}")]
    Json(#[from] serde_json::Error),

    /// URL has the wrong shape for the requested operation
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Input URL is neither a video nor a folder
    #[error("Could not recognize the url. Aborting...")]
    UnrecognizedUrl(String),

    /// A flag was combined with an input it does not support
    #[error("{0}")]
    FlagMisuse(String),

    /// Requested resolution is not offered for the video
    #[error("{resolution} resolution is not available for {url}")]
    ResolutionUnavailable { resolution: String, url: String },

    /// Server answered 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server answered 429
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// The download gate was closed while a video waited for a permit
    #[error("Download gate closed")]
    GateClosed,
}

impl CdaError {
    /// Whether this error must end the whole run.
    ///
    /// Transport and storage errors are scoped to the video that raised them.
    /// Folder page fetches propagate them with `?`, which still aborts.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CdaError::Http(_) | CdaError::Io(_) | CdaError::NotFound(_) | CdaError::RateLimited
        )
    }
}

impl Serialize for CdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for cda operations
pub type Result<T> = std::result::Result<T, CdaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unrecognized_url() {
        let error = CdaError::UnrecognizedUrl("https://example.com".to_string());
        assert_eq!(error.to_string(), "Could not recognize the url. Aborting...");
    }

    #[test]
    fn test_error_display_resolution_unavailable() {
        let error = CdaError::ResolutionUnavailable {
            resolution: "1080p".to_string(),
            url: "https://www.cda.pl/video/abc123".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "1080p resolution is not available for https://www.cda.pl/video/abc123"
        );
    }

    #[test]
    fn test_error_display_flag_misuse() {
        let error = CdaError::FlagMisuse("-R flag is only available for videos.".to_string());
        assert_eq!(error.to_string(), "-R flag is only available for videos.");
    }

    #[test]
    fn test_error_display_parse_error() {
        let error = CdaError::ParseError("Error while parsing folder title".to_string());
        assert_eq!(error.to_string(), "Error while parsing folder title");
    }

    #[test]
    fn test_error_display_invalid_url() {
        let error = CdaError::InvalidUrl("not-a-url".to_string());
        assert_eq!(error.to_string(), "Invalid URL: not-a-url");
    }

    #[test]
    fn test_is_fatal() {
        assert!(!CdaError::RateLimited.is_fatal());
        assert!(!CdaError::NotFound("x".to_string()).is_fatal());
        assert!(!CdaError::Io(std::io::Error::other("disk full")).is_fatal());
        assert!(CdaError::ParseError("x".to_string()).is_fatal());
        assert!(CdaError::GateClosed.is_fatal());
        assert!(
            CdaError::ResolutionUnavailable {
                resolution: "1080p".to_string(),
                url: "u".to_string(),
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_error_serialize() {
        let error = CdaError::RateLimited;
        let json = serde_json::to_string(&error).expect("Serialization should succeed");
        assert_eq!(json, "\"Rate limited - too many requests\"");
    }
}
