//! Video page parser
//!
//! The video page embeds its player configuration as JSON in the
//! `player_data` attribute of `div#mediaplayer{video_id}`. Resolutions and the
//! obfuscated media reference both come from there.

use scraper::{Html, Selector};

use crate::error::{CdaError, Result};
use crate::types::PlayerData;

/// Extracts and deserializes the player configuration
///
/// Looks for `#mediaplayer{video_id}` first and falls back to the first
/// element carrying a `player_data` attribute.
///
/// # Errors
/// - `ParseError` if no player element exists
/// - `Json` if the attribute is not valid player JSON
pub fn parse_player_data(html: &str, video_id: &str) -> Result<PlayerData> {
    let document = Html::parse_document(html);

    let by_id = Selector::parse(&format!("#mediaplayer{}[player_data]", video_id)).ok();
    let any_player = Selector::parse("[player_data]")
        .map_err(|e| CdaError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let raw = by_id
        .as_ref()
        .and_then(|sel| document.select(sel).next())
        .or_else(|| document.select(&any_player).next())
        .and_then(|element| element.value().attr("player_data"))
        .ok_or_else(|| {
            CdaError::ParseError(format!("Error while parsing player data for {}", video_id))
        })?;

    Ok(serde_json::from_str(raw)?)
}

/// Resolution labels in page order, e.g. `["360p", "480p", "720p"]`
pub fn parse_resolution_labels(html: &str, video_id: &str) -> Result<Vec<String>> {
    let data = parse_player_data(html, video_id)?;
    Ok(data.video.qualities.keys().cloned().collect())
}

/// The obfuscated media reference for the quality the page was rendered with
///
/// # Errors
/// Returns `ParseError` if the player data has no `file`
pub fn parse_encoded_media_reference(html: &str, video_id: &str) -> Result<String> {
    parse_player_data(html, video_id)?
        .video
        .file
        .filter(|file| !file.is_empty())
        .ok_or_else(|| {
            CdaError::ParseError(format!("Error while parsing media reference for {}", video_id))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_page(id: &str, player_json: &str) -> String {
        format!(
            r#"<html><body>
            <div id="mediaplayer{id}" class="pb-video-player-wrap" player_data='{player_json}'></div>
            </body></html>"#
        )
    }

    #[test]
    fn test_parse_resolution_labels_in_page_order() {
        let html = video_page(
            "abc123",
            r#"{"video":{"id":"abc123","file":"x","qualities":{"360p":"sd","720p":"hd","480p":"lq"}}}"#,
        );
        let labels = parse_resolution_labels(&html, "abc123").unwrap();
        assert_eq!(labels, vec!["360p", "720p", "480p"]);
    }

    #[test]
    fn test_parse_encoded_media_reference() {
        let html = video_page(
            "abc123",
            r#"{"video":{"id":"abc123","file":"GH2Hab_XDDD","qualities":{}}}"#,
        );
        assert_eq!(
            parse_encoded_media_reference(&html, "abc123").unwrap(),
            "GH2Hab_XDDD"
        );
    }

    #[test]
    fn test_parse_player_data_falls_back_to_any_player() {
        let html = video_page(
            "other1",
            r#"{"video":{"file":"f","qualities":{"480p":"sd"}}}"#,
        );
        let labels = parse_resolution_labels(&html, "abc123").unwrap();
        assert_eq!(labels, vec!["480p"]);
    }

    #[test]
    fn test_parse_player_data_missing() {
        let html = "<html><body><p>Film niedostępny</p></body></html>";
        match parse_player_data(html, "abc123") {
            Err(CdaError::ParseError(msg)) => assert!(msg.contains("abc123")),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_player_data_invalid_json() {
        let html = video_page("abc123", "not json");
        assert!(matches!(
            parse_player_data(&html, "abc123"),
            Err(CdaError::Json(_))
        ));
    }

    #[test]
    fn test_parse_encoded_media_reference_missing_file() {
        let html = video_page("abc123", r#"{"video":{"qualities":{"480p":"sd"}}}"#);
        assert!(matches!(
            parse_encoded_media_reference(&html, "abc123"),
            Err(CdaError::ParseError(_))
        ));
    }
}
