//! Folder listing page parser
//!
//! Extracts the folder title, subfolder links and video links from a
//! cda.pl folder page.

use scraper::{Html, Selector};

use crate::error::{CdaError, Result};

/// Returns the raw folder title
///
/// The breadcrumb renders one `span.folder-one-line` per ancestor; the last one
/// is the current folder.
///
/// # Errors
/// Returns `ParseError` if the page has no title marker
pub fn parse_folder_title(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let span_selector = selector("span.folder-one-line")?;
    let link_selector = selector("a[href]")?;

    document
        .select(&span_selector)
        .last()
        .and_then(|span| span.select(&link_selector).next())
        .map(|link| link.text().collect::<String>().trim().to_string())
        .ok_or_else(|| CdaError::ParseError("Error while parsing folder title".to_string()))
}

/// Returns hrefs of subfolder links carrying a folder id
pub fn parse_subfolder_links(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let link_selector = selector("a.object-folder[href]")?;

    Ok(document
        .select(&link_selector)
        .filter(|link| link.value().attr("data-foldery_id").is_some())
        .filter_map(|link| link.value().attr("href"))
        .map(str::to_string)
        .collect())
}

/// Returns hrefs of the video thumbnails on one listing page
pub fn parse_video_links(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let link_selector = selector("a.thumbnail-link[href]")?;

    Ok(document
        .select(&link_selector)
        .filter_map(|link| link.value().attr("href"))
        .map(str::to_string)
        .collect())
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| CdaError::ParseError(format!("Invalid selector: {:?}", e)))
}
