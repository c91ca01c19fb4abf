//! URL helpers for cda.pl
//!
//! Classifies input URLs as videos or folders, walks folder pagination and
//! turns page-relative links and titles into usable URLs and path segments.

use regex::Regex;

use crate::error::{CdaError, Result};

/// Canonical site root used for page-relative links
pub const SITE_ROOT: &str = "https://www.cda.pl";

const VIDEO_PATTERN: &str =
    r"(?i)^https?://(?:(?:www|ebd)\.)?cda\.pl/(?:video|[0-9]+x[0-9]+)/([0-9a-z]+)";

// `regex` has no look-around, so the category/slug exclusions are checked
// after matching (see `folder_match`).
const FOLDER_SLUG_PATTERN: &str =
    r"(?i)^(https?://(?:www\.)?cda\.pl/([a-z0-9_-]+)/([a-z0-9_-]+))/?(\d*)";
const FOLDER_ID_PATTERN: &str =
    r"(?i)^(https?://(?:www\.)?cda\.pl/([a-z0-9_-]+)/folder/\d+)/?(\d*)";

/// Category of an input URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlKind {
    /// Video page, with the captured video identifier
    Video { id: String },
    /// Folder listing, with its base path and optional 1-based page number
    Folder { base: String, page: Option<u64> },
    /// Anything else
    Unrecognized,
}

/// Structural pieces of a folder URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderMatch {
    /// Folder URL without trailing slash and page segment
    pub base: String,
    /// Page number, if the URL carries one
    pub page: Option<u64>,
}

/// Classifies a URL as video, folder or unrecognized
///
/// The video pattern wins when both would match.
///
/// # Example
/// ```
/// use cda_core::url::{classify, UrlKind};
/// assert_eq!(
///     classify("https://www.cda.pl/video/abc123"),
///     UrlKind::Video { id: "abc123".to_string() }
/// );
/// ```
pub fn classify(url: &str) -> UrlKind {
    if let Some(id) = video_match(url) {
        return UrlKind::Video { id };
    }
    if let Some(FolderMatch { base, page }) = folder_match(url) {
        return UrlKind::Folder { base, page };
    }
    UrlKind::Unrecognized
}

/// Returns the video identifier if `url` is a video page URL
pub fn video_match(url: &str) -> Option<String> {
    let re = Regex::new(VIDEO_PATTERN).ok()?;
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Checks if `url` is a cda.pl video
pub fn is_video(url: &str) -> bool {
    video_match(url).is_some()
}

/// Matches `url` against both folder shapes
///
/// `https://www.cda.pl/<category>/<slug>[/<page>]` is tried first, then
/// `https://www.cda.pl/<category>/folder/<digits>[/<page>]`. The category must
/// not start with `video` and the slug form must not start with `folder/`.
pub fn folder_match(url: &str) -> Option<FolderMatch> {
    let slug_re = Regex::new(FOLDER_SLUG_PATTERN).ok()?;
    if let Some(caps) = slug_re.captures(url) {
        let category = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        let slug_start = caps.get(3).map(|m| m.start()).unwrap_or_default();
        let rest = &url[slug_start..];
        if !starts_with_ignore_case(category, "video") && !starts_with_ignore_case(rest, "folder/")
        {
            return folder_from_captures(&caps);
        }
    }

    let id_re = Regex::new(FOLDER_ID_PATTERN).ok()?;
    let caps = id_re.captures(url)?;
    let category = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    if starts_with_ignore_case(category, "video") {
        return None;
    }
    folder_from_captures(&caps)
}

/// Checks if `url` is a cda.pl folder
pub fn is_folder(url: &str) -> bool {
    folder_match(url).is_some()
}

// A page segment too long for `u64` is not a folder URL at all.
fn folder_from_captures(caps: &regex::Captures<'_>) -> Option<FolderMatch> {
    let base = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
    let page = match caps.get(4).map(|m| m.as_str()).filter(|p| !p.is_empty()) {
        Some(digits) => Some(digits.parse::<u64>().ok()?),
        None => None,
    };
    Some(FolderMatch { base, page })
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Makes sure a folder URL points at an explicit listing page
///
/// Adds a trailing slash, then appends `1/` to folder URLs without a page
/// number. Anything that is not a folder URL only gets the slash. Idempotent.
///
/// # Example
/// ```
/// use cda_core::url::adjust_folder_url;
/// assert_eq!(
///     adjust_folder_url("https://www.cda.pl/user/myfolder"),
///     "https://www.cda.pl/user/myfolder/1/"
/// );
/// ```
pub fn adjust_folder_url(url: &str) -> String {
    let mut url = url.to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    match folder_match(&url) {
        Some(FolderMatch { page: None, .. }) => url + "1/",
        _ => url,
    }
}

/// Builds the URL of the next listing page
///
/// # Errors
/// Returns `InvalidUrl` if `url` is not a folder URL with a page number, or
/// if the page number cannot be advanced
pub fn next_page_url(url: &str) -> Result<String> {
    let Some(FolderMatch {
        base,
        page: Some(page),
    }) = folder_match(url)
    else {
        return Err(CdaError::InvalidUrl(format!(
            "{} is not a paginated folder url",
            url
        )));
    };

    let next = page
        .checked_add(1)
        .ok_or_else(|| CdaError::InvalidUrl(format!("{} has no page after {}", url, page)))?;
    Ok(format!("{}/{}/", base, next))
}

/// Resolves a page link against the site root
///
/// Absolute links are returned unchanged.
pub fn absolute_url(href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", SITE_ROOT, href)
    } else {
        format!("{}/{}", SITE_ROOT, href)
    }
}

/// Turns a display title into a filesystem-safe path segment
///
/// Drops everything except word characters, whitespace and hyphens, collapses
/// whitespace/hyphen runs into `_` and trims underscores from both ends.
pub fn sanitize_title(title: &str) -> String {
    let (Ok(unsafe_chars), Ok(separators)) = (Regex::new(r"[^\w\s-]"), Regex::new(r"[\s-]+"))
    else {
        return title.to_string();
    };
    let cleaned = unsafe_chars.replace_all(title, "");
    let joined = separators.replace_all(&cleaned, "_");
    joined.trim_matches('_').to_string()
}
