//! Media URL de-obfuscation
//!
//! The video player receives its media URL in an encoded form: padded with
//! marker tokens, percent-encoded and rotated over the printable ASCII range.
//! [`decrypt_url`] reverses that into a directly fetchable URL.

/// Padding tokens inserted into the encoded string
const MARKERS: [&str; 7] = ["_XDDD", "_CDA", "_ADC", "_CXD", "_QWE", "_Q5", "_IKSDE"];

/// First and last code point of the rotated alphabet
const PRINTABLE_FIRST: u32 = 33;
const PRINTABLE_LAST: u32 = 126;
const ALPHABET_LEN: u32 = PRINTABLE_LAST - PRINTABLE_FIRST + 1;
const ROTATION: u32 = 14;

/// Decodes an obfuscated media reference into a playable URL
///
/// # Arguments
/// * `encoded` - The `file` value from the player metadata
///
/// # Returns
/// An `https://` URL ending in `.mp4` (or with `.mp4` spliced in before
/// `/upstream` for upstream links)
///
/// # Example
/// ```
/// use cda_core::decoder::decrypt_url;
/// assert_eq!(decrypt_url("_XDDD_CDA"), "https://.mp4");
/// ```
pub fn decrypt_url(encoded: &str) -> String {
    let stripped = MARKERS
        .iter()
        .fold(encoded.to_string(), |acc, marker| acc.replace(marker, ""));

    let unquoted = percent_decode(&stripped);
    let rotated: String = unquoted.chars().map(rotate).collect();

    let cleaned = rotated
        .replace(".cda.mp4", "")
        .replace(".2cda.pl", ".cda.pl")
        .replace(".3cda.pl", ".cda.pl");

    if cleaned.contains("/upstream") {
        format!("https://{}", cleaned.replace("/upstream", ".mp4/upstream"))
    } else {
        format!("https://{}.mp4", cleaned)
    }
}

/// Percent-decodes bytewise, keeping malformed escapes and replacing invalid UTF-8
fn percent_decode(text: &str) -> String {
    let bytes = urlencoding::decode_binary(text.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

fn rotate(c: char) -> char {
    let code = c as u32;
    if !(PRINTABLE_FIRST..=PRINTABLE_LAST).contains(&code) {
        return c;
    }
    char::from_u32(PRINTABLE_FIRST + (code + ROTATION) % ALPHABET_LEN).unwrap_or(c)
}
