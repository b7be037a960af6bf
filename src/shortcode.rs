//! Shortcode extraction from post URLs

use crate::error::{Error, Result};
use crate::types::Shortcode;
use regex::Regex;
use std::sync::LazyLock;

/// Matches the token between `/p/` and the next slash (or end of string),
/// e.g. `https://www.instagram.com/p/CxYz_123/`
static SHORTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"instagram\.com/p/([^/]+)/?").expect("shortcode pattern is valid")
});

/// Extract the shortcode from a post URL
///
/// Accepts URLs with or without a trailing slash after the token.
///
/// # Errors
///
/// Returns [`Error::MalformedUrl`] when the URL does not contain a
/// `/p/<token>/` segment.
///
/// # Examples
///
/// ```
/// use insta_dl::shortcode::extract_shortcode;
///
/// let code = extract_shortcode("https://www.instagram.com/p/CxYz_123/").unwrap();
/// assert_eq!(code.as_str(), "CxYz_123");
///
/// assert!(extract_shortcode("https://www.instagram.com/someuser/").is_err());
/// ```
pub fn extract_shortcode(url: &str) -> Result<Shortcode> {
    SHORTCODE_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| Shortcode::new(m.as_str()))
        .ok_or_else(|| Error::MalformedUrl(url.to_string()))
}
