//! Cookie file loading for the fetch capability's session
//!
//! Cookies come from a JSON export (an array of `{name, value, domain}`
//! objects, as produced by common browser extensions). They are applied to
//! the fetch capability before any fetch; for the CLI fetcher that means
//! rendering them as a Netscape `cookies.txt` file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Default cookie domain when the export omits one
pub const DEFAULT_COOKIE_DOMAIN: &str = ".instagram.com";

/// A single session cookie
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Cookie domain (defaults to [`DEFAULT_COOKIE_DOMAIN`])
    #[serde(default = "default_domain")]
    pub domain: String,
}

fn default_domain() -> String {
    DEFAULT_COOKIE_DOMAIN.to_string()
}

/// Load cookies from a JSON export file
///
/// # Errors
///
/// Returns a fatal [`Error::Config`] when the file is missing, unreadable,
/// or not a JSON array of cookie objects.
pub fn load_cookies(path: &Path) -> Result<Vec<Cookie>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::config(
            format!("failed to read cookie file {}: {e}", path.display()),
            "cookie_file",
        )
    })?;
    let cookies: Vec<Cookie> = serde_json::from_str(&contents).map_err(|e| {
        Error::config(
            format!("failed to parse cookie file {}: {e}", path.display()),
            "cookie_file",
        )
    })?;
    Ok(cookies)
}

/// Render cookies as a Netscape-format `cookies.txt` file
///
/// This is the format external downloader binaries accept for session
/// injection. Host-only semantics are not preserved; every cookie is
/// written with the include-subdomains flag.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn write_netscape_file(cookies: &[Cookie], dest: &Path) -> Result<()> {
    let mut out = fs::File::create(dest)?;
    writeln!(out, "# Netscape HTTP Cookie File")?;
    for cookie in cookies {
        // domain, include-subdomains, path, secure, expiry, name, value
        writeln!(
            out,
            "{}\tTRUE\t/\tTRUE\t0\t{}\t{}",
            cookie.domain, cookie.name, cookie.value
        )?;
    }
    Ok(())
}
