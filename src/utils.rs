//! Utility functions for text cleanup, date display and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - HTML stripping and length capping for feed summaries
//! - String truncation for logging and terminal listings
//! - Slug and date formatting for display
//! - File system validation for output directories

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Feed summaries are capped at this many characters.
pub const SUMMARY_MAX_CHARS: usize = 300;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strip tags from an HTML fragment, collapse whitespace and cap the length.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_html("<p>Battery <b>news</b></p>"), "Battery news");
/// ```
pub fn clean_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    let collapsed = WHITESPACE.replace_all(&text, " ");
    truncate_chars(collapsed.trim(), SUMMARY_MAX_CHARS)
}

/// Keep at most `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Shorten a headline for a one-line listing, appending `...` when cut.
pub fn shorten(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", truncate_chars(s, max))
    } else {
        s.to_string()
    }
}

/// Capitalize the first character of a string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(upcase("hello"), "Hello");
/// assert_eq!(upcase(""), "");
/// ```
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Turn an article slug into a readable fallback title.
///
/// `"ercot-price-spikes"` becomes `"Ercot Price Spikes"`.
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| upcase(&word.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format an API timestamp as `Mon DD, YYYY` for listings.
///
/// Unparseable input is returned unchanged; empty input is `"Unknown date"`.
pub fn display_date(iso_date: &str) -> String {
    if iso_date.is_empty() {
        return "Unknown date".to_string();
    }
    match DateTime::parse_from_rfc3339(iso_date)
        .or_else(|_| DateTime::parse_from_str(iso_date, "%Y-%m-%dT%H:%M:%S%z"))
    {
        Ok(dt) => dt.format("%b %d, %Y").to_string(),
        Err(_) => iso_date.to_string(),
    }
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a scratch file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    let scratch_path = format!("{}/..__write_check__", path.trim_end_matches('/'));
    match stdfs::File::create(&scratch_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&scratch_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_html_strips_tags_and_whitespace() {
        assert_eq!(
            clean_html("<p>Battery   <b>storage</b>\n news</p>"),
            "Battery storage news"
        );
    }

    #[test]
    fn test_clean_html_caps_length() {
        let long = format!("<p>{}</p>", "x".repeat(500));
        assert_eq!(clean_html(&long).chars().count(), SUMMARY_MAX_CHARS);
    }

    #[test]
    fn test_clean_html_plain_text() {
        assert_eq!(clean_html("no markup here"), "no markup here");
        assert_eq!(clean_html(""), "");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let result = truncate_for_log("£2.7bn storage deal", 2);
        assert!(result.starts_with("£2"));
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("short", 50), "short");
        assert_eq!(shorten("abcdef", 3), "abc...");
    }

    #[test]
    fn test_upcase() {
        assert_eq!(upcase("hello"), "Hello");
        assert_eq!(upcase(""), "");
        assert_eq!(upcase("a"), "A");
    }

    #[test]
    fn test_title_from_slug() {
        assert_eq!(title_from_slug("ercot-price-spikes"), "Ercot Price Spikes");
        assert_eq!(title_from_slug("GB--BESS"), "Gb Bess");
        assert_eq!(title_from_slug(""), "");
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2025-05-06T10:00:00+00:00"), "May 06, 2025");
        assert_eq!(display_date("2025-05-06T10:00:00Z"), "May 06, 2025");
        assert_eq!(display_date("last week"), "last week");
        assert_eq!(display_date(""), "Unknown date");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("out/json");
        let nested = nested.to_str().unwrap();
        ensure_writable_dir(nested).await.unwrap();
        assert!(std::path::Path::new(nested).is_dir());
    }
}
