//! Data models for scraped candidates, classification results, and the
//! edition digest.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Region`], [`Edition`], [`NewsScope`]: geographic labels and selectors
//! - [`Article`]: a research article from the Modo content API
//! - [`NewsItem`]: an industry news entry from an RSS feed or a custom URL
//! - [`DuplicatePair`]: advisory near-duplicate headline pair
//! - [`NewsletterItem`], [`Digest`]: what the edition run hands to downstream tooling

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic label assigned to an article or news item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Europe,
    Us,
    Australia,
    Global,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Europe => "europe",
            Region::Us => "us",
            Region::Australia => "australia",
            Region::Global => "global",
        }
    }

    /// `true` for the regions the "around the world" section draws from
    /// when building a European edition.
    pub fn is_non_europe(&self) -> bool {
        matches!(self, Region::Us | Region::Australia)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The newsletter edition being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    Europe,
    Us,
    Australia,
}

impl Edition {
    pub fn region(&self) -> Region {
        match self {
            Edition::Europe => Region::Europe,
            Edition::Us => Region::Us,
            Edition::Australia => Region::Australia,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.region().as_str()
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which news to keep when filtering: a single region, or no regional gate
/// (`Global` and `All`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NewsScope {
    Europe,
    Us,
    Australia,
    Global,
    All,
}

impl NewsScope {
    /// The region news must be detected as to pass the gate, if any.
    pub fn gate_region(&self) -> Option<Region> {
        match self {
            NewsScope::Europe => Some(Region::Europe),
            NewsScope::Us => Some(Region::Us),
            NewsScope::Australia => Some(Region::Australia),
            NewsScope::Global | NewsScope::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsScope::Europe => "europe",
            NewsScope::Us => "us",
            NewsScope::Australia => "australia",
            NewsScope::Global => "global",
            NewsScope::All => "all",
        }
    }
}

impl From<Edition> for NewsScope {
    fn from(edition: Edition) -> Self {
        match edition {
            Edition::Europe => NewsScope::Europe,
            Edition::Us => NewsScope::Us,
            Edition::Australia => NewsScope::Australia,
        }
    }
}

impl fmt::Display for NewsScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A research article from the Modo content API.
///
/// `detected_region` is filled in by the region classifier at ingestion time
/// from the title, description and slug.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    pub slug: String,
    /// Publication timestamp as returned by the API (may be empty).
    pub date: String,
    pub thumbnail_url: Option<String>,
    pub source_type: String,
    pub categories: Vec<String>,
    pub reading_time_minutes: Option<f64>,
    pub detected_region: Region,
}

/// An industry news entry from an RSS feed or a user-supplied URL.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewsItem {
    pub title: String,
    /// Plain-text summary, HTML stripped, at most 300 characters.
    pub description: String,
    pub url: String,
    /// RFC 3339 UTC timestamp, or empty when the feed gave none.
    pub date: String,
    /// Display name of the publication.
    pub source: String,
    pub category: String,
    /// Region of the feed the item came from.
    pub region: Region,
    /// Region detected from the content; only set when a regional gate ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_region: Option<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detected_isos: Vec<String>,
}

impl NewsItem {
    /// Build an unscored item.
    pub fn new(title: &str, description: &str, url: &str, source: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            url: url.to_string(),
            date: String::new(),
            source: source.to_string(),
            category: "general".to_string(),
            region: Region::Global,
            detected_region: None,
            relevance_score: None,
            detected_isos: Vec::new(),
        }
    }
}

/// Anything with a headline the duplicate detector can compare.
pub trait Headline {
    fn headline(&self) -> &str;
}

impl Headline for Article {
    fn headline(&self) -> &str {
        &self.title
    }
}

impl Headline for NewsItem {
    fn headline(&self) -> &str {
        &self.title
    }
}

impl Headline for &str {
    fn headline(&self) -> &str {
        self
    }
}

impl Headline for String {
    fn headline(&self) -> &str {
        self
    }
}

/// Two candidates in the same list whose headlines look alike.
///
/// Advisory only: both items stay in the output and the reviewer decides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DuplicatePair {
    pub first: usize,
    pub second: usize,
    pub similarity: f64,
}

/// A news entry shaped for the "This Week's News" section: bold headline
/// followed by the rest of the sentence.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewsletterItem {
    pub headline: String,
    pub body: String,
    pub url: String,
    pub source: String,
}

/// Everything gathered for one edition run.
///
/// Serialized to `{json_output_dir}/{local_date}/{edition}.json`.
#[derive(Debug, Serialize)]
pub struct Digest {
    /// The date of the run in `YYYY-MM-DD` format.
    pub local_date: String,
    pub edition: Edition,
    /// All articles fetched from the edition's feed.
    pub featured_candidates: Vec<Article>,
    /// The leading candidates picked for the featured slot.
    pub featured_articles: Vec<Article>,
    pub more_articles: Vec<Article>,
    pub world_articles: Vec<Article>,
    pub news: Vec<NewsItem>,
    pub custom_news: Vec<NewsItem>,
    pub newsletter_news: Vec<NewsletterItem>,
    pub news_duplicates: Vec<DuplicatePair>,
    pub article_duplicates: Vec<DuplicatePair>,
}
