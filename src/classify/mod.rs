//! Region classification, news relevance and duplicate detection.
//!
//! Everything here is pure: static keyword tables in, labels and scores
//! out. No I/O, no shared mutable state, safe to call from any thread.
//!
//! # Submodules
//!
//! - [`keywords`]: weighted and plain keyword tables
//! - [`region`]: weighted region scoring for research articles
//! - [`relevance`]: relevance scoring and regional gating for news
//! - [`duplicates`]: near-duplicate headline detection
//! - [`isos`]: US grid operator tagging

pub mod duplicates;
pub mod isos;
pub mod keywords;
pub mod region;
pub mod relevance;

pub use duplicates::{DEFAULT_DUPLICATE_THRESHOLD, duplicate_partner, find_duplicates};
pub use isos::tag_isos;
pub use region::{ScoreResult, classify_article, region_scores};
pub use relevance::score_and_filter_news;
