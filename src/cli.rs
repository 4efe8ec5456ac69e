//! Command-line interface definitions for Weekly Dispatch.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The content API endpoints can also be provided via environment variables.

use crate::classify::DEFAULT_DUPLICATE_THRESHOLD;
use crate::models::{Edition, NewsScope};
use crate::outputs::newsletter::DEFAULT_NEWSLETTER_ITEMS;
use crate::scrapers::modo::{DEFAULT_API_URL, DEFAULT_ARTICLE_URL};
use clap::Parser;

/// Longest accepted lookback, in days.
const MAX_LOOKBACK_DAYS: i64 = 3650;

/// Most retries accepted for one request.
const MAX_RETRIES: i64 = 10;

/// Command-line arguments for the Weekly Dispatch application.
///
/// # Examples
///
/// ```sh
/// # US edition with defaults
/// weekly_dispatch -j ./json
///
/// # European edition, news from two scopes, one extra story
/// weekly_dispatch -j ./json -e europe --news-region europe --news-region global \
///     --custom-url https://www.energy-storage.news/some-story/
///
/// # Show why each article got its region
/// weekly_dispatch -j ./json -e australia --explain
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the JSON digest
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Edition to assemble
    #[arg(short, long, value_enum, default_value_t = Edition::Us)]
    pub edition: Edition,

    /// Lookback in days for featured articles
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(i64).range(0..=MAX_LOOKBACK_DAYS))]
    pub days: i64,

    /// Lookback in days for "more" and "around the world" articles
    #[arg(long, default_value_t = 14, value_parser = clap::value_parser!(i64).range(0..=MAX_LOOKBACK_DAYS))]
    pub world_days: i64,

    /// Lookback in days for industry news
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(i64).range(0..=MAX_LOOKBACK_DAYS))]
    pub news_days: i64,

    /// Maximum featured candidates to fetch
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Maximum news items to keep
    #[arg(long, default_value_t = 20)]
    pub news_limit: usize,

    /// Number of candidates promoted to featured articles
    #[arg(long, default_value_t = 3)]
    pub featured: usize,

    /// Number of news items in the newsletter section
    #[arg(long, default_value_t = DEFAULT_NEWSLETTER_ITEMS)]
    pub news_items: usize,

    /// News scope; repeat to combine several (defaults to the edition's scope)
    #[arg(long = "news-region", value_enum)]
    pub news_regions: Vec<NewsScope>,

    /// Extra article URL to include as news; may be repeated
    #[arg(long = "custom-url")]
    pub custom_urls: Vec<String>,

    /// Headline similarity at or above which items are flagged as duplicates
    #[arg(long, default_value_t = DEFAULT_DUPLICATE_THRESHOLD, value_parser = parse_threshold)]
    pub threshold: f64,

    /// Print the keyword matches behind each article's region
    #[arg(long)]
    pub explain: bool,

    /// Retries per HTTP request before giving up
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=MAX_RETRIES))]
    pub max_retries: u8,

    /// Modo content API endpoint
    #[arg(long, env = "MODO_API_URL", default_value = DEFAULT_API_URL)]
    pub modo_api_url: String,

    /// Base URL for public Modo article links
    #[arg(long, env = "MODO_ARTICLE_URL", default_value = DEFAULT_ARTICLE_URL)]
    pub modo_article_url: String,
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("`{raw}` is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("threshold must be between 0 and 1, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(&["weekly_dispatch", "--json-output-dir", "./json"]);

        assert_eq!(cli.json_output_dir, "./json");
        assert_eq!(cli.edition, Edition::Us);
        assert_eq!(cli.days, 7);
        assert_eq!(cli.world_days, 14);
        assert_eq!(cli.news_days, 8);
        assert_eq!(cli.featured, 3);
        assert_eq!(cli.news_items, 4);
        assert_eq!(cli.threshold, 0.65);
        assert!(cli.news_regions.is_empty());
        assert!(!cli.explain);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(&["weekly_dispatch", "-j", "/tmp/json", "-e", "australia", "-c", "cfg.yaml"]);

        assert_eq!(cli.json_output_dir, "/tmp/json");
        assert_eq!(cli.edition, Edition::Australia);
        assert_eq!(cli.config.as_deref(), Some("cfg.yaml"));
    }

    #[test]
    fn test_cli_repeated_flags() {
        let cli = Cli::parse_from(&[
            "weekly_dispatch",
            "-j",
            "./json",
            "--news-region",
            "europe",
            "--news-region",
            "all",
            "--custom-url",
            "https://a.example/1",
            "--custom-url",
            "https://b.example/2",
        ]);

        assert_eq!(cli.news_regions, vec![NewsScope::Europe, NewsScope::All]);
        assert_eq!(cli.custom_urls.len(), 2);
    }

    #[test]
    fn test_cli_threshold_bounds() {
        let cli = Cli::parse_from(&["weekly_dispatch", "-j", "./json", "--threshold", "0.8"]);
        assert_eq!(cli.threshold, 0.8);
        assert!(Cli::try_parse_from(&["weekly_dispatch", "-j", "./json", "--threshold", "1.5"]).is_err());
        assert!(Cli::try_parse_from(&["weekly_dispatch", "-j", "./json", "--threshold", "high"]).is_err());
    }

    #[test]
    fn test_cli_lookback_bounds() {
        let cli = Cli::parse_from(&["weekly_dispatch", "-j", "./json", "--days", "0", "--news-days", "3650"]);
        assert_eq!(cli.days, 0);
        assert_eq!(cli.news_days, 3650);
        assert!(Cli::try_parse_from(&["weekly_dispatch", "-j", "./json", "--days", "-1"]).is_err());
        assert!(Cli::try_parse_from(&["weekly_dispatch", "-j", "./json", "--world-days", "3651"]).is_err());
        assert!(
            Cli::try_parse_from(&["weekly_dispatch", "-j", "./json", "--news-days", "9223372036854775807"]).is_err()
        );
    }

    #[test]
    fn test_cli_retry_bounds() {
        let cli = Cli::parse_from(&["weekly_dispatch", "-j", "./json"]);
        assert_eq!(cli.max_retries, 3);
        let cli = Cli::parse_from(&["weekly_dispatch", "-j", "./json", "--max-retries", "10"]);
        assert_eq!(cli.max_retries, 10);
        assert!(Cli::try_parse_from(&["weekly_dispatch", "-j", "./json", "--max-retries", "40"]).is_err());
        assert!(Cli::try_parse_from(&["weekly_dispatch", "-j", "./json", "--max-retries", "-1"]).is_err());
    }

    #[test]
    fn test_cli_requires_output_dir() {
        assert!(Cli::try_parse_from(&["weekly_dispatch"]).is_err());
    }
}
