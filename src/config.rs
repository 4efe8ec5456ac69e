//! News source configuration and per-edition profiles.
//!
//! Sources can be supplied in a YAML file passed with `--config`. Two shapes
//! are accepted: sources grouped by region, or a flat list used regardless
//! of the requested region.
//!
//! ```yaml
//! news_sources:
//!   europe:
//!     - name: Energy Storage News
//!       rss: https://www.energy-storage.news/feed/
//!       category: industry
//!       region: europe
//!   us:
//!     - name: Utility Dive
//!       rss: https://www.utilitydive.com/feeds/news/
//! ```
//!
//! Without a config file the built-in [`NewsSources::defaults`] are used.

use crate::models::{Edition, NewsScope, Region};
use crate::scrapers::modo::ModoFeed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use tracing::{info, instrument};

/// One RSS feed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewsSource {
    /// Display name of the publication.
    pub name: String,
    /// Feed URL. Sources without one are skipped.
    #[serde(default)]
    pub rss: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_region")]
    pub region: Region,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_region() -> Region {
    Region::Global
}

impl NewsSource {
    pub fn new(name: &str, rss: &str, region: Region) -> Self {
        Self {
            name: name.to_string(),
            rss: Some(rss.to_string()),
            category: "industry".to_string(),
            region,
        }
    }
}

/// The configured set of feeds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NewsSources {
    /// Feeds grouped by the region they cover.
    ByRegion(BTreeMap<Region, Vec<NewsSource>>),
    /// Legacy flat list: every feed is used for every scope.
    Flat(Vec<NewsSource>),
}

impl NewsSources {
    /// Built-in energy storage feeds.
    pub fn defaults() -> Self {
        let mut by_region = BTreeMap::new();
        by_region.insert(
            Region::Europe,
            vec![
                NewsSource::new("Energy Storage News", "https://www.energy-storage.news/feed/", Region::Europe),
                NewsSource::new("PV Magazine", "https://www.pv-magazine.com/feed/", Region::Europe),
                NewsSource::new("Current±", "https://www.current-news.co.uk/feed/", Region::Europe),
                NewsSource::new("Recharge News", "https://www.rechargenews.com/rss", Region::Europe),
            ],
        );
        by_region.insert(
            Region::Global,
            vec![
                NewsSource::new("Canary Media", "https://www.canarymedia.com/feed", Region::Global),
                NewsSource::new("Electrek", "https://electrek.co/feed/", Region::Global),
                NewsSource::new("CleanTechnica", "https://cleantechnica.com/feed/", Region::Global),
            ],
        );
        by_region.insert(
            Region::Us,
            vec![NewsSource::new("Utility Dive", "https://www.utilitydive.com/feeds/news/", Region::Us)],
        );
        by_region.insert(
            Region::Australia,
            vec![NewsSource::new("RenewEconomy", "https://reneweconomy.com.au/feed/", Region::Australia)],
        );
        NewsSources::ByRegion(by_region)
    }

    /// Feeds to read for a news scope.
    ///
    /// `all` reads every group. A region reads its own group, and any scope
    /// other than `europe` is prefixed with the European group, which carries
    /// most storage coverage.
    pub fn for_scope(&self, scope: NewsScope) -> Vec<&NewsSource> {
        match self {
            NewsSources::Flat(sources) => sources.iter().collect(),
            NewsSources::ByRegion(groups) => {
                let group = |region: Region| groups.get(&region).into_iter().flatten();
                match scope {
                    NewsScope::All => groups.values().flatten().collect(),
                    NewsScope::Europe => group(Region::Europe).collect(),
                    NewsScope::Us => group(Region::Europe).chain(group(Region::Us)).collect(),
                    NewsScope::Australia => group(Region::Europe).chain(group(Region::Australia)).collect(),
                    NewsScope::Global => group(Region::Europe).chain(group(Region::Global)).collect(),
                }
            }
        }
    }
}

/// Contents of the YAML config file.
#[derive(Debug, Default, Deserialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub news_sources: Option<NewsSources>,
}

/// Load a YAML config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML for
/// [`DispatchConfig`].
#[instrument(level = "info")]
pub fn load_config(path: &str) -> Result<DispatchConfig, Box<dyn Error>> {
    let raw = fs::read_to_string(path)?;
    let config: DispatchConfig = serde_yaml::from_str(&raw)?;
    info!(
        custom_sources = config.news_sources.is_some(),
        "Loaded configuration"
    );
    Ok(config)
}

/// How an edition is assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct EditionProfile {
    pub name: &'static str,
    /// Modo feed the featured and "more" articles come from.
    pub article_feed: ModoFeed,
    /// Default news scope when `--news-region` is not given.
    pub news_scope: NewsScope,
    /// Whether news listings carry ISO tags.
    pub show_isos: bool,
    pub covered_isos: &'static [&'static str],
}

/// Built-in profile for an edition.
pub fn edition_profile(edition: Edition) -> EditionProfile {
    let news_scope = NewsScope::from(edition);
    match edition {
        Edition::Europe => EditionProfile {
            name: "GB & Europe",
            article_feed: ModoFeed::GbEurope,
            news_scope,
            show_isos: false,
            covered_isos: &[],
        },
        Edition::Us => EditionProfile {
            name: "US",
            article_feed: ModoFeed::Us,
            news_scope,
            show_isos: true,
            covered_isos: &["ERCOT", "MISO", "CAISO", "PJM", "NYISO", "ISO-NE", "SPP"],
        },
        Edition::Australia => EditionProfile {
            name: "Australia",
            article_feed: ModoFeed::Australia,
            news_scope,
            show_isos: false,
            covered_isos: &[],
        },
    }
}
