//! Modo Energy research article client.
//!
//! Articles come from the Modo content API, which is paginated with
//! `limit`/`offset` and filtered by comma-separated market codes. Results are
//! ordered newest first, so the first article older than the lookback window
//! ends the scan.
//!
//! Every article is classified on ingestion with
//! [`classify_article`](crate::classify::classify_article); the API's own
//! region filter is coarse (a GB piece can mention ERCOT), so the detected
//! region is what the "around the world" selection relies on.

use crate::classify::classify_article;
use crate::http::GetAsync;
use crate::models::{Article, Edition};
use crate::utils::{title_from_slug, truncate_for_log};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use itertools::Itertools;
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};

/// Default content API endpoint.
pub const DEFAULT_API_URL: &str = "https://admin.modo.energy/v1/content-service/news/insights/";

/// Default base for public article links.
pub const DEFAULT_ARTICLE_URL: &str = "https://modoenergy.com/research/en";

/// The API refuses pages larger than this.
const MAX_PAGE_SIZE: usize = 50;

/// Content types requested: research, summaries and videos.
const CONTENT_SOURCES: &str = "R,S,MV";

/// A market selection understood by the content API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModoFeed {
    GbEurope,
    Us,
    Australia,
    NonEurope,
    All,
}

impl ModoFeed {
    /// Value of the `region` query parameter, or `None` for no filter.
    pub fn region_codes(&self) -> Option<&'static str> {
        match self {
            ModoFeed::GbEurope => Some("gb,de,fr,it,ib"),
            ModoFeed::Us => Some("ercot,caiso,miso,pjm,nyiso,isone,spp"),
            ModoFeed::Australia => Some("australia,nem,wem"),
            ModoFeed::NonEurope => Some("ercot,caiso,miso,pjm,nyiso,isone,spp,nem,wem"),
            ModoFeed::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModoFeed::GbEurope => "gb_europe",
            ModoFeed::Us => "us",
            ModoFeed::Australia => "australia",
            ModoFeed::NonEurope => "non_europe",
            ModoFeed::All => "all",
        }
    }
}

#[derive(Debug, Deserialize)]
struct InsightsPage {
    #[serde(default)]
    results: Vec<InsightItem>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InsightItem {
    slug: Option<String>,
    title: Option<String>,
    short_description: Option<String>,
    published_at: Option<String>,
    share_image_url: Option<String>,
    main_image_url: Option<String>,
    source: Option<String>,
    categories: Option<Vec<InsightCategory>>,
    reading_time_minutes: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct InsightCategory {
    name: Option<String>,
}

/// Parse an API timestamp (`2025-05-06T10:00:00+00:00` or `...Z`).
pub fn parse_published(published_at: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(published_at)
        .or_else(|_| DateTime::parse_from_str(published_at, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

impl InsightItem {
    fn into_article(self, slug: String, article_url: &str) -> Article {
        let title = self
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| title_from_slug(&slug));
        let description = self.short_description.unwrap_or_default();
        let thumbnail_url = self
            .share_image_url
            .filter(|u| !u.is_empty())
            .or(self.main_image_url.filter(|u| !u.is_empty()));
        let detected_region = classify_article(&title, &description, &slug);

        Article {
            url: format!("{}/{}", article_url.trim_end_matches('/'), slug),
            date: self.published_at.unwrap_or_default(),
            thumbnail_url,
            source_type: self.source.unwrap_or_default(),
            categories: self
                .categories
                .unwrap_or_default()
                .into_iter()
                .filter_map(|c| c.name)
                .collect(),
            reading_time_minutes: self.reading_time_minutes,
            detected_region,
            title,
            description,
            slug,
        }
    }
}

/// Client for the Modo content API.
#[derive(Debug)]
pub struct ModoClient<'a, F> {
    fetcher: &'a F,
    api_url: String,
    article_url: String,
}

impl<'a, F> ModoClient<'a, F>
where
    F: GetAsync,
{
    pub fn new(fetcher: &'a F, api_url: &str, article_url: &str) -> Self {
        Self {
            fetcher,
            api_url: api_url.to_string(),
            article_url: article_url.to_string(),
        }
    }

    fn page_url(&self, feed: ModoFeed, page_size: usize, offset: usize) -> String {
        let mut url = format!(
            "{}?source={}&language=en&limit={}&offset={}",
            self.api_url,
            urlencoding::encode(CONTENT_SOURCES),
            page_size,
            offset
        );
        if let Some(codes) = feed.region_codes() {
            url.push_str("&region=");
            url.push_str(&urlencoding::encode(codes));
        }
        url
    }

    /// Fetch up to `limit` articles published in the last `days` days.
    ///
    /// Items without a slug, or with a slug already seen, are skipped.
    /// Unparseable dates are kept. A failed request ends the scan and the
    /// articles collected so far are returned.
    #[instrument(level = "info", skip(self, feed), fields(feed = feed.as_str()))]
    pub async fn get_articles(&self, feed: ModoFeed, days: i64, limit: usize) -> Vec<Article> {
        let cutoff = Utc::now() - Duration::days(days);
        let page_size = limit.clamp(1, MAX_PAGE_SIZE);
        let mut offset = 0;
        let mut articles: Vec<Article> = Vec::new();
        let mut seen_slugs: HashSet<String> = HashSet::new();

        'pages: while articles.len() < limit {
            let url = self.page_url(feed, page_size, offset);
            let page = match self.fetch_page(&url).await {
                Ok(page) => page,
                Err(e) => {
                    error!(error = %e, %url, "Failed to fetch Modo articles");
                    break;
                }
            };
            if page.results.is_empty() {
                break;
            }

            for item in page.results {
                if articles.len() >= limit {
                    break;
                }
                let slug = match item.slug.as_deref() {
                    Some(s) if !s.is_empty() && !seen_slugs.contains(s) => s.to_string(),
                    _ => continue,
                };
                seen_slugs.insert(slug.clone());

                if let Some(published) = item.published_at.as_deref().and_then(parse_published) {
                    if published < cutoff {
                        debug!(%slug, %published, "Reached lookback cutoff");
                        break 'pages;
                    }
                }

                articles.push(item.into_article(slug, &self.article_url));
            }

            if page.next.is_none() || articles.len() >= limit {
                break;
            }
            offset += page_size;
        }

        info!(count = articles.len(), days, limit, "Fetched Modo articles");
        articles
    }

    async fn fetch_page(&self, url: &str) -> Result<InsightsPage, Box<dyn Error>> {
        let body = self.fetcher.get(url).await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body = %truncate_for_log(&body, 300), "Unexpected Modo API response");
            e.into()
        })
    }

    /// Articles from both the GB/Europe and the non-Europe feeds, deduplicated by slug.
    #[instrument(level = "info", skip(self))]
    pub async fn get_all_articles(&self, days: i64, limit: usize) -> Vec<Article> {
        let europe = self.get_articles(ModoFeed::GbEurope, days, limit).await;
        let non_europe = self.get_articles(ModoFeed::NonEurope, days, limit).await;
        europe
            .into_iter()
            .chain(non_europe)
            .unique_by(|a| a.slug.clone())
            .take(limit)
            .collect()
    }

    /// Articles detected as US or Australian, whichever feed they came from.
    #[instrument(level = "info", skip(self))]
    pub async fn get_non_europe_articles(&self, days: i64, limit: usize) -> Vec<Article> {
        self.get_all_articles(days, limit * 3)
            .await
            .into_iter()
            .filter(|a| a.detected_region.is_non_europe())
            .take(limit)
            .collect()
    }

    /// Candidates for the "more from around the world" section.
    ///
    /// A European edition looks at US and Australian pieces; the US edition
    /// at Europe and Australia; the Australian edition at Europe.
    #[instrument(level = "info", skip(self))]
    pub async fn world_articles(&self, edition: Edition, days: i64) -> Vec<Article> {
        match edition {
            Edition::Europe => self.get_non_europe_articles(days, 10).await,
            Edition::Us => {
                let mut articles = self.get_articles(ModoFeed::GbEurope, days, 10).await;
                articles.extend(self.get_articles(ModoFeed::Australia, days, 5).await);
                articles
            }
            Edition::Australia => self.get_articles(ModoFeed::GbEurope, days, 10).await,
        }
    }

    /// Further articles from `feed`, excluding those already featured.
    #[instrument(level = "info", skip(self, featured))]
    pub async fn more_articles(&self, feed: ModoFeed, days: i64, featured: &[Article]) -> Vec<Article> {
        let featured_slugs: HashSet<&str> = featured.iter().map(|a| a.slug.as_str()).collect();
        self.get_articles(feed, days, 20)
            .await
            .into_iter()
            .filter(|a| !featured_slugs.contains(a.slug.as_str()))
            .collect()
    }
}
