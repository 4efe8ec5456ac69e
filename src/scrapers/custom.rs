//! One-off news items from arbitrary article URLs.
//!
//! Editors can add stories that no configured feed carries with
//! `--custom-url`. The page's Open Graph tags supply the headline and
//! summary; the region comes from a small map of known publishers.

use crate::http::GetAsync;
use crate::models::{NewsItem, Region};
use crate::utils::{SUMMARY_MAX_CHARS, truncate_chars};
use chrono::{SecondsFormat, Utc};
use scraper::{Html, Selector};
use std::error::Error;
use tracing::{error, info, instrument, warn};
use url::Url;

/// Publishers whose region is known up front.
static DOMAIN_REGIONS: &[(&str, Region)] = &[
    ("energy-storage.news", Region::Europe),
    ("pv-magazine.com", Region::Europe),
    ("current-news.co.uk", Region::Europe),
    ("rechargenews.com", Region::Europe),
    ("utilitydive.com", Region::Us),
    ("greentechmedia.com", Region::Us),
    ("reneweconomy.com.au", Region::Australia),
];

/// Region of a publisher host, [`Region::Global`] when unknown.
pub fn region_for_host(host: &str) -> Region {
    DOMAIN_REGIONS
        .iter()
        .find(|(domain, _)| host == *domain || host.ends_with(&format!(".{domain}")))
        .map(|(_, region)| *region)
        .unwrap_or(Region::Global)
}

fn meta_content(document: &Html, selector: &str) -> Result<Option<String>, Box<dyn Error>> {
    let selector = Selector::parse(selector).map_err(|e| e.to_string())?;
    Ok(document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .find(|c| !c.is_empty()))
}

/// Build a news item from a fetched article page.
///
/// # Errors
///
/// Returns an error if `url` does not parse. A page without any title
/// yields an item with an empty headline for the editor to fill in.
pub fn parse_custom_page(url: &str, html: &str) -> Result<NewsItem, Box<dyn Error>> {
    let parsed = Url::parse(url)?;
    let host = parsed.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);

    let document = Html::parse_document(html);
    let title = match meta_content(&document, r#"meta[property="og:title"]"#)? {
        Some(title) => title,
        None => {
            let title_selector = Selector::parse("title").map_err(|e| e.to_string())?;
            document
                .select(&title_selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default()
        }
    };
    let description = match meta_content(&document, r#"meta[property="og:description"]"#)? {
        Some(d) => d,
        None => meta_content(&document, r#"meta[name="description"]"#)?.unwrap_or_default(),
    };

    let mut item = NewsItem::new(
        &title,
        &truncate_chars(&description, SUMMARY_MAX_CHARS),
        url,
        host,
    );
    item.date = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    item.category = "custom".to_string();
    item.region = region_for_host(host);
    Ok(item)
}

/// Fetch and parse one custom URL.
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_custom_url<F: GetAsync>(fetcher: &F, url: &str) -> Result<NewsItem, Box<dyn Error>> {
    let html = fetcher.get(url).await?;
    let item = parse_custom_page(url, &html)?;
    info!(title = %item.title, region = %item.region, "Fetched custom URL");
    Ok(item)
}

/// Fetch every custom URL in order, skipping those that fail.
#[instrument(level = "info", skip_all, fields(count = urls.len()))]
pub async fn fetch_custom_urls<F: GetAsync>(fetcher: &F, urls: &[String]) -> Vec<NewsItem> {
    let mut items = Vec::with_capacity(urls.len());
    for url in urls {
        match fetch_custom_url(fetcher, url).await {
            Ok(item) => items.push(item),
            Err(e) => error!(error = %e, %url, "Custom URL failed"),
        }
    }
    if items.len() < urls.len() {
        warn!(requested = urls.len(), fetched = items.len(), "Some custom URLs were skipped");
    }
    items
}
