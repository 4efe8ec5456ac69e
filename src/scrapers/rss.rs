//! Industry news from RSS 2.0 and Atom feeds.
//!
//! Feeds are fetched concurrently, parsed with `quick-xml`, cut to the
//! lookback window, and handed to the relevance filter for the requested
//! scope. A feed that fails to download or parse is logged and skipped.

use crate::classify::score_and_filter_news;
use crate::config::{NewsSource, NewsSources};
use crate::http::GetAsync;
use crate::models::{NewsItem, NewsScope};
use crate::utils::clean_html;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};

/// Only the newest entries of each feed are considered.
pub const MAX_ENTRIES_PER_FEED: usize = 20;

/// Feeds downloaded at once.
const CONCURRENT_FEEDS: usize = 4;

/// Per-scope limit when several scopes are combined.
const MULTI_SCOPE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Summary,
    Content,
    Date,
}

impl Field {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "title" => Some(Field::Title),
            "link" => Some(Field::Link),
            "description" | "summary" => Some(Field::Summary),
            "content:encoded" | "content" => Some(Field::Content),
            "pubDate" | "published" | "updated" | "dc:date" => Some(Field::Date),
            _ => None,
        }
    }
}

/// Text collected for the entry currently being read.
#[derive(Debug, Default)]
struct EntryBuf {
    title: String,
    link: String,
    summary: String,
    content: String,
    date: String,
}

impl EntryBuf {
    fn push(&mut self, field: Field, text: &str) {
        let target = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Summary => &mut self.summary,
            Field::Content => &mut self.content,
            // first date wins: RSS pubDate, Atom published before updated
            Field::Date if !self.date.is_empty() => return,
            Field::Date => &mut self.date,
        };
        if !target.is_empty() {
            target.push(' ');
        }
        target.push_str(text);
    }

    fn into_item(self, source: &NewsSource) -> Option<(NewsItem, Option<DateTime<Utc>>)> {
        let title = self.title.trim();
        let link = self.link.trim();
        if link.is_empty() {
            return None;
        }
        let raw_summary = if self.summary.trim().is_empty() {
            &self.content
        } else {
            &self.summary
        };

        let mut item = NewsItem::new(&clean_html(title), &clean_html(raw_summary), link, &source.name);
        item.category = source.category.clone();
        item.region = source.region;

        let published = parse_feed_date(self.date.trim());
        if let Some(dt) = published {
            item.date = dt.to_rfc3339_opts(SecondsFormat::Secs, true);
        }
        Some((item, published))
    }
}

/// Parse an RSS (`Tue, 06 May 2025 10:00:00 GMT`) or Atom (RFC 3339) date.
pub fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Atom `<link href="..."/>`: take the alternate (or unlabelled) link.
fn atom_href(e: &BytesStart<'_>) -> Option<String> {
    let mut href = None;
    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"href" => href = attr.unescape_value().ok().map(|v| v.into_owned()),
            b"rel" if attr.value.as_ref() != b"alternate" => return None,
            _ => {}
        }
    }
    href
}

/// Parse a feed document into news items attributed to `source`.
///
/// Reads at most `max_entries` `<item>`/`<entry>` elements. Entries without
/// a link are dropped, as are entries dated before `cutoff`. A missing
/// title is kept as an empty headline.
/// Entries with no readable date are kept with an empty date.
///
/// # Errors
///
/// Returns an error if the document is not well-formed XML.
pub fn parse_feed(
    xml: &str,
    source: &NewsSource,
    cutoff: DateTime<Utc>,
    max_entries: usize,
) -> Result<Vec<NewsItem>, Box<dyn Error>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut seen = 0usize;
    let mut entry: Option<EntryBuf> = None;
    // (field, tag that opened it)
    let mut field: Option<(Field, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = tag_name(&e);
                if name == "item" || name == "entry" {
                    entry = Some(EntryBuf::default());
                    field = None;
                } else if let Some(buf) = entry.as_mut() {
                    if field.is_none() {
                        if name == "link" {
                            if let Some(href) = atom_href(&e) {
                                buf.push(Field::Link, &href);
                            }
                        }
                        field = Field::from_tag(&name).map(|f| (f, name));
                    }
                }
            }
            Event::Empty(e) => {
                if let Some(buf) = entry.as_mut() {
                    if field.is_none() && tag_name(&e) == "link" && buf.link.is_empty() {
                        if let Some(href) = atom_href(&e) {
                            buf.push(Field::Link, &href);
                        }
                    }
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "item" || name == "entry" {
                    field = None;
                    let Some(buf) = entry.take() else { continue };
                    seen += 1;
                    match buf.into_item(source) {
                        Some((_, Some(published))) if published < cutoff => {
                            debug!(source = %source.name, %published, "Entry older than cutoff");
                        }
                        Some((item, _)) => items.push(item),
                        None => debug!(source = %source.name, "Entry without link"),
                    }
                    if seen >= max_entries {
                        break;
                    }
                } else if field.as_ref().is_some_and(|(_, opened)| *opened == name) {
                    field = None;
                }
            }
            Event::Text(e) => {
                if let (Some(buf), Some((f, _))) = (entry.as_mut(), field.as_ref()) {
                    let text = e.unescape().unwrap_or_default();
                    buf.push(*f, &text);
                }
            }
            Event::CData(e) => {
                if let (Some(buf), Some((f, _))) = (entry.as_mut(), field.as_ref()) {
                    buf.push(*f, &String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

/// Reads the configured feeds for a news scope.
#[derive(Debug)]
pub struct NewsScraper<'a, F> {
    fetcher: &'a F,
    sources: &'a NewsSources,
}

impl<'a, F> NewsScraper<'a, F>
where
    F: GetAsync,
{
    pub fn new(fetcher: &'a F, sources: &'a NewsSources) -> Self {
        Self { fetcher, sources }
    }

    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    async fn fetch_feed(&self, source: &NewsSource, cutoff: DateTime<Utc>) -> Vec<NewsItem> {
        let Some(url) = source.rss.as_deref() else {
            warn!("Source has no feed URL; skipping");
            return Vec::new();
        };
        let body = match self.fetcher.get(url).await {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, %url, "Feed fetch failed");
                return Vec::new();
            }
        };
        match parse_feed(&body, source, cutoff, MAX_ENTRIES_PER_FEED) {
            Ok(items) => {
                debug!(count = items.len(), "Parsed feed");
                items
            }
            Err(e) => {
                error!(error = %e, %url, "Feed parse failed");
                Vec::new()
            }
        }
    }

    /// Recent news for one scope, filtered for relevance.
    ///
    /// Entries from all feeds are ordered newest first before scoring, so
    /// equally relevant items stay in date order. At most `limit` items are
    /// returned.
    #[instrument(level = "info", skip(self))]
    pub async fn get_news(&self, days: i64, limit: usize, scope: NewsScope) -> Vec<NewsItem> {
        let cutoff = Utc::now() - Duration::days(days);
        let sources = self.sources.for_scope(scope);

        let mut candidates: Vec<NewsItem> = stream::iter(sources)
            .map(|source| self.fetch_feed(source, cutoff))
            .buffered(CONCURRENT_FEEDS)
            .collect::<Vec<Vec<NewsItem>>>()
            .await
            .into_iter()
            .flatten()
            .collect();
        candidates.sort_by(|a, b| b.date.cmp(&a.date));

        let total = candidates.len();
        let mut news = score_and_filter_news(candidates, Some(scope));
        news.truncate(limit);
        info!(candidates = total, kept = news.len(), "Fetched news");
        news
    }

    /// News for several scopes combined, newest first.
    ///
    /// Each scope contributes up to ten items; an article surfacing in more
    /// than one scope is listed once.
    #[instrument(level = "info", skip(self))]
    pub async fn get_news_multi(&self, days: i64, scopes: &[NewsScope]) -> Vec<NewsItem> {
        let mut combined = Vec::new();
        for scope in scopes {
            combined.extend(self.get_news(days, MULTI_SCOPE_LIMIT, *scope).await);
        }
        let mut news: Vec<NewsItem> = combined.into_iter().unique_by(|item| item.url.clone()).collect();
        news.sort_by(|a, b| b.date.cmp(&a.date));
        news
    }
}
