//! Newsletter copy items for the news section.

use crate::models::{NewsItem, NewsletterItem};

/// Items the news section shows by default.
pub const DEFAULT_NEWSLETTER_ITEMS: usize = 4;

/// Shape the first `max` news items for the newsletter template.
///
/// The template renders `headline` followed directly by `body`, so the body
/// either continues the sentence (`", summary"`) or closes it (`"."`).
pub fn format_for_newsletter(items: &[NewsItem], max: usize) -> Vec<NewsletterItem> {
    items
        .iter()
        .take(max)
        .map(|item| {
            let description = item.description.trim();
            let body = if description.is_empty() {
                ".".to_string()
            } else {
                format!(", {description}")
            };
            NewsletterItem {
                headline: item.title.clone(),
                body,
                url: item.url.clone(),
                source: item.source.clone(),
            }
        })
        .collect()
}
