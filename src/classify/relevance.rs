//! Relevance scoring and regional gating for industry news.
//!
//! News is scored on battery/storage focus rather than on region: three
//! points per priority keyword, one per secondary keyword, and a hard
//! exclusion for anything matching a negative keyword. When a specific
//! region is targeted, a simpler unweighted keyword check decides whether
//! the item belongs to that edition.

use crate::classify::keywords::{
    NEGATIVE_KEYWORDS, NEWS_AUSTRALIA_KEYWORDS, NEWS_EUROPE_KEYWORDS, NEWS_US_KEYWORDS,
    PRIORITY_KEYWORDS, SECONDARY_KEYWORDS, contains_any, count_present,
};
use crate::models::{NewsItem, NewsScope, Region};
use tracing::{debug, instrument};

pub const PRIORITY_POINTS: u32 = 3;
pub const SECONDARY_POINTS: u32 = 1;
/// Items scoring below this are dropped.
pub const MIN_RELEVANCE_SCORE: u32 = 2;

/// Relevance score of a lowercase text, or `None` if a negative keyword hits.
pub fn relevance_score(text: &str) -> Option<u32> {
    if contains_any(text, NEGATIVE_KEYWORDS) {
        return None;
    }
    let priority = count_present(text, PRIORITY_KEYWORDS) as u32;
    let secondary = count_present(text, SECONDARY_KEYWORDS) as u32;
    Some(PRIORITY_POINTS * priority + SECONDARY_POINTS * secondary)
}

/// Region of a lowercase news text from the unweighted marker lists.
///
/// Europe markers override the others: an item mentioning both Texas and
/// Germany counts as European.
pub fn detect_news_region(text: &str) -> Region {
    let is_europe = contains_any(text, NEWS_EUROPE_KEYWORDS);
    let is_us = contains_any(text, NEWS_US_KEYWORDS);
    let is_australia = contains_any(text, NEWS_AUSTRALIA_KEYWORDS);

    if is_us && !is_europe {
        Region::Us
    } else if is_australia && !is_europe {
        Region::Australia
    } else if is_europe {
        Region::Europe
    } else {
        Region::Global
    }
}

/// Whether an item detected as `detected` belongs in a `target` edition.
///
/// Europe keeps everything that is not clearly US or Australian; the other
/// editions keep only their own region.
pub fn passes_region_gate(target: Region, detected: Region) -> bool {
    match target {
        Region::Europe => !detected.is_non_europe(),
        Region::Us => detected == Region::Us,
        Region::Australia => detected == Region::Australia,
        Region::Global => true,
    }
}

/// Score, gate, threshold and rank a news list.
///
/// Retained items get `relevance_score` set, and `detected_region` set when
/// `target` names a geographic region. Output is sorted by score descending;
/// equal scores keep their input order.
#[instrument(level = "debug", skip(candidates), fields(candidates = candidates.len(), scope = ?target))]
pub fn score_and_filter_news(candidates: Vec<NewsItem>, target: Option<NewsScope>) -> Vec<NewsItem> {
    let gate = target.and_then(|scope| scope.gate_region());

    let mut scored: Vec<NewsItem> = candidates
        .into_iter()
        .filter_map(|mut item| {
            let text = format!("{} {}", item.title, item.description).to_lowercase();

            let Some(score) = relevance_score(&text) else {
                debug!(title = %item.title, "Excluded by negative keyword");
                return None;
            };

            if let Some(target_region) = gate {
                let detected = detect_news_region(&text);
                item.detected_region = Some(detected);
                if !passes_region_gate(target_region, detected) {
                    debug!(title = %item.title, %detected, %target_region, "Outside target region");
                    return None;
                }
            }

            if score < MIN_RELEVANCE_SCORE {
                return None;
            }
            item.relevance_score = Some(score);
            Some(item)
        })
        .collect();

    // stable: ties keep fetch order
    scored.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    debug!(kept = scored.len(), "Filtered news");
    scored
}
