//! Weighted region scoring for research articles.
//!
//! Each region's score is the sum of the weights of every keyword present in
//! the text. The label is then resolved with a deliberate bias: when Europe
//! and a non-Europe region tie, the non-Europe region wins. The "around the
//! world" section relies on that skew to surface US and Australian pieces.

use crate::classify::keywords::{AUSTRALIA_KEYWORDS, EUROPE_KEYWORDS, KeywordEntry, US_KEYWORDS};
use crate::models::Region;
use serde::Serialize;

/// Scores below this in every region resolve to [`Region::Global`].
pub const MIN_REGION_SCORE: u32 = 2;

/// Score of one region against a text, with the entries that matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub score: u32,
    /// Matched entries in keyword-table order.
    pub matches: Vec<KeywordEntry>,
}

/// Per-region breakdown behind a classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionScores {
    pub europe: ScoreResult,
    pub us: ScoreResult,
    pub australia: ScoreResult,
    pub detected: Region,
}

/// Score `text` against one weighted table.
///
/// `text` is expected to be lowercase already. Matching is presence based:
/// a phrase repeated in the text still counts once.
pub fn score_region(text: &str, table: &[KeywordEntry]) -> ScoreResult {
    let matches: Vec<KeywordEntry> = table
        .iter()
        .copied()
        .filter(|(phrase, _)| text.contains(phrase))
        .collect();
    let score = matches.iter().map(|(_, weight)| weight).sum();
    ScoreResult { score, matches }
}

/// Lowercased classification text for an article.
pub fn article_text(title: &str, description: &str, slug: &str) -> String {
    format!("{title} {description} {slug}").to_lowercase()
}

/// Resolve three region scores into one label.
///
/// Rules, first match wins:
/// 1. non-Europe beats Europe and reaches the minimum
/// 2. Europe beats non-Europe and reaches the minimum
/// 3. non-Europe reaches the minimum (ties land here)
/// 4. Europe reaches the minimum
/// 5. otherwise global
///
/// Between US and Australia, US wins ties.
pub fn resolve_region(europe: u32, us: u32, australia: u32) -> Region {
    let non_europe = us.max(australia);
    let pick_non_europe = || if us >= australia { Region::Us } else { Region::Australia };

    if non_europe > europe && non_europe >= MIN_REGION_SCORE {
        pick_non_europe()
    } else if europe >= MIN_REGION_SCORE && europe > non_europe {
        Region::Europe
    } else if non_europe >= MIN_REGION_SCORE {
        pick_non_europe()
    } else if europe >= MIN_REGION_SCORE {
        Region::Europe
    } else {
        Region::Global
    }
}

/// Score `text` against all three regions and keep the breakdown.
pub fn region_scores(text: &str) -> RegionScores {
    let text = text.to_lowercase();
    let europe = score_region(&text, EUROPE_KEYWORDS);
    let us = score_region(&text, US_KEYWORDS);
    let australia = score_region(&text, AUSTRALIA_KEYWORDS);
    let detected = resolve_region(europe.score, us.score, australia.score);
    RegionScores {
        europe,
        us,
        australia,
        detected,
    }
}

/// Classify a text blob as `europe`, `us`, `australia` or `global`.
///
/// Total over its input: empty text has no matches and is `global`.
pub fn classify_region(text: &str) -> Region {
    region_scores(text).detected
}

/// Classify an article from its title, description and slug.
pub fn classify_article(title: &str, description: &str, slug: &str) -> Region {
    classify_region(&article_text(title, description, slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matches_is_global() {
        assert_eq!(classify_region("solar panel prices fall"), Region::Global);
        assert_eq!(classify_region(""), Region::Global);
    }

    #[test]
    fn test_single_europe_keyword_is_europe() {
        assert_eq!(classify_region("Ofgem consults on charges"), Region::Europe);
        assert_eq!(classify_region("the uk"), Region::Europe);
    }

    #[test]
    fn test_equal_europe_and_us_scores_favour_us() {
        // france = 3, ohio = 3
        let scores = region_scores("France and Ohio");
        assert_eq!(scores.europe.score, 3);
        assert_eq!(scores.us.score, 3);
        assert_eq!(scores.detected, Region::Us);
    }

    #[test]
    fn test_us_beats_australia_on_ties() {
        assert_eq!(classify_region("ercot and aemo"), Region::Us);
        assert_eq!(resolve_region(0, 5, 5), Region::Us);
    }

    #[test]
    fn test_australia_when_it_leads() {
        assert_eq!(classify_region("AEMO publishes Queensland outlook"), Region::Australia);
    }

    #[test]
    fn test_europe_when_it_leads() {
        // german + germany = 6 vs texas = 3
        assert_eq!(classify_region("germany texas"), Region::Europe);
    }

    #[test]
    fn test_non_europe_when_it_leads() {
        // ercot = 5 vs britain = 3
        assert_eq!(classify_region("ERCOT lessons for Britain"), Region::Us);
    }

    #[test]
    fn test_resolve_rules() {
        assert_eq!(resolve_region(0, 0, 0), Region::Global);
        assert_eq!(resolve_region(1, 1, 1), Region::Global);
        assert_eq!(resolve_region(2, 0, 0), Region::Europe);
        assert_eq!(resolve_region(3, 3, 0), Region::Us);
        assert_eq!(resolve_region(3, 0, 3), Region::Australia);
        assert_eq!(resolve_region(4, 3, 0), Region::Europe);
        assert_eq!(resolve_region(4, 3, 5), Region::Australia);
        assert_eq!(resolve_region(0, 2, 0), Region::Us);
    }

    #[test]
    fn test_matches_keep_table_order_and_count_once() {
        let result = score_region("texas texas ercot", US_KEYWORDS);
        assert_eq!(result.matches, vec![("ercot", 5), ("texas", 3)]);
        assert_eq!(result.score, 8);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let text = "New battery tender in Spain and California";
        assert_eq!(classify_region(text), classify_region(text));
    }

    #[test]
    fn test_classify_article_uses_slug() {
        assert_eq!(
            classify_article("Weekly roundup", "Prices and revenues", "ercot-weekly-roundup"),
            Region::Us
        );
    }

    #[test]
    fn test_article_text_is_lowercase() {
        assert_eq!(article_text("A", "B", "c-d"), "a b c-d");
    }
}
