//! Plain-text listings for reviewing an edition in the terminal.

use crate::classify::{ScoreResult, duplicate_partner, region_scores};
use crate::classify::region::article_text;
use crate::models::{Article, DuplicatePair, NewsItem};
use crate::utils::{display_date, shorten};
use std::fmt::Write;

/// Listing width for headlines.
const TITLE_WIDTH: usize = 50;

fn dup_marker(pairs: &[DuplicatePair], index: usize) -> String {
    match duplicate_partner(pairs, index) {
        Some(other) => format!(" ⚠ DUP #{}", other + 1),
        None => String::new(),
    }
}

fn duplicate_summary(out: &mut String, pairs: &[DuplicatePair]) {
    if !pairs.is_empty() {
        writeln!(out, "  ⚠ {} potential duplicate(s) found", pairs.len()).unwrap();
    }
}

/// Numbered news listing with sources, optional ISO tags and duplicate markers.
pub fn render_news_listing(
    items: &[NewsItem],
    pairs: &[DuplicatePair],
    label: &str,
    show_isos: bool,
) -> String {
    let mut out = String::new();
    writeln!(out, "{} ({})", label, items.len()).unwrap();
    if items.is_empty() {
        writeln!(out, "  (none)").unwrap();
        return out;
    }

    for (i, item) in items.iter().enumerate() {
        let isos = if show_isos && !item.detected_isos.is_empty() {
            format!("[{}] ", item.detected_isos.join(", "))
        } else {
            String::new()
        };
        writeln!(
            out,
            "  {:>2}. [{}] {}{}{}",
            i + 1,
            item.source,
            isos,
            shorten(&item.title, TITLE_WIDTH),
            dup_marker(pairs, i)
        )
        .unwrap();
    }
    duplicate_summary(&mut out, pairs);
    out
}

fn format_matches(result: &ScoreResult) -> String {
    if result.matches.is_empty() {
        return "-".to_string();
    }
    result
        .matches
        .iter()
        .map(|(phrase, weight)| format!("{}({})", phrase.trim_end(), weight))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Numbered article listing with detected regions.
///
/// With `explain`, each article is followed by the keywords that drove its
/// region label.
pub fn render_article_listing(
    articles: &[Article],
    pairs: &[DuplicatePair],
    label: &str,
    explain: bool,
) -> String {
    let mut out = String::new();
    writeln!(out, "{} ({})", label, articles.len()).unwrap();
    if articles.is_empty() {
        writeln!(out, "  (none)").unwrap();
        return out;
    }

    for (i, article) in articles.iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. [{}] {} ({}){}",
            i + 1,
            article.detected_region.as_str().to_uppercase(),
            shorten(&article.title, TITLE_WIDTH),
            display_date(&article.date),
            dup_marker(pairs, i)
        )
        .unwrap();

        if explain {
            let scores = region_scores(&article_text(&article.title, &article.description, &article.slug));
            writeln!(
                out,
                "      europe {}: {} | us {}: {} | australia {}: {}",
                scores.europe.score,
                format_matches(&scores.europe),
                scores.us.score,
                format_matches(&scores.us),
                scores.australia.score,
                format_matches(&scores.australia)
            )
            .unwrap();
        }
    }
    duplicate_summary(&mut out, pairs);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::find_duplicates;
    use crate::models::Region;

    fn article(title: &str, slug: &str, region: Region) -> Article {
        Article {
            title: title.to_string(),
            description: String::new(),
            url: format!("https://modo.example/{slug}"),
            slug: slug.to_string(),
            date: "2025-05-06T10:00:00+00:00".to_string(),
            thumbnail_url: None,
            source_type: "R".to_string(),
            categories: Vec::new(),
            reading_time_minutes: None,
            detected_region: region,
        }
    }

    #[test]
    fn test_news_listing_marks_duplicates_and_isos() {
        let mut first = NewsItem::new("Germany battery fees rise", "", "https://a.example", "ESN");
        first.detected_isos = vec!["ERCOT".to_string()];
        let items = vec![
            first,
            NewsItem::new("Unrelated auction result", "", "https://b.example", "PV"),
            NewsItem::new("Germany battery fees rise sharply", "", "https://c.example", "RE"),
        ];
        let pairs = find_duplicates(&items, 0.65);
        let listing = render_news_listing(&items, &pairs, "News", true);

        assert!(listing.starts_with("News (3)"));
        assert!(listing.contains(" 1. [ESN] [ERCOT] Germany battery fees rise ⚠ DUP #3"));
        assert!(listing.contains(" 2. [PV] Unrelated auction result\n"));
        assert!(listing.contains(" 3. [RE] Germany battery fees rise sharply ⚠ DUP #1"));
        assert!(listing.contains("1 potential duplicate(s) found"));
    }

    #[test]
    fn test_news_listing_hides_isos_when_disabled() {
        let mut item = NewsItem::new("ERCOT prices", "", "https://a.example", "UD");
        item.detected_isos = vec!["ERCOT".to_string()];
        let listing = render_news_listing(&[item], &[], "News", false);
        assert!(listing.contains("[UD] ERCOT prices"));
        assert!(!listing.contains("[ERCOT]"));
        assert!(!listing.contains("potential duplicate"));
    }

    #[test]
    fn test_news_listing_shortens_titles() {
        let long = "x".repeat(80);
        let listing = render_news_listing(&[NewsItem::new(&long, "", "u", "S")], &[], "News", false);
        assert!(listing.contains(&format!("{}...", "x".repeat(50))));
    }

    #[test]
    fn test_empty_listings() {
        assert_eq!(render_news_listing(&[], &[], "News", false), "News (0)\n  (none)\n");
        assert_eq!(render_article_listing(&[], &[], "World", true), "World (0)\n  (none)\n");
    }

    #[test]
    fn test_article_listing_with_explain() {
        let articles = vec![article("ERCOT summer outlook", "ercot-summer", Region::Us)];
        let listing = render_article_listing(&articles, &[], "Featured", true);
        assert!(listing.contains(" 1. [US] ERCOT summer outlook (May 06, 2025)"));
        assert!(listing.contains("us 5: ercot(5)"));
        assert!(listing.contains("europe 0: -"));
    }
}
