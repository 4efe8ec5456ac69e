//! US grid operator (ISO/RTO) tagging for news items.
//!
//! The US edition shows which markets each headline touches so the editor
//! can balance coverage across ERCOT, MISO, CAISO and the rest.

use crate::classify::keywords::{ISO_KEYWORDS, contains_any};
use crate::models::NewsItem;

/// ISO labels whose phrases occur in `text`, in [`ISO_KEYWORDS`] order.
pub fn detect_isos(text: &str) -> Vec<&'static str> {
    let text = text.to_lowercase();
    ISO_KEYWORDS
        .iter()
        .filter(|(_, phrases)| contains_any(&text, phrases))
        .map(|(iso, _)| *iso)
        .collect()
}

/// Fill `detected_isos` on every item from its title and description.
pub fn tag_isos(items: &mut [NewsItem]) {
    for item in items.iter_mut() {
        let text = format!("{} {}", item.title, item.description);
        item.detected_isos = detect_isos(&text).into_iter().map(String::from).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_isos_in_table_order() {
        let isos = detect_isos("PJM capacity auction follows ERCOT scarcity pricing");
        assert_eq!(isos, vec!["ERCOT", "PJM"]);
    }

    #[test]
    fn test_detect_isos_by_alias() {
        assert_eq!(detect_isos("CPUC approves procurement"), vec!["CAISO"]);
        assert_eq!(detect_isos("Con Edison battery"), vec!["NYISO"]);
    }

    #[test]
    fn test_detect_isos_none() {
        assert!(detect_isos("German capacity auction").is_empty());
    }

    #[test]
    fn test_tag_isos_sets_field() {
        let mut items = vec![
            NewsItem::new("Southwest Power Pool queue reform", "", "", ""),
            NewsItem::new("Nothing relevant", "", "", ""),
        ];
        tag_isos(&mut items);
        assert_eq!(items[0].detected_isos, vec!["SPP".to_string()]);
        assert!(items[1].detected_isos.is_empty());
    }
}
