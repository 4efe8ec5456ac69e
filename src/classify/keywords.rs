//! Static keyword tables for region detection and news relevance.
//!
//! Weighted tables are `(phrase, weight)` pairs; a higher weight is a
//! stronger regional signal (market operators outrank country names).
//! All phrases are lowercase and are matched as plain substrings, so a few
//! entries carry a trailing space to avoid matching inside longer words.

/// A weighted keyword: `(phrase, weight)`.
pub type KeywordEntry = (&'static str, u32);

/// Weighted Europe keywords used by the article classifier.
pub static EUROPE_KEYWORDS: &[KeywordEntry] = &[
    // Countries and regions
    ("great britain", 3),
    ("united kingdom", 3),
    ("britain", 3),
    ("british", 3),
    ("england", 3),
    ("scotland", 3),
    ("wales", 3),
    ("northern ireland", 3),
    ("germany", 3),
    ("german", 3),
    ("deutschland", 3),
    ("spain", 3),
    ("spanish", 3),
    ("iberia", 3),
    ("iberian", 3),
    ("italy", 3),
    ("italian", 3),
    ("france", 3),
    ("french", 3),
    ("netherlands", 3),
    ("dutch", 3),
    ("belgium", 3),
    ("belgian", 3),
    ("poland", 3),
    ("polish", 3),
    ("nordic", 3),
    ("scandinavia", 3),
    ("europe", 2),
    ("european", 2),
    ("uk", 2),
    ("gb ", 2),
    // Grid and market operators
    ("national grid eso", 4),
    ("national grid", 3),
    ("ofgem", 4),
    ("epex spot", 4),
    ("nord pool", 4),
    ("energinet", 4),
    ("entsoe", 4),
    ("entso-e", 4),
    ("bundesnetzagentur", 4),
];

/// Weighted US keywords used by the article classifier.
pub static US_KEYWORDS: &[KeywordEntry] = &[
    // ISOs and RTOs
    ("ercot", 5),
    ("caiso", 5),
    ("miso", 5),
    ("pjm", 5),
    ("nyiso", 5),
    ("iso-ne", 5),
    ("iso ne", 5),
    ("spp", 4),
    ("southwest power pool", 5),
    ("midcontinent iso", 5),
    // Regulators
    ("ferc", 4),
    ("nerc", 4),
    ("doe ", 3),
    ("department of energy", 3),
    // States
    ("california", 3),
    ("texas", 3),
    ("florida", 3),
    ("new york", 3),
    ("arizona", 3),
    ("nevada", 3),
    ("colorado", 3),
    ("illinois", 3),
    ("ohio", 3),
    ("pennsylvania", 3),
    ("new jersey", 3),
    ("massachusetts", 3),
    ("michigan", 3),
    ("georgia", 3),
    ("north carolina", 3),
    ("virginia", 3),
    // Country
    ("united states", 3),
    ("usa", 2),
    ("american", 2),
    ("u.s.", 2),
    // Market terms
    ("lcr", 3),
    ("resource adequacy", 3),
    ("wholesale market", 2),
];

/// Weighted Australia keywords used by the article classifier.
pub static AUSTRALIA_KEYWORDS: &[KeywordEntry] = &[
    // Market operators
    ("nem", 5),
    ("national electricity market", 5),
    ("wem", 5),
    ("wholesale electricity market", 5),
    ("aemo", 5),
    ("australian energy market operator", 5),
    ("aemc", 4),
    ("aer", 3),
    // States and territories
    ("queensland", 3),
    ("new south wales", 3),
    ("nsw", 3),
    ("victoria", 3),
    ("south australia", 3),
    ("tasmania", 3),
    ("western australia", 3),
    ("northern territory", 3),
    // Country
    ("australia", 3),
    ("australian", 3),
    // Market participants
    ("snowy hydro", 4),
    ("origin energy", 3),
    ("agl", 3),
];

/// Battery and storage terms; each hit is worth three relevance points.
pub static PRIORITY_KEYWORDS: &[&str] = &[
    "battery",
    "bess",
    "energy storage",
    "battery storage",
    "lithium",
    "li-ion",
    "grid-scale storage",
    "utility-scale storage",
    "battery project",
    "storage project",
    "battery asset",
    "ancillary services",
    "frequency response",
    "balancing market",
    "wholesale market",
    "merchant battery",
    "storage developer",
    "battery operator",
    "flexitricity",
    "grid services",
];

/// Adjacent energy topics; each hit is worth one relevance point.
pub static SECONDARY_KEYWORDS: &[&str] = &[
    "solar",
    "pv",
    "photovoltaic",
    "wind",
    "renewable",
    "grid",
    "flexibility",
    "capacity market",
    "interconnector",
    "transmission",
    "distribution",
    "megawatt",
    "mw",
    "gwh",
    "mwh",
    "energy transition",
    "net zero",
    "decarbonisation",
];

/// Any hit excludes the item outright.
pub static NEGATIVE_KEYWORDS: &[&str] = &[
    "electric vehicle",
    "ev battery",
    "ev charging",
    "tesla car",
    "phone battery",
    "laptop battery",
    "consumer electronics",
    "hydrogen",
    "fuel cell",
    "nuclear",
];

/// Unweighted Europe markers for the news regional gate.
pub static NEWS_EUROPE_KEYWORDS: &[&str] = &[
    "uk",
    "britain",
    "british",
    "england",
    "scotland",
    "wales",
    "germany",
    "german",
    "deutschland",
    "spain",
    "spanish",
    "iberia",
    "iberian",
    "italy",
    "italian",
    "france",
    "french",
    "netherlands",
    "dutch",
    "belgium",
    "belgian",
    "poland",
    "polish",
    "nordic",
    "sweden",
    "norway",
    "denmark",
    "finland",
    "ireland",
    "irish",
    "portugal",
    "portuguese",
    "austria",
    "austrian",
    "greece",
    "greek",
    "europe",
    "european",
    "eu ",
];

/// Unweighted US markers for the news regional gate.
pub static NEWS_US_KEYWORDS: &[&str] = &[
    "us ",
    "usa",
    "united states",
    "american",
    "california",
    "texas",
    "florida",
    "new york",
    "arizona",
    "ercot",
    "caiso",
    "miso",
    "pjm",
    "nyiso",
    "spp",
    "iso-ne",
    "ferc",
    "doe ",
    "department of energy",
];

/// Unweighted Australia markers for the news regional gate.
pub static NEWS_AUSTRALIA_KEYWORDS: &[&str] = &[
    "australia",
    "australian",
    "nem",
    "wem",
    "aemo",
    "queensland",
    "new south wales",
    "victoria",
    "south australia",
];

/// US grid operators and the phrases that identify them, in display order.
pub static ISO_KEYWORDS: &[(&str, &[&str])] = &[
    ("ERCOT", &["ercot", "texas grid", "texas power", "oncor", "centerpoint texas"]),
    ("MISO", &["miso", "midcontinent", "midcon"]),
    ("CAISO", &["caiso", "california iso", "california grid", "cpuc"]),
    ("PJM", &["pjm", "mid-atlantic"]),
    ("NYISO", &["nyiso", "new york iso", "new york grid", "con edison", "nyserda"]),
    ("ISO-NE", &["iso-ne", "iso ne", "new england iso", "new england grid"]),
    ("SPP", &["spp", "southwest power pool"]),
];

/// `true` if any phrase occurs in `text`.
pub fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}

/// Number of distinct phrases that occur in `text`.
pub fn count_present(text: &str, phrases: &[&str]) -> usize {
    phrases.iter().filter(|p| text.contains(*p)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_lowercase_unique(phrases: impl Iterator<Item = &'static str>) {
        let mut seen = HashSet::new();
        for phrase in phrases {
            assert_eq!(phrase, phrase.to_lowercase(), "phrase not lowercase: {phrase}");
            assert!(seen.insert(phrase), "duplicate phrase: {phrase}");
        }
    }

    #[test]
    fn test_weighted_tables_are_lowercase_and_unique() {
        for table in [EUROPE_KEYWORDS, US_KEYWORDS, AUSTRALIA_KEYWORDS] {
            assert_lowercase_unique(table.iter().map(|(p, _)| *p));
            assert!(table.iter().all(|(_, w)| *w >= 2));
        }
    }

    #[test]
    fn test_plain_lists_are_lowercase_and_unique() {
        for list in [
            PRIORITY_KEYWORDS,
            SECONDARY_KEYWORDS,
            NEGATIVE_KEYWORDS,
            NEWS_EUROPE_KEYWORDS,
            NEWS_US_KEYWORDS,
            NEWS_AUSTRALIA_KEYWORDS,
        ] {
            assert_lowercase_unique(list.iter().copied());
        }
    }

    #[test]
    fn test_count_present_is_presence_based() {
        assert_eq!(count_present("solar solar solar", &["solar", "wind"]), 1);
        assert_eq!(count_present("solar and wind", &["solar", "wind"]), 2);
        assert_eq!(count_present("", &["solar"]), 0);
    }

    #[test]
    fn test_contains_any() {
        assert!(contains_any("new nuclear plant", NEGATIVE_KEYWORDS));
        assert!(!contains_any("new solar plant", NEGATIVE_KEYWORDS));
    }
}
