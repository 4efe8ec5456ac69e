//! Near-duplicate headline detection.
//!
//! Similarity is the block-matching ratio `2 * M / T`: find the longest
//! common block, recurse on the unmatched text to its left and right, sum
//! the matched lengths `M`, and divide by the combined length `T`. Headlines
//! reworded by two outlets for the same story land well above the default
//! threshold; unrelated headlines sit around a third.

use crate::models::{DuplicatePair, Headline};
use itertools::Itertools;
use std::collections::HashMap;
use tracing::debug;

/// Default similarity at or above which two headlines are flagged.
pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.65;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    a: usize,
    b: usize,
    size: usize,
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Earliest block in `a` wins among equally long ones, then earliest in `b`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> Block {
    let mut best = Block { a: alo, b: blo, size: 0 };
    // j2len[j] = length of the match ending at a[i - 1], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(ch) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best.size {
                    best = Block {
                        a: i + 1 - k,
                        b: j + 1 - k,
                        size: k,
                    };
                }
            }
        }
        j2len = next;
    }
    best
}

/// Total length of all matching blocks between `a` and `b`.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, ch) in b.iter().enumerate() {
        b2j.entry(*ch).or_default().push(j);
    }

    let mut total = 0;
    let mut pending = vec![((0, a.len()), (0, b.len()))];
    while let Some(((alo, ahi), (blo, bhi))) = pending.pop() {
        let block = longest_match(a, &b2j, (alo, ahi), (blo, bhi));
        if block.size == 0 {
            continue;
        }
        total += block.size;
        if alo < block.a && blo < block.b {
            pending.push(((alo, block.a), (blo, block.b)));
        }
        let (a_end, b_end) = (block.a + block.size, block.b + block.size);
        if a_end < ahi && b_end < bhi {
            pending.push(((a_end, ahi), (b_end, bhi)));
        }
    }
    total
}

/// Case-insensitive similarity of two strings in `[0, 1]`.
///
/// Two empty strings are identical (`1.0`).
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

/// Every pair `(i, j)`, `i < j`, whose headlines are at least `threshold` similar.
///
/// Pairs come out in `(i, j)` lexicographic order and each pair once.
/// Nothing is removed from `items`.
pub fn find_duplicates<T: Headline>(items: &[T], threshold: f64) -> Vec<DuplicatePair> {
    let pairs: Vec<DuplicatePair> = (0..items.len())
        .tuple_combinations::<(usize, usize)>()
        .filter_map(|(i, j)| {
            let score = similarity(items[i].headline(), items[j].headline());
            (score >= threshold).then_some(DuplicatePair {
                first: i,
                second: j,
                similarity: score,
            })
        })
        .collect();
    debug!(items = items.len(), pairs = pairs.len(), threshold, "Duplicate scan complete");
    pairs
}

/// The other member of the first pair involving `index`, if any.
pub fn duplicate_partner(pairs: &[DuplicatePair], index: usize) -> Option<usize> {
    pairs.iter().find_map(|pair| {
        if pair.first == index {
            Some(pair.second)
        } else if pair.second == index {
            Some(pair.first)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_identical_and_disjoint() {
        assert_eq!(similarity("battery", "battery"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
    }

    #[test]
    fn test_similarity_is_case_insensitive() {
        assert_eq!(similarity("ERCOT Prices", "ercot prices"), 1.0);
    }

    #[test]
    fn test_similarity_prefix_ratio() {
        // 2 * 25 / (25 + 33)
        let score = similarity("Germany battery fees rise", "Germany battery fees rise sharply");
        assert!((score - 50.0 / 58.0).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_counts_blocks_on_both_sides() {
        // "ab" + "d" match around the differing middle character
        let score = similarity("abxd", "abyd");
        assert!((score - 6.0 / 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_unrelated_headlines() {
        let score = similarity("Solar news today", "Unrelated battery auction result");
        assert!((score - 16.0 / 48.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_find_duplicates_flags_near_identical_titles() {
        let titles = ["Germany battery fees rise", "Germany battery fees rise sharply"];
        let pairs = find_duplicates(&titles, DEFAULT_DUPLICATE_THRESHOLD);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].first, pairs[0].second), (0, 1));
        assert!(pairs[0].similarity > 0.65);
    }

    #[test]
    fn test_find_duplicates_ignores_unrelated_titles() {
        let titles = ["Solar news today", "Unrelated battery auction result"];
        assert!(find_duplicates(&titles, DEFAULT_DUPLICATE_THRESHOLD).is_empty());
    }

    #[test]
    fn test_find_duplicates_reports_each_pair_once() {
        let titles = ["Same headline", "Same headline", "Same headline"];
        let pairs = find_duplicates(&titles, DEFAULT_DUPLICATE_THRESHOLD);
        let idx: Vec<(usize, usize)> = pairs.iter().map(|p| (p.first, p.second)).collect();
        assert_eq!(idx, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_find_duplicates_empty_input() {
        let titles: [&str; 0] = [];
        assert!(find_duplicates(&titles, DEFAULT_DUPLICATE_THRESHOLD).is_empty());
    }

    #[test]
    fn test_duplicate_partner() {
        let pairs = vec![
            DuplicatePair { first: 0, second: 3, similarity: 0.9 },
            DuplicatePair { first: 2, second: 3, similarity: 0.8 },
        ];
        assert_eq!(duplicate_partner(&pairs, 0), Some(3));
        assert_eq!(duplicate_partner(&pairs, 3), Some(0));
        assert_eq!(duplicate_partner(&pairs, 2), Some(3));
        assert_eq!(duplicate_partner(&pairs, 1), None);
    }
}
