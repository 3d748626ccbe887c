//! Deterministic orderings over a [`FrequencyMap`].
//!
//! Both strategies are pure: the map is borrowed and a new sequence is
//! returned.

use crate::aggregate::FrequencyMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortedEntry {
    pub key: String,
    pub count: u64,
}

impl SortedEntry {
    pub fn new(key: impl Into<String>, count: u64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

/// Selects a sort strategy at runtime (CLI `--sort`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Count,
    Name,
}

impl SortOrder {
    pub fn apply(self, counts: &FrequencyMap) -> Vec<SortedEntry> {
        match self {
            SortOrder::Count => sort_by_count(counts),
            SortOrder::Name => sort_by_name(counts),
        }
    }
}

fn entries(counts: &FrequencyMap) -> Vec<SortedEntry> {
    counts.iter().map(|(k, v)| SortedEntry::new(k, v)).collect()
}

/// Count ascending, ties broken by key ascending.
///
/// Ascending is the established behaviour of this stage; callers wanting the
/// most frequent values first should reverse the result.
pub fn sort_by_count(counts: &FrequencyMap) -> Vec<SortedEntry> {
    let mut sorted = entries(counts);
    sorted.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.key.cmp(&b.key)));
    sorted
}

/// Key ascending, byte-wise.
pub fn sort_by_name(counts: &FrequencyMap) -> Vec<SortedEntry> {
    let mut sorted = entries(counts);
    sorted.sort_by(|a, b| a.key.as_bytes().cmp(b.key.as_bytes()));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FrequencyMap {
        FrequencyMap::from_iter([("go", 2), ("rust", 1)])
    }

    #[test]
    fn by_count_is_ascending() {
        assert_eq!(
            sort_by_count(&sample()),
            vec![SortedEntry::new("rust", 1), SortedEntry::new("go", 2)]
        );
    }

    #[test]
    fn by_name_is_lexical() {
        assert_eq!(
            sort_by_name(&sample()),
            vec![SortedEntry::new("go", 2), SortedEntry::new("rust", 1)]
        );
    }

    #[test]
    fn count_ties_break_on_key() {
        let counts = FrequencyMap::from_iter([("zig", 3), ("c", 3), ("nim", 1), ("ada", 3)]);
        let keys: Vec<String> = sort_by_count(&counts).into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["nim", "ada", "c", "zig"]);
    }

    #[test]
    fn by_count_is_non_decreasing() {
        let counts = FrequencyMap::from_iter([("a", 5), ("b", 1), ("c", 3), ("d", 3), ("e", 0)]);
        let sorted = sort_by_count(&counts);
        for pair in sorted.windows(2) {
            assert!(pair[0].count <= pair[1].count);
            if pair[0].count == pair[1].count {
                assert!(pair[0].key < pair[1].key);
            }
        }
    }

    #[test]
    fn by_name_is_strictly_ascending_bytewise() {
        let counts = FrequencyMap::from_iter([("b", 1), ("B", 1), ("a", 1), ("é", 1)]);
        let keys: Vec<String> = sort_by_name(&counts).into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["B", "a", "b", "é"]);
        for pair in keys.windows(2) {
            assert!(pair[0].as_bytes() < pair[1].as_bytes());
        }
    }

    #[test]
    fn sorting_leaves_input_untouched() {
        let counts = sample();
        let before = counts.clone();
        let _ = sort_by_count(&counts);
        let _ = sort_by_name(&counts);
        assert_eq!(counts, before);
    }

    #[test]
    fn sort_order_dispatch() {
        assert_eq!(SortOrder::Count.apply(&sample()), sort_by_count(&sample()));
        assert_eq!(SortOrder::Name.apply(&sample()), sort_by_name(&sample()));
    }

    #[test]
    fn empty_map_sorts_to_empty() {
        assert!(sort_by_count(&FrequencyMap::new()).is_empty());
        assert!(sort_by_name(&FrequencyMap::new()).is_empty());
    }
}
