//! Tag-frequency aggregation.

use crate::event::Event;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag value -> occurrence count.
///
/// Backed by an ordered map so the JSON encoding is stable, but callers
/// should treat it as unordered and go through the sorter for ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyMap(BTreeMap<String, u64>);

impl FrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, value: &str) {
        *self.0.entry(value.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, value: &str) -> Option<u64> {
        self.0.get(value).copied()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for FrequencyMap {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Count the value of every tag keyed `key` across `events`.
///
/// Tags with a different key or without a value element are skipped.
pub fn count_by_key<'a, I>(events: I, key: &str) -> FrequencyMap
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut counts = FrequencyMap::new();
    for event in events {
        for value in event.tag_values(key) {
            counts.increment(value);
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, Tag, KIND_ARTICLE};

    fn tagged(tags: Vec<Tag>) -> Event {
        Event {
            id: String::new(),
            pubkey: String::new(),
            created_at: 0,
            kind: KIND_ARTICLE,
            tags,
            content: String::new(),
            sig: String::new(),
        }
    }

    #[test]
    fn counts_hashtags() {
        let events = vec![
            tagged(vec![Tag::new(["t", "go"])]),
            tagged(vec![Tag::new(["t", "rust"])]),
            tagged(vec![Tag::new(["t", "go"])]),
        ];
        let counts = count_by_key(&events, "t");
        assert_eq!(counts, FrequencyMap::from_iter([("go", 2), ("rust", 1)]));
    }

    #[test]
    fn skips_short_and_foreign_tags() {
        let events = vec![tagged(vec![
            Tag::new(["t"]),
            Tag::new(Vec::<String>::new()),
            Tag::new(["p", "go"]),
            Tag::new(["t", "go", "extra"]),
        ])];
        let counts = count_by_key(&events, "t");
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("go"), Some(1));
    }

    #[test]
    fn total_matches_qualifying_tag_count() {
        let events = vec![
            tagged(vec![Tag::new(["t", "a"]), Tag::new(["t", "b"]), Tag::new(["t", "a"])]),
            tagged(vec![Tag::new(["title", "x"]), Tag::new(["t", "c"])]),
            tagged(vec![]),
        ];
        let qualifying = events
            .iter()
            .flat_map(|e| e.tags.iter())
            .filter(|t| t.key() == Some("t") && t.len() >= 2)
            .count() as u64;
        assert_eq!(count_by_key(&events, "t").total(), qualifying);
    }

    #[test]
    fn empty_collection_gives_empty_map() {
        let counts = count_by_key(&Vec::<Event>::new(), "t");
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn serializes_as_object() {
        let counts = FrequencyMap::from_iter([("go", 2), ("rust", 1)]);
        assert_eq!(
            serde_json::to_string(&counts).unwrap(),
            r#"{"go":2,"rust":1}"#
        );
    }
}
