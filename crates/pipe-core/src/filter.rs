//! Query criteria.
//!
//! A [`Filter`] is built by functional update and never mutated in place.
//! It serializes as a NIP-01 filter object so transports can hand it to
//! their own filter type unchanged.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Limit applied when the caller does not pick one.
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    authors: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    kinds: BTreeSet<u16>,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            authors: BTreeSet::new(),
            kinds: BTreeSet::new(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Filter {
    /// An unconstrained filter bounded by [`DEFAULT_LIMIT`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to events signed by `keys` (hex public keys).
    pub fn with_authors<I, S>(self, keys: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let authors = keys
            .into_iter()
            .map(|k| {
                let key: String = k.into();
                if is_hex_key(&key) {
                    Ok(key)
                } else {
                    Err(ConfigurationError::InvalidAuthor(key))
                }
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        if authors.is_empty() {
            return Err(ConfigurationError::EmptyAuthors);
        }
        Ok(Self { authors, ..self })
    }

    /// Restrict to the given event kinds.
    pub fn with_kinds<I>(self, kinds: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = u16>,
    {
        let kinds: BTreeSet<u16> = kinds.into_iter().collect();
        if kinds.is_empty() {
            return Err(ConfigurationError::EmptyKinds);
        }
        Ok(Self { kinds, ..self })
    }

    /// Cap the number of returned events.
    pub fn with_limit(self, limit: usize) -> Result<Self, ConfigurationError> {
        if limit == 0 {
            return Err(ConfigurationError::InvalidLimit(limit));
        }
        Ok(Self { limit, ..self })
    }

    pub fn authors(&self) -> &BTreeSet<String> {
        &self.authors
    }

    pub fn kinds(&self) -> &BTreeSet<u16> {
        &self.kinds
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// NIP-01 filter JSON, e.g. `{"authors":[..],"kinds":[30023],"limit":10}`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("filter is always serializable")
    }
}

fn is_hex_key(key: &str) -> bool {
    key.len() == 64 && key.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
