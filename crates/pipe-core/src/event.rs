//! Event model: NIP-01 events, their tags, and the collection wrapper
//! that doubles as the buffer wire format.
//!
//! These types mirror the relay wire representation field for field so a
//! buffer can be handed straight to a transport. Conversion to a concrete
//! Nostr library type is the transport's job.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Kind 1: short text note.
pub const KIND_TEXT_NOTE: u16 = 1;
/// Kind 30023: long-form article (NIP-23).
pub const KIND_ARTICLE: u16 = 30023;

/// Tag key holding an article title.
pub const TAG_TITLE: &str = "title";
/// Tag key holding a hashtag.
pub const TAG_HASHTAG: &str = "t";

/// An ordered string sequence attached to an event.
///
/// Element 0 is conventionally the key and element 1 its primary value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(Vec<String>);

impl Tag {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn key(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn value(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Tag {
    fn from(parts: Vec<String>) -> Self {
        Self(parts)
    }
}

impl From<Tag> for Vec<String> {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

/// A signed event as fetched from a relay. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub pubkey: String,
    pub created_at: u64,
    pub kind: u16,
    pub tags: Vec<Tag>,
    pub content: String,
    pub sig: String,
}

impl Event {
    /// Values of every tag keyed `key` that carries a value, in tag order.
    pub fn tag_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |t| t.key() == Some(key))
            .filter_map(Tag::value)
    }

    /// The first `title` tag value, if any.
    pub fn title(&self) -> Option<&str> {
        self.tag_values(TAG_TITLE).next()
    }
}

/// Ordered events in retrieval order.
///
/// Serializes as `{"events":[...]}`, the canonical buffer encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCollection {
    pub events: Vec<Event>,
}

impl EventCollection {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub fn into_vec(self) -> Vec<Event> {
        self.events
    }
}

impl From<Vec<Event>> for EventCollection {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}

impl FromIterator<Event> for EventCollection {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for EventCollection {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a EventCollection {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// An event that still needs a signature before it can be published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnsignedEvent {
    pub pubkey: String,
    pub created_at: u64,
    pub kind: u16,
    pub tags: Vec<Tag>,
    pub content: String,
}

impl UnsignedEvent {
    /// Compute the event ID (SHA-256 of the NIP-01 canonical serialization).
    pub fn compute_id(&self) -> String {
        let canonical = serde_json::json!([
            0,
            self.pubkey,
            self.created_at,
            self.kind,
            self.tags,
            self.content,
        ]);
        let serialized = serde_json::to_string(&canonical).unwrap_or_default();
        hex::encode(Sha256::digest(serialized.as_bytes()))
    }

    /// Attach an id and signature produced by a signer.
    pub fn into_signed(self, id: String, sig: String) -> Event {
        Event {
            id,
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
            sig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(tags: Vec<Tag>) -> Event {
        Event {
            id: "e1".to_string(),
            pubkey: "aa".repeat(32),
            created_at: 1700000000,
            kind: KIND_ARTICLE,
            tags,
            content: "body".to_string(),
            sig: "00".repeat(64),
        }
    }

    #[test]
    fn tag_key_and_value_are_positional() {
        let tag = Tag::new(["e", "abc", "wss://relay.example.com", "root"]);
        assert_eq!(tag.key(), Some("e"));
        assert_eq!(tag.value(), Some("abc"));
        assert_eq!(tag.len(), 4);

        let bare = Tag::new(["t"]);
        assert_eq!(bare.key(), Some("t"));
        assert_eq!(bare.value(), None);

        let empty = Tag::new(Vec::<String>::new());
        assert!(empty.is_empty());
        assert_eq!(empty.key(), None);
    }

    #[test]
    fn tag_serializes_as_plain_array() {
        let json = serde_json::to_string(&Tag::new(["t", "rust"])).unwrap();
        assert_eq!(json, r#"["t","rust"]"#);
    }

    #[test]
    fn title_picks_first_title_tag() {
        let event = article(vec![
            Tag::new(["t", "rust"]),
            Tag::new(["title", "First"]),
            Tag::new(["title", "Second"]),
        ]);
        assert_eq!(event.title(), Some("First"));
        assert_eq!(article(vec![]).title(), None);
    }

    #[test]
    fn tag_values_skip_valueless_tags() {
        let event = article(vec![
            Tag::new(["t"]),
            Tag::new(["t", "go"]),
            Tag::new(["x", "go"]),
        ]);
        let values: Vec<&str> = event.tag_values("t").collect();
        assert_eq!(values, vec!["go"]);
    }

    #[test]
    fn event_wire_field_names() {
        let value = serde_json::to_value(article(vec![Tag::new(["t", "go"])])).unwrap();
        let obj = value.as_object().unwrap();
        for field in ["id", "pubkey", "created_at", "kind", "tags", "content", "sig"] {
            assert!(obj.contains_key(field), "missing field {field}");
        }
        assert_eq!(obj.len(), 7);
        assert_eq!(value["tags"], serde_json::json!([["t", "go"]]));
    }

    #[test]
    fn compute_id_is_stable_hex() {
        let unsigned = UnsignedEvent {
            pubkey: "aa".repeat(32),
            created_at: 1700000000,
            kind: KIND_TEXT_NOTE,
            tags: vec![],
            content: "hello".to_string(),
        };
        let id = unsigned.compute_id();
        assert_eq!(id.len(), 64);
        assert_eq!(id, unsigned.compute_id());

        let signed = unsigned.clone().into_signed(id.clone(), "ff".repeat(64));
        assert_eq!(signed.id, id);
        assert_eq!(signed.content, "hello");
    }
}
