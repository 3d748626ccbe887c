//! Derived scalar sequences: titles and addressable identifiers.

use crate::error::EncodingError;
use crate::event::{Event, TAG_TITLE};

/// Encodes an (author, kind, identifier) triple into a canonical address
/// string, e.g. a NIP-19 `naddr`.
pub trait AddressEncoder {
    fn encode(&self, pubkey: &str, kind: u16, identifier: &str) -> Result<String, EncodingError>;
}

/// Every `title` tag value, in event order then tag order.
pub fn titles<'a, I>(events: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Event>,
{
    events
        .into_iter()
        .flat_map(|e| e.tag_values(TAG_TITLE))
        .map(str::to_string)
        .collect()
}

/// One address per event built from its author, kind and title.
///
/// Events without a title use an empty identifier. Only bad key material
/// reported by the encoder fails the call.
pub fn identifiers<'a, I, E>(events: I, encoder: &E) -> Result<Vec<String>, EncodingError>
where
    I: IntoIterator<Item = &'a Event>,
    E: AddressEncoder + ?Sized,
{
    events
        .into_iter()
        .map(|e| encoder.encode(&e.pubkey, e.kind, e.title().unwrap_or_default()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Tag, KIND_ARTICLE};

    struct PlainEncoder;

    impl AddressEncoder for PlainEncoder {
        fn encode(&self, pubkey: &str, kind: u16, identifier: &str) -> Result<String, EncodingError> {
            if pubkey.is_empty() {
                return Err(EncodingError::InvalidPublicKey {
                    input: pubkey.to_string(),
                    reason: "empty".to_string(),
                });
            }
            Ok(format!("{kind}:{pubkey}:{identifier}"))
        }
    }

    fn event(pubkey: &str, tags: Vec<Tag>) -> Event {
        Event {
            id: String::new(),
            pubkey: pubkey.to_string(),
            created_at: 0,
            kind: KIND_ARTICLE,
            tags,
            content: String::new(),
            sig: String::new(),
        }
    }

    #[test]
    fn titles_skip_untitled_events() {
        let events = vec![event("pk", vec![Tag::new(["title", "Intro"])]), event("pk", vec![])];
        assert_eq!(titles(&events), vec!["Intro"]);
    }

    #[test]
    fn titles_keep_event_then_tag_order() {
        let events = vec![
            event("pk", vec![Tag::new(["title", "A"]), Tag::new(["t", "x"]), Tag::new(["title", "B"])]),
            event("pk", vec![Tag::new(["title"])]),
            event("pk", vec![Tag::new(["title", "C"])]),
        ];
        assert_eq!(titles(&events), vec!["A", "B", "C"]);
    }

    #[test]
    fn identifiers_use_title_or_empty() {
        let events = vec![
            event("pk1", vec![Tag::new(["title", "Intro"])]),
            event("pk2", vec![]),
        ];
        let ids = identifiers(&events, &PlainEncoder).unwrap();
        assert_eq!(ids, vec!["30023:pk1:Intro", "30023:pk2:"]);
    }

    #[test]
    fn identifiers_propagate_encoding_errors() {
        let events = vec![event("pk1", vec![]), event("", vec![])];
        assert!(matches!(
            identifiers(&events, &PlainEncoder),
            Err(EncodingError::InvalidPublicKey { .. })
        ));
    }
}
