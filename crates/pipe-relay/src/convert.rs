//! Conversion between the pipeline's wire types and `nostr-sdk` types.
//!
//! Both sides speak NIP-01 JSON, so conversion goes through it.

use nostr_sdk::{Event as SdkEvent, Filter as SdkFilter, JsonUtil};
use pipe_core::{Event, Filter, TransportError};

pub fn to_sdk_filter(filter: &Filter) -> Result<SdkFilter, TransportError> {
    SdkFilter::from_json(filter.to_json())
        .map_err(|e| TransportError::Protocol(format!("unusable filter: {e}")))
}

pub fn to_sdk_event(event: &Event) -> Result<SdkEvent, TransportError> {
    let json = serde_json::to_string(event)
        .map_err(|e| TransportError::Protocol(format!("unencodable event: {e}")))?;
    SdkEvent::from_json(json)
        .map_err(|e| TransportError::Protocol(format!("invalid event {}: {e}", event.id)))
}

pub fn from_sdk_event(event: &SdkEvent) -> Result<Event, TransportError> {
    serde_json::from_str(&event.as_json())
        .map_err(|e| TransportError::Protocol(format!("relay sent malformed event {}: {e}", event.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nostr_sdk::{EventBuilder, Keys, Kind, Tag as SdkTag};

    #[test]
    fn filter_carries_criteria() {
        let author = Keys::generate().public_key().to_hex();
        let filter = Filter::new()
            .with_kinds([30023])
            .unwrap()
            .with_authors([author.clone()])
            .unwrap()
            .with_limit(5)
            .unwrap();

        let sdk = to_sdk_filter(&filter).unwrap();
        assert_eq!(sdk.limit, Some(5));
        assert!(sdk.kinds.unwrap().contains(&Kind::from(30023u16)));
        let authors = sdk.authors.unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors.iter().next().unwrap().to_hex(), author);
    }

    #[test]
    fn event_roundtrip() {
        let keys = Keys::generate();
        let sdk = EventBuilder::new(Kind::from(30023u16), "long form body")
            .tag(SdkTag::parse(["title", "Intro"]).unwrap())
            .tag(SdkTag::parse(["t", "rust"]).unwrap())
            .sign_with_keys(&keys)
            .unwrap();

        let event = from_sdk_event(&sdk).unwrap();
        assert_eq!(event.id, sdk.id.to_hex());
        assert_eq!(event.kind, 30023);
        assert_eq!(event.title(), Some("Intro"));

        let back = to_sdk_event(&event).unwrap();
        assert_eq!(back, sdk);
    }

    #[test]
    fn rejects_garbage_event() {
        let event = Event {
            id: "not-hex".to_string(),
            pubkey: "also-not-hex".to_string(),
            created_at: 0,
            kind: 1,
            tags: vec![],
            content: String::new(),
            sig: String::new(),
        };
        assert!(matches!(to_sdk_event(&event), Err(TransportError::Protocol(_))));
    }
}
