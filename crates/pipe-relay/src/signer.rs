//! Schnorr signing with a local secret key.

use crate::convert::from_sdk_event;
use crate::keys::parse_secret_key;
use nostr_sdk::{EventBuilder, Keys, Kind, Tag as SdkTag, Timestamp};
use pipe_core::{EncodingError, Event, Signer, SigningError, UnsignedEvent};

/// Signs events with a key supplied by configuration.
#[derive(Clone)]
pub struct KeysSigner {
    keys: Keys,
}

impl KeysSigner {
    pub fn new(keys: Keys) -> Self {
        Self { keys }
    }

    /// Build a signer from an `nsec1...` or hex secret.
    pub fn from_secret(secret: &str) -> Result<Self, EncodingError> {
        parse_secret_key(secret).map(Self::new)
    }
}

impl Signer for KeysSigner {
    fn public_key(&self) -> String {
        self.keys.public_key().to_hex()
    }

    fn sign(&self, unsigned: UnsignedEvent) -> Result<Event, SigningError> {
        let tags = unsigned
            .tags
            .into_iter()
            .map(|tag| SdkTag::parse(Vec::<String>::from(tag)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SigningError(format!("invalid tag: {e}")))?;

        let event = EventBuilder::new(Kind::from(unsigned.kind), unsigned.content)
            .tags(tags)
            .custom_created_at(Timestamp::from(unsigned.created_at))
            .sign_with_keys(&self.keys)
            .map_err(|e| SigningError(e.to_string()))?;

        from_sdk_event(&event).map_err(|e| SigningError(e.to_string()))
    }
}
