//! NIP-19 `naddr` encoding of addressable event coordinates.

use nostr_sdk::nips::nip01::Coordinate;
use nostr_sdk::nips::nip19::Nip19Coordinate;
use nostr_sdk::{Kind, PublicKey, RelayUrl, ToBech32};
use pipe_core::{AddressEncoder, EncodingError};

/// Encodes `(author, kind, identifier)` as `naddr1...`, optionally with
/// relay hints.
#[derive(Debug, Clone, Default)]
pub struct NaddrEncoder {
    relays: Vec<RelayUrl>,
}

impl NaddrEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed relay hints in every encoded address.
    pub fn with_relays<I, S>(relays: I) -> Result<Self, EncodingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let relays = relays
            .into_iter()
            .map(|r| {
                RelayUrl::parse(r.as_ref())
                    .map_err(|e| EncodingError::Address(format!("bad relay hint {}: {e}", r.as_ref())))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { relays })
    }
}

impl AddressEncoder for NaddrEncoder {
    fn encode(&self, pubkey: &str, kind: u16, identifier: &str) -> Result<String, EncodingError> {
        let public_key = PublicKey::from_hex(pubkey).map_err(|e| EncodingError::InvalidPublicKey {
            input: pubkey.to_string(),
            reason: e.to_string(),
        })?;
        let coordinate = Coordinate::new(Kind::from(kind), public_key).identifier(identifier);
        Nip19Coordinate::new(coordinate, self.relays.clone())
            .to_bech32()
            .map_err(|e| EncodingError::Address(e.to_string()))
    }
}
