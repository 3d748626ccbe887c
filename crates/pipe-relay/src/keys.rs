//! Decoding human-readable key formats (NIP-19 bech32 or hex).

use nostr_sdk::{Keys, PublicKey};
use pipe_core::EncodingError;

/// Decode an `npub1...` or 64-char hex public key into lowercase hex.
pub fn decode_public_key(input: &str) -> Result<String, EncodingError> {
    PublicKey::parse(input.trim())
        .map(|pk| pk.to_hex())
        .map_err(|e| EncodingError::InvalidPublicKey {
            input: input.to_string(),
            reason: e.to_string(),
        })
}

/// Parse an `nsec1...` or hex secret key.
pub fn parse_secret_key(secret: &str) -> Result<Keys, EncodingError> {
    Keys::parse(secret.trim()).map_err(|e| EncodingError::InvalidSecretKey(e.to_string()))
}
