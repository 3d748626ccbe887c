//! `nostr-sdk` implementations of the pipeline's external collaborators:
//! relay transport, signing, key decoding and `naddr` encoding.

pub mod address;
pub mod convert;
pub mod keys;
pub mod relay;
pub mod signer;

pub use address::NaddrEncoder;
pub use keys::{decode_public_key, parse_secret_key};
pub use relay::RelayClient;
pub use signer::KeysSigner;

// Re-export nostr-sdk for convenience
pub use nostr_sdk;
