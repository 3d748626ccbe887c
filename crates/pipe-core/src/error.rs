//! Error types for the stage pipeline.
//!
//! Each stage fails with its own error type; [`PipelineError`] unifies them
//! for callers that drive a whole chain.

use std::time::Duration;
use thiserror::Error;

/// Invalid filter or stage input supplied by the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// An author set was supplied but contained no keys.
    #[error("author set must not be empty")]
    EmptyAuthors,

    /// A kind set was supplied but contained no kinds.
    #[error("kind set must not be empty")]
    EmptyKinds,

    /// The result limit must be at least one.
    #[error("limit must be positive, got {0}")]
    InvalidLimit(usize),

    /// An author key is not a 32-byte lowercase hex string.
    #[error("invalid author key '{0}': expected 64 hex characters")]
    InvalidAuthor(String),

    /// Aggregation was asked for an empty tag key.
    #[error("tag key must not be empty")]
    EmptyTagKey,
}

/// Failure talking to a relay.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection refused by {endpoint}: {reason}")]
    ConnectionRefused { endpoint: String, reason: String },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("operation cancelled")]
    Cancelled,
}

/// Malformed buffer contents.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed event buffer at byte {offset}: {message}")]
pub struct DecodeError {
    /// Byte offset into the encoding where decoding failed.
    pub offset: usize,
    pub message: String,
}

/// Bad identifier or key material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("invalid public key '{input}': {reason}")]
    InvalidPublicKey { input: String, reason: String },

    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    #[error("failed to encode address: {0}")]
    Address(String),
}

/// Signing failed, usually because of invalid key material or tags.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("signing failed: {0}")]
pub struct SigningError(pub String);

/// A publish run aborted on the event at `index`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("event {index}: {source}")]
    Signing {
        index: usize,
        #[source]
        source: SigningError,
    },

    #[error("event {index}: {source}")]
    Transport {
        index: usize,
        #[source]
        source: TransportError,
    },
}

impl PublishError {
    /// Position in the input collection of the event that failed.
    pub fn index(&self) -> usize {
        match self {
            PublishError::Signing { index, .. } | PublishError::Transport { index, .. } => *index,
        }
    }
}

/// Any failure that terminates a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("signing error: {0}")]
    Signing(#[from] SigningError),

    #[error("publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias for whole-pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
