//! Seams to the external collaborators: relay transport and signing.
//!
//! The core never talks to a relay or touches key material directly; the
//! `pipe-relay` crate provides `nostr-sdk` backed implementations.

use crate::error::{SigningError, TransportError};
use crate::event::{Event, UnsignedEvent};
use crate::filter::Filter;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A connected relay (or relay pool) supporting one-shot request/response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch stored events matching `filter`. `timeout` bounds how long the
    /// relay may take to signal end of stored events.
    async fn query(&self, filter: &Filter, timeout: Duration) -> Result<Vec<Event>, TransportError>;

    /// Submit a signed event, returning the id the relay accepted.
    async fn publish(&self, event: &Event) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn query(&self, filter: &Filter, timeout: Duration) -> Result<Vec<Event>, TransportError> {
        (**self).query(filter, timeout).await
    }

    async fn publish(&self, event: &Event) -> Result<String, TransportError> {
        (**self).publish(event).await
    }
}

/// Produces signature-bearing events from unsigned ones.
pub trait Signer: Send + Sync {
    /// Hex public key events will be signed as.
    fn public_key(&self) -> String;

    fn sign(&self, unsigned: UnsignedEvent) -> Result<Event, SigningError>;
}
