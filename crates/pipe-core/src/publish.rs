//! Republish a collection's events under a new signature.
//!
//! Every source event yields a freshly built event: content, kind and tags
//! are copied, `created_at` is the publish time, and the signer's key is the
//! author. Source events are never modified.

use crate::context::Deadline;
use crate::error::PublishError;
use crate::event::{EventCollection, UnsignedEvent};
use crate::transport::{Signer, Transport};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Outcome of a successful publish run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReport {
    pub published: Vec<PublishedEvent>,
}

impl PublishReport {
    pub fn len(&self) -> usize {
        self.published.len()
    }

    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedEvent {
    /// Id of the event the copy was made from.
    pub source_id: String,
    /// Id the relay accepted for the new event.
    pub id: String,
}

fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

pub struct Publisher<T, S> {
    transport: T,
    signer: S,
    clock: fn() -> u64,
}

impl<T: Transport, S: Signer> Publisher<T, S> {
    /// `signer` carries the signing key; nothing is read from the environment.
    pub fn new(transport: T, signer: S) -> Self {
        Self {
            transport,
            signer,
            clock: unix_now,
        }
    }

    /// Override the timestamp source.
    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    /// Sign and submit every event in order, aborting on the first failure.
    ///
    /// An empty collection performs no transport calls.
    pub async fn publish(
        &self,
        events: &EventCollection,
        deadline: &Deadline,
    ) -> Result<PublishReport, PublishError> {
        let mut report = PublishReport::default();
        if events.is_empty() {
            debug!("Nothing to publish");
            return Ok(report);
        }

        let pubkey = self.signer.public_key();
        for (index, source) in events.iter().enumerate() {
            let unsigned = UnsignedEvent {
                pubkey: pubkey.clone(),
                created_at: (self.clock)(),
                kind: source.kind,
                tags: source.tags.clone(),
                content: source.content.clone(),
            };

            let signed = self
                .signer
                .sign(unsigned)
                .map_err(|source| PublishError::Signing { index, source })?;

            let id = deadline
                .run(self.transport.publish(&signed))
                .await
                .map_err(|source| PublishError::Transport { index, source })?;

            debug!(index, %id, "Published event");
            report.published.push(PublishedEvent {
                source_id: source.id.clone(),
                id,
            });
        }

        info!("Republished {} event(s)", report.len());
        Ok(report)
    }
}
