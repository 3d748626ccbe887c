//! Relay client wrapper implementing the pipeline's transport seam.

use crate::convert::{from_sdk_event, to_sdk_event, to_sdk_filter};
use async_trait::async_trait;
use nostr_sdk::prelude::{Client, Relay, RelayUrl};
use pipe_core::{Event, Filter, Transport, TransportError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// A read/write connection to a single relay.
///
/// The client never signs anything itself; events arrive already signed.
#[derive(Clone)]
pub struct RelayClient {
    client: Client,
    url: String,
}

impl RelayClient {
    /// Connect to `url`, waiting up to `timeout` for the handshake.
    ///
    /// An unreachable relay fails here with `ConnectionRefused` rather than
    /// surfacing later as an empty result.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let refused = |reason: String| TransportError::ConnectionRefused {
            endpoint: url.to_string(),
            reason,
        };

        RelayUrl::parse(url).map_err(|e| refused(e.to_string()))?;

        let client = Client::default();
        client
            .add_relay(url)
            .await
            .map_err(|e| refused(e.to_string()))?;

        let output = client.try_connect(timeout).await;
        if output.success.is_empty() {
            let reason = output
                .failed
                .into_values()
                .next()
                .unwrap_or_else(|| format!("no connection within {timeout:?}"));
            warn!("Relay {} unreachable: {}", url, reason);
            client.disconnect().await;
            return Err(refused(reason));
        }
        info!("Relay client connected to {}", url);

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The relay handle, provided it is still connected.
    async fn connected_relay(&self) -> Result<Relay, TransportError> {
        let refused = |reason: String| TransportError::ConnectionRefused {
            endpoint: self.url.clone(),
            reason,
        };
        let relay = self
            .client
            .relay(self.url.as_str())
            .await
            .map_err(|e| refused(e.to_string()))?;
        if !relay.is_connected() {
            return Err(refused(format!("relay is {:?}", relay.status())));
        }
        Ok(relay)
    }
}

#[async_trait]
impl Transport for RelayClient {
    async fn query(&self, filter: &Filter, timeout: Duration) -> Result<Vec<Event>, TransportError> {
        self.connected_relay().await?;
        let sdk_filter = to_sdk_filter(filter)?;
        let events = self
            .client
            .fetch_events(sdk_filter, timeout)
            .await
            .map_err(|e| TransportError::Protocol(e.to_string()))?;
        debug!("Fetched {} event(s) from {}", events.len(), self.url);
        events.iter().map(from_sdk_event).collect()
    }

    async fn publish(&self, event: &Event) -> Result<String, TransportError> {
        self.connected_relay().await?;
        let event = to_sdk_event(event)?;
        let output = self
            .client
            .send_event(&event)
            .await
            .map_err(|e| TransportError::Protocol(e.to_string()))?;

        if output.success.is_empty() {
            let reasons: Vec<String> = output
                .failed
                .iter()
                .map(|(relay, reason)| format!("{relay}: {reason}"))
                .collect();
            return Err(TransportError::Protocol(format!(
                "event {} rejected ({})",
                output.val,
                reasons.join("; ")
            )));
        }
        Ok(output.val.to_hex())
    }
}
