//! Stage pipeline for bounded Nostr event analytics.
//!
//! Events fetched from a relay flow through stateless stages (filtering,
//! buffering, tag aggregation, sorting, extraction, republishing), each
//! consuming the previous stage's output. This crate holds the event model
//! and the stages; relay transport, signing and NIP-19 encoding sit behind
//! the traits in [`transport`] and [`extract`] and are provided by
//! `pipe-relay`.

pub mod aggregate;
pub mod buffer;
pub mod context;
pub mod error;
pub mod event;
pub mod extract;
pub mod filter;
pub mod output;
pub mod pipeline;
pub mod publish;
pub mod query;
pub mod sort;
pub mod transport;

pub use aggregate::{count_by_key, FrequencyMap};
pub use buffer::{BufferReader, EventBuffer};
pub use context::{Deadline, PipelineContext, DEFAULT_TIMEOUT};
pub use error::{
    ConfigurationError, DecodeError, EncodingError, PipelineError, PublishError, SigningError,
    TransportError,
};
pub use event::{
    Event, EventCollection, Tag, UnsignedEvent, KIND_ARTICLE, KIND_TEXT_NOTE, TAG_HASHTAG, TAG_TITLE,
};
pub use extract::{identifiers, titles, AddressEncoder};
pub use filter::{Filter, DEFAULT_LIMIT};
pub use output::{OutputFormat, Render};
pub use pipeline::Pipeline;
pub use publish::{PublishReport, PublishedEvent, Publisher};
pub use sort::{sort_by_count, sort_by_name, SortOrder, SortedEntry};
pub use transport::{Signer, Transport};
