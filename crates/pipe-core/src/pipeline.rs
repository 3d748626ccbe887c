//! The fluent stage chain.
//!
//! A [`Pipeline`] pairs the run's [`PipelineContext`] with the value the
//! previous stage produced. Each stage consumes the pipeline and returns a
//! new one holding its own output, so the context always travels with the
//! data.
//!
//! ```ignore
//! let sorted = Pipeline::new(&ctx)
//!     .authors([author_hex])?
//!     .kinds([KIND_ARTICLE])?
//!     .query()
//!     .await?
//!     .tags("t")?
//!     .sort_by_count()
//!     .emit()?;
//! ```

use crate::aggregate::{count_by_key, FrequencyMap};
use crate::buffer::EventBuffer;
use crate::context::PipelineContext;
use crate::error::{ConfigurationError, PipelineError};
use crate::event::EventCollection;
use crate::extract::{self, AddressEncoder};
use crate::filter::Filter;
use crate::output::Render;
use crate::publish::{PublishReport, Publisher};
use crate::query;
use crate::sort::{sort_by_count, sort_by_name, SortOrder, SortedEntry};
use crate::transport::{Signer, Transport};
use tracing::debug;

pub struct Pipeline<'c, T, S> {
    ctx: &'c PipelineContext<T>,
    stage: S,
}

impl<'c, T, S> Pipeline<'c, T, S> {
    fn advance<N>(self, stage: N) -> Pipeline<'c, T, N> {
        Pipeline {
            ctx: self.ctx,
            stage,
        }
    }

    pub fn context(&self) -> &'c PipelineContext<T> {
        self.ctx
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn into_inner(self) -> S {
        self.stage
    }
}

impl<'c, T, S: Render> Pipeline<'c, T, S> {
    /// Render the current stage in the context's format.
    pub fn render(&self) -> Result<Vec<u8>, PipelineError> {
        Ok(self.stage.render(self.ctx.format())?)
    }

    /// Write the current stage to the context's sink and hand it back.
    ///
    /// The whole result is rendered before the sink is touched.
    pub fn emit(self) -> Result<S, PipelineError> {
        let bytes = self.render()?;
        self.ctx.write_output(&bytes)?;
        Ok(self.stage)
    }

    /// The rendered stage as text.
    pub fn to_string(&self) -> Result<String, PipelineError> {
        let bytes = self.render()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl<'c, T: Transport> Pipeline<'c, T, Filter> {
    /// Start a run with an unconstrained, default-limited filter.
    pub fn new(ctx: &'c PipelineContext<T>) -> Self {
        Self::with_filter(ctx, Filter::new())
    }

    pub fn with_filter(ctx: &'c PipelineContext<T>, filter: Filter) -> Self {
        Pipeline { ctx, stage: filter }
    }

    pub fn authors<I, K>(self, keys: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let filter = self.stage.clone().with_authors(keys)?;
        Ok(self.advance(filter))
    }

    pub fn kinds<I>(self, kinds: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = u16>,
    {
        let filter = self.stage.clone().with_kinds(kinds)?;
        Ok(self.advance(filter))
    }

    pub fn limit(self, limit: usize) -> Result<Self, ConfigurationError> {
        let filter = self.stage.clone().with_limit(limit)?;
        Ok(self.advance(filter))
    }

    /// Fetch matching events from the context's relay.
    pub async fn query(self) -> Result<Pipeline<'c, T, EventBuffer>, PipelineError> {
        let buffer = query::execute(self.ctx, &self.stage).await?;
        Ok(self.advance(buffer))
    }
}

impl<'c, T> Pipeline<'c, T, EventBuffer> {
    /// Resume a run from a buffer produced elsewhere (a file, another process).
    pub fn from_buffer(ctx: &'c PipelineContext<T>, buffer: EventBuffer) -> Self {
        Pipeline { ctx, stage: buffer }
    }

    /// Typed events for the next stage. In-process buffers skip the byte
    /// round trip; byte-backed buffers are decoded in full.
    fn collection(&self) -> Result<std::borrow::Cow<'_, EventCollection>, PipelineError> {
        match self.stage.events() {
            Some(events) => Ok(std::borrow::Cow::Borrowed(events)),
            None => {
                debug!("Decoding {} buffered byte(s)", self.stage.as_bytes().len());
                Ok(std::borrow::Cow::Owned(self.stage.to_events()?))
            }
        }
    }

    /// Count the values of tags keyed `key`.
    pub fn tags(self, key: &str) -> Result<Pipeline<'c, T, FrequencyMap>, PipelineError> {
        if key.is_empty() {
            return Err(ConfigurationError::EmptyTagKey.into());
        }
        let counts = count_by_key(self.collection()?.iter(), key);
        debug!(key, distinct = counts.len(), total = counts.total(), "Aggregated tags");
        Ok(self.advance(counts))
    }

    pub fn titles(self) -> Result<Pipeline<'c, T, Vec<String>>, PipelineError> {
        let titles = extract::titles(self.collection()?.iter());
        Ok(self.advance(titles))
    }

    /// Addressable identifiers for every event.
    pub fn identifiers<E>(self, encoder: &E) -> Result<Pipeline<'c, T, Vec<String>>, PipelineError>
    where
        E: AddressEncoder + ?Sized,
    {
        let ids = extract::identifiers(self.collection()?.iter(), encoder)?;
        Ok(self.advance(ids))
    }

    /// Sign and submit every buffered event through `publisher`.
    ///
    /// The buffer is always decoded from its byte encoding here, so what is
    /// published is exactly what crossed the stage boundary.
    pub async fn publish<P, K>(self, publisher: &Publisher<P, K>) -> Result<PublishReport, PipelineError>
    where
        P: Transport,
        K: Signer,
    {
        let events = self.stage.to_events()?;
        Ok(publisher.publish(&events, self.ctx.deadline()).await?)
    }
}

impl<'c, T> Pipeline<'c, T, FrequencyMap> {
    pub fn sort_by_count(self) -> Pipeline<'c, T, Vec<SortedEntry>> {
        let sorted = sort_by_count(&self.stage);
        self.advance(sorted)
    }

    pub fn sort_by_name(self) -> Pipeline<'c, T, Vec<SortedEntry>> {
        let sorted = sort_by_name(&self.stage);
        self.advance(sorted)
    }

    pub fn sort(self, order: SortOrder) -> Pipeline<'c, T, Vec<SortedEntry>> {
        let sorted = order.apply(&self.stage);
        self.advance(sorted)
    }
}
