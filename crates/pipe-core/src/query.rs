//! Query executor: the fetch stage.

use crate::buffer::EventBuffer;
use crate::context::PipelineContext;
use crate::error::TransportError;
use crate::event::EventCollection;
use crate::filter::Filter;
use crate::transport::Transport;
use tracing::{debug, info};

/// Run `filter` against the context's transport and wrap the result, in
/// relay order, in a buffer for the next stage.
///
/// Transport failures, timeouts and cancellation surface unchanged; there
/// is no retry and no partial result.
pub async fn execute<T: Transport>(
    ctx: &PipelineContext<T>,
    filter: &Filter,
) -> Result<EventBuffer, TransportError> {
    debug!(filter = %filter.to_json(), "Submitting query");
    let deadline = ctx.deadline();
    let events = deadline
        .run(ctx.transport().query(filter, deadline.timeout()))
        .await?;
    info!("Query returned {} event(s)", events.len());
    Ok(EventBuffer::from_events(EventCollection::from(events)))
}
