//! Per-run pipeline context.
//!
//! One [`PipelineContext`] is built per run and borrowed by every stage, so
//! the relay handle and output sink cannot be dropped between stages.

use crate::error::TransportError;
use crate::output::OutputFormat;
use parking_lot::Mutex;
use std::future::Future;
use std::io::Write;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default bound on a single transport call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout plus cancellation applied to every blocking transport call.
#[derive(Debug, Clone)]
pub struct Deadline {
    timeout: Duration,
    cancel: CancellationToken,
}

impl Deadline {
    pub fn new(timeout: Duration, cancel: CancellationToken) -> Self {
        Self { timeout, cancel }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Drive `call` to completion unless the timeout elapses or the token is
    /// cancelled first. No retry.
    pub async fn run<F, R>(&self, call: F) -> Result<R, TransportError>
    where
        F: Future<Output = Result<R, TransportError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(TransportError::Cancelled),
            res = tokio::time::timeout(self.timeout, call) => {
                res.unwrap_or(Err(TransportError::Timeout(self.timeout)))
            }
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, CancellationToken::new())
    }
}

pub struct PipelineContext<T> {
    transport: T,
    deadline: Deadline,
    sink: Mutex<Box<dyn Write + Send>>,
    format: OutputFormat,
}

impl<T> PipelineContext<T> {
    /// Context writing JSON to stdout with [`DEFAULT_TIMEOUT`].
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            deadline: Deadline::default(),
            sink: Mutex::new(Box::new(std::io::stdout())),
            format: OutputFormat::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Deadline::new(timeout, self.deadline.cancel);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.deadline = Deadline::new(self.deadline.timeout, cancel);
        self
    }

    pub fn with_sink<W: Write + Send + 'static>(mut self, sink: W) -> Self {
        self.sink = Mutex::new(Box::new(sink));
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn deadline(&self) -> &Deadline {
        &self.deadline
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write one fully rendered result to the sink.
    pub fn write_output(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut sink = self.sink.lock();
        sink.write_all(bytes)?;
        sink.flush()
    }
}
