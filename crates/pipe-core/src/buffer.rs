//! The serialization boundary between pipeline stages.
//!
//! An [`EventBuffer`] holds either a typed [`EventCollection`] produced
//! in-process or raw bytes received from elsewhere (a file, a socket). The
//! canonical encoding is `{"events":[...]}` and is produced at most once per
//! buffer. An empty collection encodes to zero bytes.

use crate::error::DecodeError;
use crate::event::EventCollection;
use std::io::{self, Read};
use std::sync::OnceLock;

/// Replayable handoff value between stages.
#[derive(Debug, Clone, Default)]
pub struct EventBuffer {
    events: Option<EventCollection>,
    encoded: OnceLock<Vec<u8>>,
}

impl EventBuffer {
    /// Wrap a typed collection. Encoding is deferred until first needed.
    pub fn from_events(events: EventCollection) -> Self {
        Self {
            events: Some(events),
            encoded: OnceLock::new(),
        }
    }

    /// Wrap bytes produced outside this process. Nothing is decoded until
    /// [`to_events`](Self::to_events) is called.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            events: None,
            encoded: OnceLock::from(bytes),
        }
    }

    /// Drain `reader` into a new buffer.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::from_bytes(bytes))
    }

    /// The memoized canonical encoding.
    pub fn as_bytes(&self) -> &[u8] {
        self.encoded.get_or_init(|| match &self.events {
            Some(events) => encode(events),
            None => Vec::new(),
        })
    }

    /// A fresh cursor over the encoding. Each call starts at byte zero.
    pub fn as_stream(&self) -> BufferReader<'_> {
        BufferReader {
            bytes: self.as_bytes(),
            pos: 0,
        }
    }

    /// Decode the full encoding.
    pub fn to_events(&self) -> Result<EventCollection, DecodeError> {
        decode(self.as_bytes())
    }

    /// The typed collection, when this buffer was built in-process.
    pub fn events(&self) -> Option<&EventCollection> {
        self.events.as_ref()
    }

    /// Take the typed collection, decoding only if the buffer holds raw bytes.
    pub fn into_events(self) -> Result<EventCollection, DecodeError> {
        match self.events {
            Some(events) => Ok(events),
            None => decode(self.as_bytes()),
        }
    }
}

/// Cursor over a buffer's encoding. Reads past the end return `Ok(0)`.
#[derive(Debug)]
pub struct BufferReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl BufferReader<'_> {
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

impl Read for BufferReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let rest = &self.bytes[self.pos..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }
}

fn encode(events: &EventCollection) -> Vec<u8> {
    if events.is_empty() {
        return Vec::new();
    }
    serde_json::to_vec(events).expect("event collection is always serializable")
}

/// Decode a canonical encoding. Whitespace-only input is an empty collection;
/// anything else must be exactly one well-formed document.
pub fn decode(bytes: &[u8]) -> Result<EventCollection, DecodeError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(EventCollection::default());
    }
    serde_json::from_slice(bytes).map_err(|e| DecodeError {
        offset: byte_offset(bytes, e.line(), e.column()),
        message: e.to_string(),
    })
}

/// Convert serde_json's 1-based line/column position into a byte offset.
fn byte_offset(bytes: &[u8], line: usize, column: usize) -> usize {
    let line_start = bytes
        .split_inclusive(|b| *b == b'\n')
        .take(line.saturating_sub(1))
        .map(<[u8]>::len)
        .sum::<usize>();
    (line_start + column.saturating_sub(1)).min(bytes.len())
}
