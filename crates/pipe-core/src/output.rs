//! Rendering stage results for the output sink.
//!
//! Results are rendered completely into memory before anything reaches the
//! sink, so a failed render writes nothing.

use crate::aggregate::FrequencyMap;
use crate::buffer::EventBuffer;
use crate::error::DecodeError;
use crate::publish::PublishReport;
use crate::sort::SortedEntry;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    /// Line oriented, e.g. `key: count`.
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// A stage value that can be written to the output sink.
pub trait Render {
    fn render(&self, format: OutputFormat) -> Result<Vec<u8>, DecodeError>;
}

fn json_line<T: serde::Serialize + ?Sized>(value: &T) -> Vec<u8> {
    let mut out = serde_json::to_vec(value).expect("stage output is always serializable");
    out.push(b'\n');
    out
}

fn counted_lines<'a>(entries: impl Iterator<Item = (&'a str, u64)>) -> Vec<u8> {
    let mut out = String::new();
    for (key, count) in entries {
        let _ = writeln!(out, "{key}: {count}");
    }
    out.into_bytes()
}

impl Render for EventBuffer {
    fn render(&self, format: OutputFormat) -> Result<Vec<u8>, DecodeError> {
        match format {
            OutputFormat::Json => {
                if self.events().is_none() {
                    self.to_events()?;
                }
                let bytes = self.as_bytes();
                if bytes.is_empty() {
                    return Ok(Vec::new());
                }
                let mut out = bytes.to_vec();
                out.push(b'\n');
                Ok(out)
            }
            OutputFormat::Text => {
                let decoded;
                let events = match self.events() {
                    Some(events) => events,
                    None => {
                        decoded = self.to_events()?;
                        &decoded
                    }
                };
                let mut out = String::new();
                for event in events {
                    let _ = writeln!(
                        out,
                        "{}\t{}\t{}",
                        event.id,
                        event.kind,
                        event.title().unwrap_or_default()
                    );
                }
                Ok(out.into_bytes())
            }
        }
    }
}

impl Render for FrequencyMap {
    fn render(&self, format: OutputFormat) -> Result<Vec<u8>, DecodeError> {
        Ok(match format {
            OutputFormat::Json => json_line(self),
            OutputFormat::Text => counted_lines(self.iter()),
        })
    }
}

impl Render for Vec<SortedEntry> {
    fn render(&self, format: OutputFormat) -> Result<Vec<u8>, DecodeError> {
        Ok(match format {
            OutputFormat::Json => json_line(self),
            OutputFormat::Text => counted_lines(self.iter().map(|e| (e.key.as_str(), e.count))),
        })
    }
}

impl Render for Vec<String> {
    fn render(&self, format: OutputFormat) -> Result<Vec<u8>, DecodeError> {
        Ok(match format {
            OutputFormat::Json => json_line(self),
            OutputFormat::Text => {
                let mut out = String::new();
                for line in self {
                    let _ = writeln!(out, "{line}");
                }
                out.into_bytes()
            }
        })
    }
}

impl Render for PublishReport {
    fn render(&self, format: OutputFormat) -> Result<Vec<u8>, DecodeError> {
        Ok(match format {
            OutputFormat::Json => json_line(self),
            OutputFormat::Text => {
                let mut out = String::new();
                for entry in &self.published {
                    let _ = writeln!(out, "{} -> {}", entry.source_id, entry.id);
                }
                out.into_bytes()
            }
        })
    }
}
