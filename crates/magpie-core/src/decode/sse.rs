//! SSE frame demultiplexing
//!
//! Splits the raw text stream from the lookup backend into discrete frames:
//! payload lines, the end-of-stream sentinel, and inline error frames.

use serde_json::Value;

/// Marker prefixing every payload line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload value signalling normal end of stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Prefix identifying an inline error frame.
const ERROR_PREFIX: &str = "{\"error\"";

/// Message used when an error frame carries nothing better.
const UNKNOWN_ERROR: &str = "Unknown error";

/// One discrete unit extracted from the streamed transport
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Response content to accumulate
    Payload(String),
    /// Normal end of stream
    Sentinel,
    /// Inline error reported by the backend, with a human-readable message
    Error(String),
}

/// Splits incoming text into frames, buffering the trailing incomplete line
/// across calls so payload lines survive arbitrary chunk boundaries.
#[derive(Debug, Default)]
pub struct FrameSplitter {
    partial_line: String,
}

impl FrameSplitter {
    pub fn new() -> Self {
        Self {
            partial_line: String::new(),
        }
    }

    /// Feed one chunk of text; returns the frames its complete lines yield.
    pub fn feed(&mut self, chunk: &str) -> Vec<Frame> {
        self.partial_line.push_str(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.partial_line.find('\n') {
            let mut line: String = self.partial_line.drain(..=pos).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            if let Some(frame) = classify_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Classify whatever is left when the transport ends without a final
    /// newline.
    pub fn finish(&mut self) -> Option<Frame> {
        if self.partial_line.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.partial_line);
        classify_line(line.trim_end_matches('\r'))
    }
}

/// Classify one complete line. Lines without the payload marker (blank
/// lines, `event:` fields, `:` comments) carry nothing and yield no frame.
fn classify_line(line: &str) -> Option<Frame> {
    let data = line.strip_prefix(DATA_PREFIX)?;
    if data == DONE_SENTINEL {
        return Some(Frame::Sentinel);
    }
    if data.starts_with(ERROR_PREFIX) {
        return Some(Frame::Error(error_message(data)));
    }
    Some(Frame::Payload(data.to_string()))
}

/// Extract the most specific message an error frame offers: a structured
/// `detail` field, then a generic `error` field, then a fixed fallback when
/// the frame does not parse at all.
fn error_message(data: &str) -> String {
    match serde_json::from_str::<Value>(data) {
        Ok(json) => json
            .get("detail")
            .and_then(|d| d.as_str())
            .or_else(|| json.get("error").and_then(|e| e.as_str()))
            .unwrap_or(UNKNOWN_ERROR)
            .to_string(),
        Err(_) => UNKNOWN_ERROR.to_string(),
    }
}
