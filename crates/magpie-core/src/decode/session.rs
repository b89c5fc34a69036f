//! Decode session orchestration
//!
//! Drives demux, accumulation, recovery parsing, and change-detected
//! emission for one streamed lookup. Each lookup gets its own session;
//! nothing is shared between concurrent streams.

use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::recovery::recover_parse;
use super::sse::{Frame, FrameSplitter};

/// Consumer hooks for one decode session.
///
/// The update hook fires zero or more times, then exactly one of the
/// completion or error hooks fires, never both.
pub trait DecodeObserver<T> {
    /// A structurally new partial value was recovered from the buffer.
    fn on_update(&mut self, partial: &T);

    /// The stream ended normally. Carries the final recovery attempt, which
    /// is `None` when the buffer never became parseable.
    fn on_complete(&mut self, result: Option<T>);

    /// The backend reported an error frame, or the transport failed before
    /// producing one.
    fn on_error(&mut self, message: String);
}

impl<T, O: DecodeObserver<T>> DecodeObserver<T> for &mut O {
    fn on_update(&mut self, partial: &T) {
        (**self).on_update(partial);
    }

    fn on_complete(&mut self, result: Option<T>) {
        (**self).on_complete(result);
    }

    fn on_error(&mut self, message: String) {
        (**self).on_error(message);
    }
}

/// Session output for channel-based consumers
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeEvent<T> {
    /// A new partial value
    Update(T),
    /// Normal end of stream with the final result
    Complete(Option<T>),
    /// The session failed with an error message
    Failed(String),
}

/// Sending half of an unbounded channel as an observer. Delivery failures
/// mean the receiver is gone, so they are ignored.
impl<T: Clone> DecodeObserver<T> for mpsc::UnboundedSender<DecodeEvent<T>> {
    fn on_update(&mut self, partial: &T) {
        let _ = self.send(DecodeEvent::Update(partial.clone()));
    }

    fn on_complete(&mut self, result: Option<T>) {
        let _ = self.send(DecodeEvent::Complete(result));
    }

    fn on_error(&mut self, message: String) {
        let _ = self.send(DecodeEvent::Failed(message));
    }
}

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq)]
enum SessionState {
    /// No transport text seen yet
    Init,
    /// Frames are being processed
    Streaming,
    /// Terminal: the stream ended normally
    Done,
    /// Terminal: the session failed
    Failed,
}

/// One streaming decode operation: an isolated buffer, the last emitted
/// snapshot, and the lifecycle state.
///
/// Generic over the partial schema `T` so any deserializable, comparable
/// type can ride the same pipeline.
pub struct DecodeSession<T, O> {
    splitter: FrameSplitter,
    buffer: String,
    last_emitted: Option<T>,
    state: SessionState,
    observer: O,
    payload_frames: usize,
}

impl<T, O> DecodeSession<T, O>
where
    T: DeserializeOwned + PartialEq,
    O: DecodeObserver<T>,
{
    pub fn new(observer: O) -> Self {
        Self {
            splitter: FrameSplitter::new(),
            buffer: String::new(),
            last_emitted: None,
            state: SessionState::Init,
            observer,
            payload_frames: 0,
        }
    }

    /// Feed one chunk of transport text. No-op once the session is terminal.
    pub fn feed(&mut self, chunk: &str) {
        if self.is_terminal() {
            return;
        }
        if self.state == SessionState::Init {
            self.state = SessionState::Streaming;
        }
        let frames = self.splitter.feed(chunk);
        self.process_frames(frames);
    }

    /// The transport ended. Flushes any unterminated trailing line, then
    /// behaves exactly as if a sentinel frame had arrived. No-op if a
    /// sentinel or error frame already made the session terminal.
    pub fn finish(mut self) {
        if self.is_terminal() {
            return;
        }
        let mut frames: Vec<Frame> = self.splitter.finish().into_iter().collect();
        frames.push(Frame::Sentinel);
        self.process_frames(frames);
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, SessionState::Done | SessionState::Failed)
    }

    fn process_frames(&mut self, frames: Vec<Frame>) {
        for frame in frames {
            if self.is_terminal() {
                debug!("ignoring frame after terminal state");
                continue;
            }
            match frame {
                Frame::Payload(content) => self.accumulate(&content),
                Frame::Sentinel => self.complete(),
                Frame::Error(message) => self.fail(message),
            }
        }
    }

    fn accumulate(&mut self, content: &str) {
        self.payload_frames += 1;
        // The transport escapes newlines to keep each payload on one line
        let unescaped = content.replace("\\n", "\n");
        self.buffer.push_str(&unescaped);
        debug!(
            "payload frame {}: {} chars, buffer now {} bytes",
            self.payload_frames,
            content.len(),
            self.buffer.len()
        );
        if let Some(partial) = recover_parse::<T>(&self.buffer) {
            self.emit_if_changed(partial);
        }
    }

    /// Suppress updates that parse to the same value as the previous one, so
    /// consumers only redraw on structural change.
    fn emit_if_changed(&mut self, partial: T) {
        if self.last_emitted.as_ref() == Some(&partial) {
            return;
        }
        self.observer.on_update(&partial);
        self.last_emitted = Some(partial);
    }

    fn complete(&mut self) {
        let result = recover_parse::<T>(&self.buffer);
        info!(
            "decode session complete: {} payload frames, {} bytes, result {}",
            self.payload_frames,
            self.buffer.len(),
            if result.is_some() { "present" } else { "absent" }
        );
        self.state = SessionState::Done;
        self.observer.on_complete(result);
    }

    fn fail(&mut self, message: String) {
        warn!(
            "decode session failed after {} payload frames: {}",
            self.payload_frames, message
        );
        self.state = SessionState::Failed;
        self.observer.on_error(message);
    }
}
