//! Progressive structured-output decoding
//!
//! Turns the chunked text stream produced by the lookup backend into a
//! sequence of increasingly-complete typed values: [`sse`] splits transport
//! text into frames, [`recovery`] turns a truncated JSON buffer into the
//! best parseable value available, and [`session`] orchestrates the two and
//! notifies an observer on every structural change.

pub mod recovery;
pub mod session;
pub mod sse;

pub use recovery::recover_parse;
pub use session::{DecodeEvent, DecodeObserver, DecodeSession};
pub use sse::{Frame, FrameSplitter};
