//! Core library for Magpie
//!
//! Decodes the incrementally-delivered output of the vocabulary backend into
//! progressively-more-complete word definitions:
//!
//! - SSE frame demultiplexing with partial-line buffering
//! - Recovery parsing: fence stripping plus bounded repair of truncated JSON
//! - Change-detected emission, so consumers only see structural updates
//! - Streaming and one-shot lookup clients over the backend's HTTP API

pub mod client;
pub mod decode;
pub mod vocab;

pub use client::{LookupClient, LookupConfig, LookupError};
pub use decode::{DecodeEvent, DecodeObserver, DecodeSession, Frame, FrameSplitter};
pub use vocab::{normalize_word, PartialWordDefinition, WordDefinition};
