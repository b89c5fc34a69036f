//! Streaming lookups
//!
//! Opens the backend's streaming endpoint and drives a decode session with
//! the response bytes until the session reaches a terminal state.

use futures::StreamExt;
use tracing::{debug, info, warn};

use super::{check_status, LookupClient, LookupError};
use crate::decode::{DecodeObserver, DecodeSession};
use crate::vocab::{self, PartialWordDefinition};

impl LookupClient {
    /// Stream a word's definition, pushing progressive updates into
    /// `observer`.
    ///
    /// The update hook fires zero or more times, then exactly one of the
    /// completion or error hooks fires. Returns once the session is
    /// terminal; dropping the future abandons the lookup.
    pub async fn stream_definition<O>(&self, word: &str, mut observer: O)
    where
        O: DecodeObserver<PartialWordDefinition>,
    {
        let word = vocab::normalize_word(word);
        if word.is_empty() {
            observer.on_error(LookupError::EmptyWord.to_string());
            return;
        }

        let response = match self.open_stream(&word).await {
            Ok(response) => response,
            Err(err) => {
                warn!("stream lookup for {:?} failed to start: {}", word, err);
                observer.on_error(err.to_string());
                return;
            }
        };

        info!("stream lookup started for {:?}", word);
        let mut session = DecodeSession::<PartialWordDefinition, O>::new(observer);
        let mut carry = Utf8Carry::default();
        let mut body = response.bytes_stream();

        while let Some(next) = body.next().await {
            match next {
                Ok(bytes) => session.feed(&carry.decode(&bytes)),
                Err(err) => {
                    // Treat a dying transport as premature end of stream and
                    // salvage whatever already arrived
                    warn!("stream lookup for {:?} read error: {}", word, err);
                    break;
                }
            }
            if session.is_terminal() {
                break;
            }
        }
        session.finish();
    }

    async fn open_stream(&self, word: &str) -> Result<reqwest::Response, LookupError> {
        let url = self.config().stream_url()?;
        debug!("opening lookup stream for {:?} at {}", word, url);
        let response = self
            .http()
            .post(url)
            .json(&serde_json::json!({ "word": word }))
            .send()
            .await?;
        check_status(response)
    }
}

/// Buffers a trailing incomplete UTF-8 sequence across chunk boundaries, so
/// a codepoint split by the transport decodes once its tail arrives.
#[derive(Debug, Default)]
struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                let text = text.to_string();
                self.pending.clear();
                text
            }
            Err(err) if err.error_len().is_none() => {
                // Clean split: emit the valid prefix, hold the tail
                let valid_up_to = err.valid_up_to();
                let text = String::from_utf8_lossy(&self.pending[..valid_up_to]).into_owned();
                self.pending.drain(..valid_up_to);
                text
            }
            Err(_) => {
                // Genuinely invalid bytes: replace them and move on
                let text = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                text
            }
        }
    }
}
