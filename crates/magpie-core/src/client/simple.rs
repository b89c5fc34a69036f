//! Simple (non-streaming) lookups
//!
//! Used when the caller only wants the finished record and progressive
//! updates are overkill.

use serde_json::json;
use tracing::{debug, warn};

use super::{check_status, LookupClient, LookupError};
use crate::vocab::{self, WordDefinition};

impl LookupClient {
    /// Resolve a word in a single request/response exchange.
    ///
    /// Returns the complete definition, or `None` on any failure: network,
    /// status, or schema. Callers that need to distinguish failure classes
    /// should use the streaming path and its error hook.
    pub async fn resolve_definition(&self, word: &str) -> Option<WordDefinition> {
        match self.try_resolve(word).await {
            Ok(definition) => Some(definition),
            Err(err) => {
                warn!("one-shot lookup for {:?} failed: {}", word, err);
                None
            }
        }
    }

    async fn try_resolve(&self, word: &str) -> Result<WordDefinition, LookupError> {
        let word = vocab::normalize_word(word);
        if word.is_empty() {
            return Err(LookupError::EmptyWord);
        }

        let url = self.config().lookup_url()?;
        debug!("one-shot lookup for {:?} at {}", word, url);

        let response = self
            .http()
            .post(url)
            .timeout(self.config().request_timeout)
            .json(&json!({ "word": word }))
            .send()
            .await?;
        let response = check_status(response)?;

        Ok(response.json::<WordDefinition>().await?)
    }
}
