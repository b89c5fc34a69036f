//! Vocabulary domain types
//!
//! The word definition schema shared by the lookup client and the decoder.

pub mod types;

pub use types::{
    CommonMistake, PartialCommonMistake, PartialPronunciation, PartialSynonym,
    PartialWordDefinition, PartialWordMeaning, PartialWordStructure, Pronunciation, Synonym,
    WordDefinition, WordMeaning, WordStructure,
};

/// Normalize a word for lookup: surrounding whitespace removed, lowercased.
///
/// The backend applies the same rule before caching, so normalizing here
/// keeps client-side and server-side keys in agreement.
pub fn normalize_word(raw: &str) -> String {
    raw.trim().to_lowercase()
}
