//! Word definition schema
//!
//! Two parallel shapes: the complete record the backend returns from a
//! finished lookup, and a deep-partial counterpart for definitions that are
//! still streaming. Every field of the partial shape is optional, because a
//! truncated response can cut inside any nested object; nested records and
//! list elements get partial variants too.

use serde::{Deserialize, Serialize};

/// Pronunciation information for a word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pronunciation {
    /// IPA phonetic transcription
    pub ipa: String,
    /// Syllable breakdown
    pub phonetic_breakdown: String,
    /// Oxford respelling
    pub oxford_respelling: String,
}

/// Word structure analysis (prefix, root, suffix)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStructure {
    pub prefix: Option<String>,
    pub prefix_meaning: Option<String>,
    pub root: String,
    pub root_meaning: String,
    pub suffix: Option<String>,
    pub suffix_meaning: Option<String>,
}

/// A specific meaning of a word in context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordMeaning {
    /// Context or domain for this meaning
    pub context: String,
    pub meaning: String,
    /// Example sentence
    pub example: String,
}

/// Synonym with interchangeability guidance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Synonym {
    pub word: String,
    pub meaning: String,
    /// When to use this synonym
    pub context: String,
    /// "yes", "sometimes", or "no"
    pub interchangeable: String,
}

/// A common mistake learners make with the word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonMistake {
    pub incorrect: String,
    /// What is wrong with the incorrect usage
    pub issue: String,
    pub correct: String,
}

/// Comprehensive word definition, as returned by a completed lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDefinition {
    pub word: String,
    /// Part of speech (noun, verb, etc.)
    pub part_of_speech: String,
    pub definition: String,
    pub pronunciation: Pronunciation,
    pub word_structure: WordStructure,
    /// Origin and history of the word
    pub etymology: String,
    pub meanings: Vec<WordMeaning>,
    /// Common word combinations
    pub collocations: Vec<String>,
    pub synonyms: Vec<Synonym>,
    /// Helpful tip for remembering the word
    pub learning_tip: String,
    /// Visual memory aid
    pub visual_trick: String,
    /// Memorable phrase using the word
    pub memory_phrase: String,
    pub common_mistakes: Option<Vec<CommonMistake>>,
}

/// [`Pronunciation`] while still streaming
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialPronunciation {
    pub ipa: Option<String>,
    pub phonetic_breakdown: Option<String>,
    pub oxford_respelling: Option<String>,
}

/// [`WordStructure`] while still streaming
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialWordStructure {
    pub prefix: Option<String>,
    pub prefix_meaning: Option<String>,
    pub root: Option<String>,
    pub root_meaning: Option<String>,
    pub suffix: Option<String>,
    pub suffix_meaning: Option<String>,
}

/// [`WordMeaning`] while still streaming
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialWordMeaning {
    pub context: Option<String>,
    pub meaning: Option<String>,
    pub example: Option<String>,
}

/// [`Synonym`] while still streaming
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSynonym {
    pub word: Option<String>,
    pub meaning: Option<String>,
    pub context: Option<String>,
    pub interchangeable: Option<String>,
}

/// [`CommonMistake`] while still streaming
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialCommonMistake {
    pub incorrect: Option<String>,
    pub issue: Option<String>,
    pub correct: Option<String>,
}

/// Deep-partial [`WordDefinition`]: what the decoder can show while the
/// response is still arriving. Safe to render at any time; absent fields
/// simply have not streamed in yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialWordDefinition {
    pub word: Option<String>,
    pub part_of_speech: Option<String>,
    pub definition: Option<String>,
    pub pronunciation: Option<PartialPronunciation>,
    pub word_structure: Option<PartialWordStructure>,
    pub etymology: Option<String>,
    pub meanings: Option<Vec<PartialWordMeaning>>,
    pub collocations: Option<Vec<String>>,
    pub synonyms: Option<Vec<PartialSynonym>>,
    pub learning_tip: Option<String>,
    pub visual_trick: Option<String>,
    pub memory_phrase: Option<String>,
    pub common_mistakes: Option<Vec<PartialCommonMistake>>,
}

impl PartialPronunciation {
    fn finalize(self) -> Pronunciation {
        Pronunciation {
            ipa: self.ipa.unwrap_or_default(),
            phonetic_breakdown: self.phonetic_breakdown.unwrap_or_default(),
            oxford_respelling: self.oxford_respelling.unwrap_or_default(),
        }
    }
}

impl PartialWordStructure {
    fn finalize(self) -> WordStructure {
        WordStructure {
            prefix: self.prefix,
            prefix_meaning: self.prefix_meaning,
            root: self.root.unwrap_or_default(),
            root_meaning: self.root_meaning.unwrap_or_default(),
            suffix: self.suffix,
            suffix_meaning: self.suffix_meaning,
        }
    }
}

impl PartialWordMeaning {
    fn finalize(self) -> WordMeaning {
        WordMeaning {
            context: self.context.unwrap_or_else(|| "General".to_string()),
            meaning: self.meaning.unwrap_or_default(),
            example: self.example.unwrap_or_default(),
        }
    }
}

impl PartialSynonym {
    fn finalize(self) -> Synonym {
        Synonym {
            word: self.word.unwrap_or_default(),
            meaning: self.meaning.unwrap_or_default(),
            context: self.context.unwrap_or_default(),
            interchangeable: self.interchangeable.unwrap_or_else(|| "sometimes".to_string()),
        }
    }
}

impl PartialCommonMistake {
    fn finalize(self) -> CommonMistake {
        CommonMistake {
            incorrect: self.incorrect.unwrap_or_default(),
            issue: self.issue.unwrap_or_default(),
            correct: self.correct.unwrap_or_default(),
        }
    }
}

impl PartialWordDefinition {
    /// Promote a best-effort partial to a complete record.
    ///
    /// Applies the same defaults the backend's validation pass applies
    /// (missing text becomes empty, part of speech becomes "unknown",
    /// synonym interchangeability becomes "sometimes", an empty mistake
    /// list becomes absent) and forces the `word` field to the word that
    /// was actually queried, which the model sometimes restates wrongly.
    pub fn finalize(self, word: &str) -> WordDefinition {
        let common_mistakes: Vec<CommonMistake> = self
            .common_mistakes
            .unwrap_or_default()
            .into_iter()
            .map(PartialCommonMistake::finalize)
            .collect();

        WordDefinition {
            word: word.to_string(),
            part_of_speech: self.part_of_speech.unwrap_or_else(|| "unknown".to_string()),
            definition: self.definition.unwrap_or_default(),
            pronunciation: self.pronunciation.unwrap_or_default().finalize(),
            word_structure: self.word_structure.unwrap_or_default().finalize(),
            etymology: self.etymology.unwrap_or_default(),
            meanings: self
                .meanings
                .unwrap_or_default()
                .into_iter()
                .map(PartialWordMeaning::finalize)
                .collect(),
            collocations: self.collocations.unwrap_or_default(),
            synonyms: self
                .synonyms
                .unwrap_or_default()
                .into_iter()
                .map(PartialSynonym::finalize)
                .collect(),
            learning_tip: self.learning_tip.unwrap_or_default(),
            visual_trick: self.visual_trick.unwrap_or_default(),
            memory_phrase: self.memory_phrase.unwrap_or_default(),
            common_mistakes: if common_mistakes.is_empty() {
                None
            } else {
                Some(common_mistakes)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_parses_with_missing_fields() {
        let partial: PartialWordDefinition = serde_json::from_str(r#"{"word": "cache"}"#).unwrap();
        assert_eq!(partial.word.as_deref(), Some("cache"));
        assert_eq!(partial.part_of_speech, None);
        assert_eq!(partial.meanings, None);
    }

    #[test]
    fn test_partial_parses_nested_partial_objects() {
        let json = r#"{
            "word": "ubiquitous",
            "pronunciation": {"ipa": "/juːˈbɪkwɪtəs/"},
            "meanings": [{"context": "technology"}]
        }"#;
        let partial: PartialWordDefinition = serde_json::from_str(json).unwrap();
        let pron = partial.pronunciation.unwrap();
        assert_eq!(pron.ipa.as_deref(), Some("/juːˈbɪkwɪtəs/"));
        assert_eq!(pron.phonetic_breakdown, None);
        let meanings = partial.meanings.unwrap();
        assert_eq!(meanings.len(), 1);
        assert_eq!(meanings[0].context.as_deref(), Some("technology"));
        assert_eq!(meanings[0].example, None);
    }

    #[test]
    fn test_partial_uses_camel_case_wire_names() {
        let partial: PartialWordDefinition =
            serde_json::from_str(r#"{"partOfSpeech": "noun", "learningTip": "think of caches"}"#)
                .unwrap();
        assert_eq!(partial.part_of_speech.as_deref(), Some("noun"));
        assert_eq!(partial.learning_tip.as_deref(), Some("think of caches"));
    }

    #[test]
    fn test_complete_definition_parses_and_ignores_extras() {
        // "source" is a response envelope tag the backend adds; the schema
        // does not carry it.
        let json = r#"{
            "word": "cache",
            "partOfSpeech": "noun",
            "definition": "a hidden store of things",
            "pronunciation": {"ipa": "/kæʃ/", "phoneticBreakdown": "cache", "oxfordRespelling": "kash"},
            "wordStructure": {"prefix": null, "prefixMeaning": null, "root": "cache", "rootMeaning": "to hide", "suffix": null, "suffixMeaning": null},
            "etymology": "from French cacher",
            "meanings": [{"context": "computing", "meaning": "fast auxiliary memory", "example": "The cache was flushed."}],
            "collocations": ["cache hit", "cache miss"],
            "synonyms": [{"word": "hoard", "meaning": "a hidden stock", "context": "informal", "interchangeable": "sometimes"}],
            "learningTip": "cash you can't spend",
            "visualTrick": "a squirrel's stash",
            "memoryPhrase": "cache in the attic",
            "commonMistakes": null,
            "source": "ai"
        }"#;
        let def: WordDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.word, "cache");
        assert_eq!(def.part_of_speech, "noun");
        assert_eq!(def.meanings.len(), 1);
        assert_eq!(def.common_mistakes, None);
    }

    #[test]
    fn test_finalize_applies_defaults() {
        let def = PartialWordDefinition::default().finalize("ubiquitous");
        assert_eq!(def.word, "ubiquitous");
        assert_eq!(def.part_of_speech, "unknown");
        assert_eq!(def.definition, "");
        assert_eq!(def.pronunciation.ipa, "");
        assert_eq!(def.word_structure.prefix, None);
        assert!(def.meanings.is_empty());
        assert!(def.collocations.is_empty());
        assert_eq!(def.common_mistakes, None);
    }

    #[test]
    fn test_finalize_overrides_word_and_fills_synonym_defaults() {
        let partial = PartialWordDefinition {
            word: Some("Ubiquitus".to_string()), // model misspelt it
            part_of_speech: Some("adjective".to_string()),
            synonyms: Some(vec![PartialSynonym {
                word: Some("omnipresent".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let def = partial.finalize("ubiquitous");
        assert_eq!(def.word, "ubiquitous");
        assert_eq!(def.part_of_speech, "adjective");
        assert_eq!(def.synonyms[0].word, "omnipresent");
        assert_eq!(def.synonyms[0].interchangeable, "sometimes");
    }

    #[test]
    fn test_finalize_drops_empty_mistake_list() {
        let partial = PartialWordDefinition {
            common_mistakes: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(partial.finalize("x").common_mistakes, None);

        let partial = PartialWordDefinition {
            common_mistakes: Some(vec![PartialCommonMistake {
                incorrect: Some("a cache of the problem".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let mistakes = partial.finalize("x").common_mistakes.unwrap();
        assert_eq!(mistakes[0].incorrect, "a cache of the problem");
        assert_eq!(mistakes[0].issue, "");
    }
}
