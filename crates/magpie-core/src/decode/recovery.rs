//! Recovery parsing for incrementally-delivered JSON
//!
//! Model output arrives truncated at arbitrary points and often wrapped in a
//! markdown code fence. `recover_parse` strips the fence, tries a strict
//! parse, and on failure makes one bounded repair pass before retrying once.
//! `None` means "nothing parseable yet", never an error: later, longer input
//! is expected to succeed.

use serde::de::DeserializeOwned;

const FENCE: &str = "```";
const FENCE_TAG: &str = "json";

/// Attempt to produce a typed value from accumulated stream content.
pub fn recover_parse<T: DeserializeOwned>(buffer: &str) -> Option<T> {
    let content = strip_fences(buffer);
    if content.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str(content) {
        return Some(value);
    }
    serde_json::from_str(&repair(content)).ok()
}

/// Remove markdown fence decoration around `content`.
///
/// Handles a complete fence, an opening fence whose closing counterpart has
/// not arrived, and the degenerate early-stream case where the language tag
/// flushed before its backticks.
fn strip_fences(content: &str) -> &str {
    let mut content = content.trim();
    if let Some(rest) = content.strip_prefix(FENCE) {
        // Language tag, if any, sits directly after the backticks
        let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        content = rest.trim_start();
    } else if let Some(rest) = content.strip_prefix(FENCE_TAG) {
        if rest.starts_with(char::is_whitespace) {
            content = rest.trim_start();
        }
    }
    if let Some(rest) = content.strip_suffix(FENCE) {
        content = rest.trim_end();
    }
    content
}

/// Scanner states for walking JSON text with string-literal awareness.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    Normal,
    InString,
    Escaped,
}

/// What one scan pass learned about a possibly-truncated document.
struct ScanReport {
    /// Still-open containers, outermost first.
    open: Vec<char>,
    /// The text ends inside a string literal.
    in_string: bool,
    /// Byte offset of a separator comma followed only by whitespace and
    /// closing brackets, if any.
    dangling_comma: Option<usize>,
}

/// Walk `content` once, tracking string boundaries so that braces, brackets,
/// quotes, and commas inside string literals are never mistaken for
/// structure.
fn scan(content: &str) -> ScanReport {
    let mut state = ScanState::Normal;
    let mut open = Vec::new();
    let mut dangling_comma = None;

    for (pos, ch) in content.char_indices() {
        match state {
            ScanState::Normal => match ch {
                '"' => {
                    state = ScanState::InString;
                    dangling_comma = None;
                }
                '{' | '[' => {
                    open.push(ch);
                    dangling_comma = None;
                }
                '}' | ']' => {
                    let opener = if ch == '}' { '{' } else { '[' };
                    if open.last() == Some(&opener) {
                        open.pop();
                    }
                }
                ',' => dangling_comma = Some(pos),
                c if c.is_whitespace() => {}
                _ => dangling_comma = None,
            },
            ScanState::InString => match ch {
                '\\' => state = ScanState::Escaped,
                '"' => state = ScanState::Normal,
                _ => {}
            },
            ScanState::Escaped => state = ScanState::InString,
        }
    }

    ScanReport {
        open,
        in_string: state != ScanState::Normal,
        dangling_comma,
    }
}

/// One bounded repair pass. A single scan decides everything: a dangling
/// separator comma is dropped, an unterminated string literal is closed,
/// then still-open containers are closed innermost-first.
fn repair(content: &str) -> String {
    let report = scan(content);

    let mut repaired = String::with_capacity(content.len() + report.open.len() + 1);
    match report.dangling_comma {
        Some(pos) => {
            repaired.push_str(&content[..pos]);
            repaired.push_str(&content[pos + 1..]);
        }
        None => repaired.push_str(content),
    }
    if report.in_string {
        repaired.push('"');
    }
    for opener in report.open.iter().rev() {
        repaired.push(if *opener == '{' { '}' } else { ']' });
    }
    repaired
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_strict_parse_passthrough() {
        let parsed: Option<Value> = recover_parse("{\"word\": \"cache\", \"score\": 3}");
        assert_eq!(parsed, Some(json!({"word": "cache", "score": 3})));
    }

    #[test]
    fn test_empty_and_whitespace_yield_nothing() {
        assert_eq!(recover_parse::<Value>(""), None);
        assert_eq!(recover_parse::<Value>("  \n\n  "), None);
    }

    #[test]
    fn test_complete_fence_stripped() {
        let parsed: Option<Value> = recover_parse("```json\n{\"a\": 1}\n```");
        assert_eq!(parsed, Some(json!({"a": 1})));
    }

    #[test]
    fn test_fence_without_language_tag() {
        let parsed: Option<Value> = recover_parse("```\n{\"a\": 1}\n```\n");
        assert_eq!(parsed, Some(json!({"a": 1})));
    }

    #[test]
    fn test_unclosed_fence_stripped() {
        let parsed: Option<Value> = recover_parse("```json\n{\"a\": 1}");
        assert_eq!(parsed, Some(json!({"a": 1})));
    }

    #[test]
    fn test_bare_language_tag_stripped() {
        // The opening backticks can lag behind their tag by a chunk
        let parsed: Option<Value> = recover_parse("json\n{\"a\": 1}");
        assert_eq!(parsed, Some(json!({"a": 1})));
    }

    #[test]
    fn test_bare_language_tag_alone_is_not_content() {
        assert_eq!(recover_parse::<Value>("json"), None);
        assert_eq!(recover_parse::<Value>("```json"), None);
        assert_eq!(recover_parse::<Value>("```"), None);
    }

    #[test]
    fn test_trailing_comma_at_end_removed() {
        let parsed: Option<Value> = recover_parse("{\"a\": 1,");
        assert_eq!(parsed, Some(json!({"a": 1})));
    }

    #[test]
    fn test_trailing_comma_before_closer_removed() {
        let parsed: Option<Value> = recover_parse("{\"a\": 1, \"b\": 2,}");
        assert_eq!(parsed, Some(json!({"a": 1, "b": 2})));

        let parsed: Option<Value> = recover_parse("[1, 2, 3, ]");
        assert_eq!(parsed, Some(json!([1, 2, 3])));
    }

    #[test]
    fn test_unterminated_string_closed() {
        let parsed: Option<Value> = recover_parse("{\"word\": \"nich");
        assert_eq!(parsed, Some(json!({"word": "nich"})));
    }

    #[test]
    fn test_unterminated_string_with_escaped_quote() {
        let parsed: Option<Value> = recover_parse("{\"quote\": \"say \\\"hi");
        assert_eq!(parsed, Some(json!({"quote": "say \"hi"})));
    }

    #[test]
    fn test_unclosed_containers_closed_in_nesting_order() {
        let parsed: Option<Value> = recover_parse("{\"a\": [1, {\"b\": [2");
        assert_eq!(parsed, Some(json!({"a": [1, {"b": [2]}]})));
    }

    #[test]
    fn test_brackets_inside_strings_are_not_structure() {
        // Naive bracket counting would append three closers here
        let parsed: Option<Value> = recover_parse("{\"a\": \"[[[\", \"b\": 1");
        assert_eq!(parsed, Some(json!({"a": "[[[", "b": 1})));

        let parsed: Option<Value> = recover_parse("{\"a\": \"}}\"");
        assert_eq!(parsed, Some(json!({"a": "}}"})));
    }

    #[test]
    fn test_comma_inside_string_preserved() {
        let parsed: Option<Value> = recover_parse("{\"a\": \"one, two,");
        assert_eq!(parsed, Some(json!({"a": "one, two,"})));
    }

    #[test]
    fn test_multibyte_content_survives_repair() {
        let parsed: Option<Value> = recover_parse("{\"ipa\": \"/juːˈbɪk");
        assert_eq!(parsed, Some(json!({"ipa": "/juːˈbɪk"})));
    }

    #[test]
    fn test_unreparable_truncation_yields_nothing() {
        // Cut after a key's colon: no value to close, nothing to emit yet
        assert_eq!(recover_parse::<Value>("{\"a\":"), None);
        // Cut inside a keyword literal
        assert_eq!(recover_parse::<Value>("{\"a\": tru"), None);
        // Not JSON at all
        assert_eq!(recover_parse::<Value>("service warming up"), None);
    }

    #[test]
    fn test_truncation_sweep_never_panics() {
        let doc = "```json\n{\"word\": \"ubiquitous\", \"pronunciation\": \
                   {\"ipa\": \"/juːˈbɪkwɪtəs/\"}, \"meanings\": [{\"context\": \"General\", \
                   \"example\": \"it said \\\"hi\\\", twice\"}, {\"context\": \"[Tech]\"}], \
                   \"synonyms\": [\"common\", \"everywhere\"]}\n```";
        let full: Value = recover_parse(doc).expect("complete document parses");

        let mut recovered = 0;
        for end in (0..=doc.len()).filter(|i| doc.is_char_boundary(*i)) {
            if recover_parse::<Value>(&doc[..end]).is_some() {
                recovered += 1;
            }
        }
        // Many prefixes repair into valid documents, and the last one is
        // exactly the full parse
        assert!(recovered > 20);
        assert_eq!(recover_parse::<Value>(doc), Some(full));
    }
}
