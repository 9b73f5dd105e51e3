//! Structural heuristic for responses cut off mid-document.
//!
//! This is not a parser. It scans once, tracking string literals so that
//! brackets inside clause text are not counted, and reports the first
//! JSON-specific sign of incompleteness. Missing a truncation is acceptable;
//! the decoder still rejects the document afterwards.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationReason {
    UnbalancedBraces { open: usize, close: usize },
    UnbalancedBrackets { open: usize, close: usize },
    UnterminatedString,
    EndsWithComma,
    EndsWithColon,
    TrailingComma,
}

impl fmt::Display for TruncationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnbalancedBraces { open, close } => {
                write!(f, "{} '{{' vs {} '}}'", open, close)
            }
            Self::UnbalancedBrackets { open, close } => {
                write!(f, "{} '[' vs {} ']'", open, close)
            }
            Self::UnterminatedString => f.write_str("ends inside an open string"),
            Self::EndsWithComma => f.write_str("ends with a comma"),
            Self::EndsWithColon => f.write_str("ends with a colon"),
            Self::TrailingComma => f.write_str("comma directly before a closing bracket"),
        }
    }
}

/// Returns `true` when `text` looks like an incomplete JSON document.
pub fn is_truncated(text: &str) -> bool {
    detect_truncation(text).is_some()
}

/// Like [`is_truncated`], but reports which signal fired.
pub fn detect_truncation(text: &str) -> Option<TruncationReason> {
    let mut braces = (0usize, 0usize);
    let mut brackets = (0usize, 0usize);
    let mut in_string = false;
    let mut escaped = false;
    let mut last_significant: Option<char> = None;
    let mut trailing_comma = false;

    for ch in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
                last_significant = Some('"');
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => braces.0 += 1,
            '}' => braces.1 += 1,
            '[' => brackets.0 += 1,
            ']' => brackets.1 += 1,
            _ => {}
        }
        if matches!(ch, '}' | ']') && last_significant == Some(',') {
            trailing_comma = true;
        }
        if !ch.is_whitespace() {
            last_significant = Some(ch);
        }
    }

    if in_string {
        return Some(TruncationReason::UnterminatedString);
    }
    if braces.0 != braces.1 {
        return Some(TruncationReason::UnbalancedBraces {
            open: braces.0,
            close: braces.1,
        });
    }
    if brackets.0 != brackets.1 {
        return Some(TruncationReason::UnbalancedBrackets {
            open: brackets.0,
            close: brackets.1,
        });
    }
    match last_significant {
        Some(',') => return Some(TruncationReason::EndsWithComma),
        Some(':') => return Some(TruncationReason::EndsWithColon),
        _ => {}
    }
    if trailing_comma {
        return Some(TruncationReason::TrailingComma);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_document_is_not_truncated() {
        let text = r#"{"clauses": [{"id": "c1", "wordIndices": [0, 1]}], "rootClauseId": "c1"}"#;
        assert!(!is_truncated(text));
    }

    #[test]
    fn cut_after_root_id_is_truncated() {
        let text = r#"{"clauses": [{"id": "clause_1"}], "rootClauseId": "clause_1","#;
        assert!(is_truncated(text));
        assert_eq!(
            detect_truncation(text),
            Some(TruncationReason::UnbalancedBraces { open: 2, close: 1 })
        );
    }

    #[test]
    fn unbalanced_brackets_are_reported() {
        let text = r#"{"clauses": [{"id": "c1"}}"#;
        assert_eq!(
            detect_truncation(text),
            Some(TruncationReason::UnbalancedBrackets { open: 1, close: 0 })
        );
    }

    #[test]
    fn brackets_inside_strings_are_ignored() {
        let text = r#"{"greekText": "ἐν ἀρχῇ { [ ", "note": "a \" quoted } brace"}"#;
        assert_eq!(detect_truncation(text), None);
    }

    #[test]
    fn open_string_at_end_is_truncated() {
        let text = r#"{"greekText": "ἐν ἀρχ"#;
        assert_eq!(
            detect_truncation(text),
            Some(TruncationReason::UnterminatedString)
        );
    }

    #[test]
    fn trailing_comma_before_close_is_truncated() {
        assert_eq!(
            detect_truncation(r#"{"a": [1, 2, ], "b": 1}"#),
            Some(TruncationReason::TrailingComma)
        );
        assert_eq!(
            detect_truncation("{\"a\": 1,\n}"),
            Some(TruncationReason::TrailingComma)
        );
    }

    #[test]
    fn balanced_but_ending_with_separator_is_truncated() {
        assert_eq!(
            detect_truncation(r#"{"a": 1},"#),
            Some(TruncationReason::EndsWithComma)
        );
        assert_eq!(
            detect_truncation(r#"{"a": 1} "b":"#),
            Some(TruncationReason::EndsWithColon)
        );
    }

    #[test]
    fn plain_text_is_not_flagged() {
        assert!(!is_truncated("not json at all"));
    }
}
