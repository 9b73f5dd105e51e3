//! Best-effort normalization of raw generator output into a JSON candidate.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FENCE_OPEN: Regex = Regex::new(r"```(?:json|JSON)?[ \t]*\r?\n?").unwrap();
    static ref UNDEFINED_VALUE: Regex = Regex::new(r":(\s*)undefined(\s*)([,}])").unwrap();
}

/// Strip markdown fencing, trim, and replace `undefined` values with `null`.
///
/// Never fails: input that is still not JSON is left for the decoder to reject.
pub fn sanitize_response(raw: &str) -> String {
    let unfenced = FENCE_OPEN.replace_all(raw, "");
    let trimmed = unfenced.trim();
    UNDEFINED_VALUE
        .replace_all(trimmed, ":${1}null${2}${3}")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(sanitize_response(raw), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence_and_surrounding_whitespace() {
        let raw = "\n\n```\n{\"a\": [1, 2]}\n```\n  ";
        assert_eq!(sanitize_response(raw), "{\"a\": [1, 2]}");
    }

    #[test]
    fn replaces_undefined_in_value_position() {
        let raw = r#"{"a": undefined, "b": {"c": undefined}}"#;
        assert_eq!(
            sanitize_response(raw),
            r#"{"a": null, "b": {"c": null}}"#
        );
    }

    #[test]
    fn keeps_undefined_inside_words_and_keys() {
        let raw = r#"{"undefined": "left undefined here", "x": 1}"#;
        assert_eq!(sanitize_response(raw), raw);
    }

    #[test]
    fn passes_plain_json_through() {
        let raw = r#"{"clauses": [], "rootClauseId": "c1"}"#;
        assert_eq!(sanitize_response(raw), raw);
    }
}
