//! Reply decoding: from raw model text to a validated [`DialogueScript`].
//!
//! ## Why lenient?
//!
//! The prompt says "output JSON" — and models mostly comply, except for
//! wrapping the payload in a Markdown code fence despite being told the
//! format, not the presentation. Stripping an *outer* fence before
//! parsing is a cheap, deterministic fix for the single most common
//! deviation; anything irregular beyond that is a genuine malformed
//! reply and becomes an error.
//!
//! Fence handling mirrors the shape models actually produce: a leading
//! ```` ``` ```` with an optional `json` tag is removed even when the
//! closing fence is missing (truncated replies often lose it), and the
//! closing fence is removed only from the very end of the text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AnalysisError;
use crate::script::DialogueScript;

static RE_LEADING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(?:json)?\n?").unwrap());
static RE_TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n?```$").unwrap());

/// Strip one outer code fence, if present.
///
/// Operates on the trimmed text. Inner fences (e.g. inside dialogue
/// strings) are untouched: only a fence opening the text and a fence
/// closing it are removed.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    let without_leading = RE_LEADING_FENCE.replace(trimmed, "");
    RE_TRAILING_FENCE.replace(&without_leading, "").into_owned()
}

/// Decode the extracted reply text into a script.
///
/// Fence strip, then JSON parse, then structural validation: the title
/// must be non-empty and the script field an array (the array may be
/// empty — length enforcement is the prompt's job, not the decoder's).
pub fn decode_script(text: &str) -> Result<DialogueScript, AnalysisError> {
    let payload = strip_code_fences(text);

    let script: DialogueScript =
        serde_json::from_str(&payload).map_err(|e| AnalysisError::MalformedReply {
            detail: e.to_string(),
        })?;

    if script.title.is_empty() {
        return Err(AnalysisError::MalformedReply {
            detail: "reply has an empty title".to_string(),
        });
    }

    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Emotion;

    #[test]
    fn strips_json_tagged_fence() {
        let input = "```json\n{\"title\":\"T\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"title\":\"T\"}");
    }

    #[test]
    fn strips_untagged_fence() {
        let input = "```\n{\"title\":\"T\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"title\":\"T\"}");
    }

    #[test]
    fn passthrough_without_fences() {
        let input = "{\"title\":\"T\"}";
        assert_eq!(strip_code_fences(input), "{\"title\":\"T\"}");
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let input = "\n\n```json\n{\"a\":1}\n```   \n";
        assert_eq!(strip_code_fences(input), "{\"a\":1}");
    }

    #[test]
    fn tolerates_missing_newline_before_closing_fence() {
        let input = "```json\n{\"a\":1}```";
        assert_eq!(strip_code_fences(input), "{\"a\":1}");
    }

    #[test]
    fn strips_leading_fence_even_when_unterminated() {
        let input = "```json\n{\"a\":1}";
        assert_eq!(strip_code_fences(input), "{\"a\":1}");
    }

    #[test]
    fn leaves_inner_fences_alone() {
        let input = "{\"text\":\"use ```rust``` blocks\"}";
        assert_eq!(strip_code_fences(input), input);
    }

    #[test]
    fn decodes_the_canonical_fenced_reply() {
        let text =
            "```json\n{\"title\":\"T\",\"script\":[{\"speaker\":\"A\",\"text\":\"hi\",\"emotion\":\"happy\"}]}\n```";
        let script = decode_script(text).unwrap();
        assert_eq!(script.title, "T");
        assert_eq!(script.lines.len(), 1);
        assert_eq!(script.lines[0].speaker, "A");
        assert_eq!(script.lines[0].emotion, Emotion::Happy);
    }

    #[test]
    fn decodes_a_bare_reply_with_notes() {
        let text = r#"{"title":"注意力机制","script":[
            {"speaker":"丛雨","text":"主殿，听好了。","emotion":"proud"},
            {"speaker":"丛雨","text":"这就是自注意力。","emotion":"normal","note":"self-attention"}
        ]}"#;
        let script = decode_script(text).unwrap();
        assert_eq!(script.lines.len(), 2);
        assert_eq!(script.lines[1].note.as_deref(), Some("self-attention"));
    }

    #[test]
    fn empty_script_array_is_structurally_valid() {
        let script = decode_script(r#"{"title":"T","script":[]}"#).unwrap();
        assert!(script.lines.is_empty());
    }

    #[test]
    fn missing_title_is_malformed() {
        let err = decode_script(r#"{"script":[]}"#).unwrap_err();
        match err {
            AnalysisError::MalformedReply { detail } => {
                assert!(detail.contains("title"), "got: {detail}")
            }
            other => panic!("expected MalformedReply, got {other:?}"),
        }
    }

    #[test]
    fn empty_title_is_malformed() {
        let err = decode_script(r#"{"title":"","script":[]}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedReply { .. }));
    }

    #[test]
    fn non_array_script_is_malformed() {
        let err = decode_script(r#"{"title":"T","script":"not a list"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedReply { .. }));
    }

    #[test]
    fn whitespace_only_text_is_malformed() {
        let err = decode_script("   \n  ").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedReply { .. }));
    }

    #[test]
    fn prose_reply_is_malformed() {
        let err = decode_script("吾辈看不懂这篇论文。").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedReply { .. }));
    }
}
