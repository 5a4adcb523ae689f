//! The dialogue-script data model: what an analysis produces.
//!
//! The inference reply is JSON with a `title` and a `script` array of
//! speaker/text/emotion/note records; these types mirror that wire shape
//! exactly so [`serde_json`] can decode a reply in one step. The same
//! types serialize back out for the CLI's `--json` output, so round-trips
//! are loss-free.
//!
//! ## Leniency
//!
//! Models drift: a reply may tag a line `"Happy"` or invent an emotion the
//! prompt never offered. The decode absorbs that locally — unknown or
//! missing emotion tags become [`Emotion::Normal`] — instead of discarding
//! an otherwise valid script. Non-string emotions and missing
//! speaker/text fields are still hard decode errors.

use serde::{Deserialize, Serialize};

use crate::prompts::CHARACTER_NAME;

/// Title of the canned failure script; see [`DialogueScript::fallback`].
const FALLBACK_TITLE: &str = "灵力回路遮断";

/// Emotion tag attached to a dialogue line, used by the UI layer to pick a
/// character sprite.
///
/// Serializes to the lowercase tag the prompt pins (`"normal"`, `"happy"`,
/// …). Deserialization is case-insensitive and coerces unknown tags to
/// [`Emotion::Normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Normal,
    Happy,
    Angry,
    Surprised,
    Shy,
    Proud,
}

impl Emotion {
    /// The lowercase wire tag for this emotion.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Normal => "normal",
            Emotion::Happy => "happy",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
            Emotion::Shy => "shy",
            Emotion::Proud => "proud",
        }
    }

    /// Parse a wire tag, case-insensitively; anything unrecognised maps to
    /// [`Emotion::Normal`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "normal" => Emotion::Normal,
            "happy" => Emotion::Happy,
            "angry" => Emotion::Angry,
            "surprised" => Emotion::Surprised,
            "shy" => Emotion::Shy,
            "proud" => Emotion::Proud,
            _ => Emotion::Normal,
        }
    }
}

// Hand-written so unknown tags coerce instead of failing the whole script;
// serde's `#[serde(other)]` is not available on plain string enums.
impl<'de> Deserialize<'de> for Emotion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(Emotion::from_tag(&tag))
    }
}

/// One turn of the generated script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Who speaks the line. The prompt pins this to the narrator persona,
    /// but the model's value is passed through untouched.
    pub speaker: String,
    /// The spoken text.
    pub text: String,
    /// Sprite tag; absent or unknown tags decode as [`Emotion::Normal`].
    #[serde(default)]
    pub emotion: Emotion,
    /// Optional aside (a term definition, a citation, a stage direction).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A complete analysis: paper title plus the ordered dialogue.
///
/// This is the terminal artifact of every `analyze*` call. The dialogue
/// field is named `lines` in Rust but serializes under the wire name
/// `script`, matching the prompt's output contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueScript {
    pub title: String,
    #[serde(rename = "script")]
    pub lines: Vec<DialogueLine>,
}

impl DialogueScript {
    /// The canned in-universe error script.
    ///
    /// Every failure inside `analyze*` ends here: the narrator reports the
    /// severed connection in character, with `reason` embedded verbatim in
    /// the second line. Keeping the failure inside the fiction means the
    /// UI layer never needs an error state of its own.
    pub fn fallback(reason: &str) -> Self {
        DialogueScript {
            title: FALLBACK_TITLE.to_string(),
            lines: vec![
                DialogueLine {
                    speaker: CHARACTER_NAME.to_string(),
                    text: "呜... 主殿，连结彼岸的通道似乎被干扰了（Doubao API Request Failed）。"
                        .to_string(),
                    emotion: Emotion::Shy,
                    note: None,
                },
                DialogueLine {
                    speaker: CHARACTER_NAME.to_string(),
                    text: format!("错误信息：{reason}"),
                    emotion: Emotion::Angry,
                    note: None,
                },
                DialogueLine {
                    speaker: CHARACTER_NAME.to_string(),
                    text: "是不是你的ARK_API_KEY没放对地方？或者是这篇论文有结界？".to_string(),
                    emotion: Emotion::Angry,
                    note: None,
                },
            ],
        }
    }

    /// True for the canned failure script, false for a model-generated one.
    ///
    /// Lets callers of the never-failing `analyze*` entry points decide to
    /// offer a retry or surface diagnostics without parsing dialogue text.
    pub fn is_fallback(&self) -> bool {
        self.title == FALLBACK_TITLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_minimal_line() {
        let line: DialogueLine =
            serde_json::from_str(r#"{"speaker":"A","text":"hi","emotion":"happy"}"#).unwrap();
        assert_eq!(line.speaker, "A");
        assert_eq!(line.text, "hi");
        assert_eq!(line.emotion, Emotion::Happy);
        assert_eq!(line.note, None);
    }

    #[test]
    fn unknown_emotion_coerces_to_normal() {
        let line: DialogueLine =
            serde_json::from_str(r#"{"speaker":"A","text":"hi","emotion":"melancholy"}"#).unwrap();
        assert_eq!(line.emotion, Emotion::Normal);
    }

    #[test]
    fn emotion_tags_are_case_insensitive() {
        let line: DialogueLine =
            serde_json::from_str(r#"{"speaker":"A","text":"hi","emotion":"Proud"}"#).unwrap();
        assert_eq!(line.emotion, Emotion::Proud);
    }

    #[test]
    fn missing_emotion_defaults_to_normal() {
        let line: DialogueLine = serde_json::from_str(r#"{"speaker":"A","text":"hi"}"#).unwrap();
        assert_eq!(line.emotion, Emotion::Normal);
    }

    #[test]
    fn non_string_emotion_is_a_decode_error() {
        let result = serde_json::from_str::<DialogueLine>(
            r#"{"speaker":"A","text":"hi","emotion":5}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_speaker_is_a_decode_error() {
        let result = serde_json::from_str::<DialogueLine>(r#"{"text":"hi"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn lines_serialize_under_the_script_wire_name() {
        let script = DialogueScript {
            title: "T".into(),
            lines: vec![DialogueLine {
                speaker: "A".into(),
                text: "hi".into(),
                emotion: Emotion::Happy,
                note: None,
            }],
        };
        let json = serde_json::to_string(&script).unwrap();
        assert!(json.contains(r#""script":["#), "got: {json}");
        assert!(!json.contains(r#""lines""#), "got: {json}");
        assert!(!json.contains(r#""note""#), "note should be omitted: {json}");
    }

    #[test]
    fn note_survives_a_round_trip() {
        let json = r#"{"speaker":"A","text":"hi","emotion":"shy","note":"a term"}"#;
        let line: DialogueLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.note.as_deref(), Some("a term"));
        let back = serde_json::to_string(&line).unwrap();
        assert!(back.contains(r#""note":"a term""#));
    }

    #[test]
    fn fallback_embeds_the_reason() {
        let script = DialogueScript::fallback("file upload failed: HTTP 401");
        assert_eq!(script.title, "灵力回路遮断");
        assert_eq!(script.lines.len(), 3);
        assert!(script.lines[1].text.contains("HTTP 401"));
        assert!(script.lines[1].text.starts_with("错误信息："));
    }

    #[test]
    fn fallback_stays_in_character() {
        let script = DialogueScript::fallback("boom");
        for line in &script.lines {
            assert_eq!(line.speaker, CHARACTER_NAME);
        }
        assert_eq!(script.lines[0].emotion, Emotion::Shy);
        assert_eq!(script.lines[1].emotion, Emotion::Angry);
        assert_eq!(script.lines[2].emotion, Emotion::Angry);
        assert!(script.lines[2].text.contains("ARK_API_KEY"));
    }

    #[test]
    fn only_the_canned_script_reads_as_fallback() {
        assert!(DialogueScript::fallback("boom").is_fallback());
        let real = DialogueScript {
            title: "Attention Is All You Need".into(),
            lines: vec![],
        };
        assert!(!real.is_fallback());
    }
}
