//! Per-call analysis settings: how long the lecture runs and how the
//! narrator treats you.
//!
//! These two knobs select prompt fragments (see [`crate::prompts`]); they
//! never change network behaviour. Wire names are camelCase so settings
//! JSON written for the original web UI parses unchanged.

use serde::{Deserialize, Serialize};

/// How thorough the generated lecture should be.
///
/// Selects the length/depth instruction spliced into the prompt: roughly
/// 15 dialogue rounds for [`Brief`](DetailLevel::Brief), 25+ with no
/// technical detail skipped for [`Detailed`](DetailLevel::Detailed), and
/// ~30 rounds with terminology explained and weaknesses called out for
/// [`Academic`](DetailLevel::Academic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    #[default]
    Brief,
    Detailed,
    Academic,
}

/// The narrator's attitude towards the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    /// Scornful on the surface, thorough underneath.
    #[default]
    Tsundere,
    /// Endlessly encouraging big-sister register.
    Gentle,
    /// Drill-sergeant pacing; no slacking allowed.
    Strict,
}

/// Immutable input to every `analyze*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSettings {
    pub detail_level: DetailLevel,
    pub personality: Personality,
}

impl AnalysisSettings {
    pub fn new(detail_level: DetailLevel, personality: Personality) -> Self {
        AnalysisSettings {
            detail_level,
            personality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_brief_tsundere() {
        let settings = AnalysisSettings::default();
        assert_eq!(settings.detail_level, DetailLevel::Brief);
        assert_eq!(settings.personality, Personality::Tsundere);
    }

    #[test]
    fn wire_names_are_camel_case() {
        let json =
            serde_json::to_string(&AnalysisSettings::new(DetailLevel::Academic, Personality::Strict))
                .unwrap();
        assert_eq!(json, r#"{"detailLevel":"academic","personality":"strict"}"#);
    }

    #[test]
    fn parses_ui_settings_json() {
        let settings: AnalysisSettings =
            serde_json::from_str(r#"{"detailLevel":"detailed","personality":"gentle"}"#).unwrap();
        assert_eq!(settings.detail_level, DetailLevel::Detailed);
        assert_eq!(settings.personality, Personality::Gentle);
    }

    #[test]
    fn unknown_detail_level_is_rejected() {
        let result =
            serde_json::from_str::<AnalysisSettings>(r#"{"detailLevel":"epic","personality":"gentle"}"#);
        assert!(result.is_err());
    }
}
