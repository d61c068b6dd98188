use crate::core::features::{self, FeatureEntry, NO_FEATURES_MESSAGE};
use crate::core::heuristic::{self, HeuristicPanel};
use crate::core::model::{AnalysisResult, SkillLevel, SuggestionKind, UNKNOWN_LINE_SENTINEL};
use crate::core::report::Tone;
use crate::core::score::{self, ScoreClass};
use serde::{Serialize, Serializer};
use std::fmt;

pub const NO_SUGGESTIONS_MESSAGE: &str = "Your code looks good! No improvement suggestions found.";
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SingleViewModel {
    pub valid: bool,
    pub banner: Banner,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<SkillPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<SuggestionEntry>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Banner {
    pub tone: Tone,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorPanel {
    pub line: ErrorLine,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLine {
    Known(i64),
    Unknown,
}

impl ErrorLine {
    fn from_wire(line: Option<i64>) -> Self {
        match line {
            Some(line) if line != UNKNOWN_LINE_SENTINEL => Self::Known(line),
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ErrorLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(line) => write!(f, "{line}"),
            Self::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl Serialize for ErrorLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(line) => serializer.serialize_i64(*line),
            Self::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkillPanel {
    pub level: String,
    pub score: f64,
    #[serde(flatten)]
    pub class: ScoreClass,
    pub features: Vec<FeatureEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features_note: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heuristic: Option<HeuristicPanel>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum SuggestionEntry {
    Suggestion {
        line: i64,
        kind: SuggestionKind,
        label: String,
        message: String,
    },
    NoSuggestions {
        message: &'static str,
    },
}

pub fn present(result: &AnalysisResult) -> SingleViewModel {
    SingleViewModel {
        valid: result.valid,
        banner: validity_banner(result.valid),
        error: (!result.valid).then(|| ErrorPanel {
            line: ErrorLine::from_wire(result.error_line),
            message: result
                .error_message
                .clone()
                .unwrap_or_else(|| format!("{UNKNOWN} error")),
        }),
        skill: result.skill_level.as_ref().map(skill_panel),
        suggestions: suggestions_panel(result),
    }
}

fn validity_banner(valid: bool) -> Banner {
    if valid {
        Banner {
            tone: Tone::Success,
            title: "Validation Successful".to_string(),
            message: "Your Python code is syntactically valid!".to_string(),
        }
    } else {
        Banner {
            tone: Tone::Danger,
            title: "Validation Failed".to_string(),
            message: "Your Python code contains syntax errors.".to_string(),
        }
    }
}

fn skill_panel(skill: &SkillLevel) -> SkillPanel {
    let features = features::inventory(&skill.features);
    SkillPanel {
        level: skill.level.clone(),
        score: skill.score,
        class: score::classify(skill.score),
        features_note: features.is_empty().then_some(NO_FEATURES_MESSAGE),
        features,
        heuristic: skill.imc_analysis.as_ref().and_then(heuristic::evaluate),
    }
}

// An empty list is only reassuring when the code parsed.
fn suggestions_panel(result: &AnalysisResult) -> Option<Vec<SuggestionEntry>> {
    if !result.suggestions.is_empty() {
        return Some(
            result
                .suggestions
                .iter()
                .map(|s| SuggestionEntry::Suggestion {
                    line: s.line,
                    kind: s.kind(),
                    label: s.label.clone(),
                    message: s.message.clone(),
                })
                .collect(),
        );
    }

    result.valid.then(|| {
        vec![SuggestionEntry::NoSuggestions {
            message: NO_SUGGESTIONS_MESSAGE,
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{FeatureCounts, ImcAnalysis, Suggestion};
    use crate::core::score::Tier;

    fn result(valid: bool) -> AnalysisResult {
        AnalysisResult {
            valid,
            error_line: None,
            error_message: None,
            suggestions: Vec::new(),
            skill_level: None,
            filename: None,
            analysis_id: None,
        }
    }

    #[test]
    fn valid_result_without_suggestions_synthesizes_entry() {
        let view = present(&result(true));
        assert_eq!(view.banner.tone, Tone::Success);
        assert!(view.error.is_none());
        assert_eq!(
            view.suggestions,
            Some(vec![SuggestionEntry::NoSuggestions {
                message: NO_SUGGESTIONS_MESSAGE
            }])
        );
    }

    #[test]
    fn invalid_result_without_suggestions_hides_panel() {
        let view = present(&result(false));
        assert_eq!(view.banner.tone, Tone::Danger);
        assert!(view.suggestions.is_none());
    }

    #[test]
    fn suggestions_keep_given_order() {
        let mut r = result(false);
        r.suggestions = vec![
            Suggestion {
                line: 9,
                label: "style".to_string(),
                message: "second".to_string(),
            },
            Suggestion {
                line: 2,
                label: "warning".to_string(),
                message: "first".to_string(),
            },
        ];
        let lines: Vec<i64> = present(&r)
            .suggestions
            .unwrap()
            .into_iter()
            .map(|entry| match entry {
                SuggestionEntry::Suggestion { line, .. } => line,
                SuggestionEntry::NoSuggestions { .. } => 0,
            })
            .collect();
        assert_eq!(lines, [9, 2]);
    }

    #[test]
    fn error_line_sentinel_and_absence_read_unknown() {
        let mut r = result(false);
        r.error_line = Some(-1);
        r.error_message = Some("bad syntax".to_string());
        let error = present(&r).error.unwrap();
        assert_eq!(error.line, ErrorLine::Unknown);
        assert_eq!(error.line.to_string(), "Unknown");
        assert_eq!(error.message, "bad syntax");

        r.error_line = None;
        r.error_message = None;
        let error = present(&r).error.unwrap();
        assert_eq!(error.line, ErrorLine::Unknown);
        assert_eq!(error.message, "Unknown error");

        r.error_line = Some(7);
        assert_eq!(present(&r).error.unwrap().line, ErrorLine::Known(7));
    }

    #[test]
    fn error_line_serializes_as_number_or_unknown() {
        assert_eq!(serde_json::to_value(ErrorLine::Known(4)).unwrap(), 4);
        assert_eq!(serde_json::to_value(ErrorLine::Unknown).unwrap(), "Unknown");
    }

    #[test]
    fn skill_panel_renders_for_invalid_code() {
        let mut r = result(false);
        r.skill_level = Some(SkillLevel {
            level: "Com Erros".to_string(),
            score: 10.0,
            features: FeatureCounts::default(),
            imc_analysis: Some(ImcAnalysis {
                is_applicable: true,
                has_functional_calculation: false,
                has_classification: false,
                level: "Não Atende Critérios".to_string(),
            }),
        });

        let skill = present(&r).skill.unwrap();
        assert_eq!(skill.class.tier, Tier::Low);
        assert!(skill.features.is_empty());
        assert_eq!(skill.features_note, Some(NO_FEATURES_MESSAGE));
        assert!(skill.heuristic.is_some());
    }

    #[test]
    fn skill_panel_with_features_has_no_note() {
        let mut r = result(true);
        r.skill_level = Some(SkillLevel {
            level: "Intermediário".to_string(),
            score: 55.0,
            features: [("functions", 2)].into_iter().collect(),
            imc_analysis: None,
        });

        let skill = present(&r).skill.unwrap();
        assert_eq!(skill.class.tier, Tier::Good);
        assert_eq!(skill.features.len(), 1);
        assert!(skill.features_note.is_none());
        assert!(skill.heuristic.is_none());
    }
}
