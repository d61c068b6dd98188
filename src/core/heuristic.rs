use crate::core::model::ImcAnalysis;
use crate::core::report::Tone;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum Verdict {
    Desirable,
    Critical,
    Insufficient,
}

static VERDICT_LABELS: Lazy<HashMap<&'static str, Verdict>> = Lazy::new(|| {
    HashMap::from([
        ("desirable", Verdict::Desirable),
        ("desejável", Verdict::Desirable),
        ("critical", Verdict::Critical),
        ("crítico", Verdict::Critical),
        ("insufficient", Verdict::Insufficient),
        ("não atende critérios", Verdict::Insufficient),
    ])
});

impl Verdict {
    pub fn from_label(label: &str) -> Self {
        VERDICT_LABELS
            .get(label.trim().to_lowercase().as_str())
            .copied()
            .unwrap_or(Self::Insufficient)
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::Desirable => Tone::Success,
            Self::Critical => Tone::Info,
            Self::Insufficient => Tone::Danger,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Desirable => {
                "Congratulations! Your code meets every criterion for a BMI calculator. \
                 It computes the BMI correctly and also classifies the result."
            }
            Self::Critical => {
                "Your code meets the critical criterion for a BMI calculator and computes \
                 the BMI correctly. To reach the 'Desirable' level, add a BMI classification \
                 (e.g. underweight, normal, overweight)."
            }
            Self::Insufficient => {
                "Your code looks like a BMI calculator attempt, but it does not compute the \
                 BMI correctly. Check the formula BMI = weight / (height * height) and make \
                 sure the code runs."
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HeuristicPanel {
    pub verdict: Verdict,
    pub tone: Tone,
    pub label: String,
    pub critical_met: bool,
    pub desirable_met: bool,
    pub description: &'static str,
}

// The verdict comes from the analyzer and is never re-derived from the flags.
pub fn evaluate(analysis: &ImcAnalysis) -> Option<HeuristicPanel> {
    if !analysis.is_applicable {
        return None;
    }

    let verdict = Verdict::from_label(&analysis.level);
    Some(HeuristicPanel {
        verdict,
        tone: verdict.tone(),
        label: analysis.level.clone(),
        critical_met: analysis.has_functional_calculation,
        desirable_met: analysis.has_classification,
        description: verdict.description(),
    })
}
