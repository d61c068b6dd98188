use crate::core::report::Tone;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Fair,
    Good,
    Full,
}

impl Tier {
    pub fn tone(self) -> Tone {
        match self {
            Self::Full => Tone::Success,
            Self::Good => Tone::Info,
            Self::Fair => Tone::Warning,
            Self::Low => Tone::Danger,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ScoreClass {
    pub tier: Tier,
    pub percent: u8,
}

pub fn classify(score: f64) -> ScoreClass {
    // NaN compares false everywhere, so it lands on 0 with the negatives.
    let score = if score > 0.0 { score } else { 0.0 };

    let tier = if score >= 100.0 {
        Tier::Full
    } else if score >= 50.0 {
        Tier::Good
    } else if score >= 25.0 {
        Tier::Fair
    } else {
        Tier::Low
    };

    ScoreClass {
        tier,
        percent: score.min(100.0).round() as u8,
    }
}
