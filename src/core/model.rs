use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const UNKNOWN_LINE_SENTINEL: i64 = -1;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub valid: bool,
    #[serde(default, alias = "errorLine")]
    pub error_line: Option<i64>,
    #[serde(default, alias = "errorMessage")]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub suggestions: Vec<Suggestion>,
    #[serde(default, alias = "skillLevel")]
    pub skill_level: Option<SkillLevel>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, alias = "analysisId", deserialize_with = "analysis_id")]
    pub analysis_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Suggestion {
    pub line: i64,
    #[serde(rename = "type")]
    pub label: String,
    pub message: String,
}

impl Suggestion {
    pub fn kind(&self) -> SuggestionKind {
        SuggestionKind::from_label(&self.label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Info,
    Warning,
    Style,
    Documentation,
}

impl SuggestionKind {
    // Types the analyzer may add later are styled as info.
    pub fn from_label(label: &str) -> Self {
        match label {
            "warning" => Self::Warning,
            "style" => Self::Style,
            "documentation" => Self::Documentation,
            _ => Self::Info,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SkillLevel {
    pub level: String,
    pub score: f64,
    #[serde(default)]
    pub features: FeatureCounts,
    #[serde(default, alias = "imcAnalysis")]
    pub imc_analysis: Option<ImcAnalysis>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImcAnalysis {
    #[serde(
        rename = "is_imc_calculator",
        alias = "isApplicable",
        alias = "is_applicable"
    )]
    pub is_applicable: bool,
    #[serde(alias = "hasFunctionalCalculation")]
    pub has_functional_calculation: bool,
    #[serde(alias = "hasClassification")]
    pub has_classification: bool,
    pub level: String,
}

// Kept in the order the analyzer listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureCounts(Vec<(String, u64)>);

impl FeatureCounts {
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(key, count)| (key.as_str(), *count))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for FeatureCounts {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, count)| (key.into(), count)).collect())
    }
}

impl<'de> Deserialize<'de> for FeatureCounts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedCounts;

        impl<'de> Visitor<'de> for OrderedCounts {
            type Value = FeatureCounts;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of feature names to non-negative counts")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, count)) = map.next_entry::<String, u64>()? {
                    entries.push((key, count));
                }
                Ok(FeatureCounts(entries))
            }
        }

        deserializer.deserialize_map(OrderedCounts)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BatchReport {
    pub results: Vec<AnalysisResult>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnalysisId {
    Number(i64),
    Text(String),
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn analysis_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAnalysisId>::deserialize(deserializer)?;
    Ok(raw.map(|id| match id {
        RawAnalysisId::Number(n) => n.to_string(),
        RawAnalysisId::Text(s) => s,
    }))
}
