use crate::core::model::FeatureCounts;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

pub const NO_FEATURES_MESSAGE: &str = "No advanced features detected in the code.";

const GENERIC_ICON: &str = "code";

#[derive(Debug, Clone, Copy)]
struct FeatureInfo {
    label: &'static str,
    icon: &'static str,
}

static FEATURE_TABLE: Lazy<HashMap<&'static str, FeatureInfo>> = Lazy::new(|| {
    [
        ("functions", "Functions", "code"),
        ("classes", "Classes", "cube"),
        ("imports", "Imports", "download"),
        ("comprehensions", "Comprehensions", "list"),
        ("error_handling", "Error Handling", "exclamation-circle"),
        ("advanced_types", "Advanced Types", "layer-group"),
        ("docstrings", "Documentation", "file-alt"),
        ("decorators", "Decorators", "paint-brush"),
        ("complex_structures", "Complex Structures", "project-diagram"),
        ("advanced_features", "Advanced Features", "star"),
    ]
    .into_iter()
    .map(|(key, label, icon)| (key, FeatureInfo { label, icon }))
    .collect()
});

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FeatureEntry {
    pub key: String,
    pub label: String,
    pub icon: &'static str,
    pub count: u64,
}

pub fn inventory(features: &FeatureCounts) -> Vec<FeatureEntry> {
    features
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(key, count)| {
            let (label, icon) = match FEATURE_TABLE.get(key) {
                Some(info) => (info.label.to_string(), info.icon),
                None => (key.to_string(), GENERIC_ICON),
            };
            FeatureEntry {
                key: key.to_string(),
                label,
                icon,
                count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mapping_yields_empty_inventory() {
        assert!(inventory(&FeatureCounts::default()).is_empty());
    }

    #[test]
    fn zero_counts_are_dropped() {
        let counts: FeatureCounts = [("functions", 0), ("classes", 3)].into_iter().collect();
        let entries = inventory(&counts);
        assert_eq!(
            entries,
            vec![FeatureEntry {
                key: "classes".to_string(),
                label: "Classes".to_string(),
                icon: "cube",
                count: 3,
            }]
        );
    }

    #[test]
    fn keeps_input_order_without_sorting() {
        let counts: FeatureCounts = [("imports", 1), ("decorators", 2), ("classes", 1)]
            .into_iter()
            .collect();
        let keys: Vec<String> = inventory(&counts).into_iter().map(|e| e.key).collect();
        assert_eq!(keys, ["imports", "decorators", "classes"]);
    }

    #[test]
    fn unknown_keys_use_key_as_label() {
        let counts: FeatureCounts = [("walrus_operators", 4)].into_iter().collect();
        let entry = &inventory(&counts)[0];
        assert_eq!(entry.label, "walrus_operators");
        assert_eq!(entry.icon, GENERIC_ICON);
    }

    #[test]
    fn known_keys_are_labelled() {
        let counts: FeatureCounts = [("error_handling", 2), ("docstrings", 1)]
            .into_iter()
            .collect();
        let labels: Vec<String> = inventory(&counts).into_iter().map(|e| e.label).collect();
        assert_eq!(labels, ["Error Handling", "Documentation"]);
    }
}
