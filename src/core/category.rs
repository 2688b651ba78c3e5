//! Top-level data categories persisted by the application

use serde::{Deserialize, Serialize};

/// Namespace prepended to every storage key
pub const KEY_NAMESPACE: &str = "priceplan";

/// A top-level storage category; each lives under its own storage key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    CostAnalysis,
    PricingStrategy,
    BusinessProfile,
    Competitors,
    ValueFactors,
    ValueProposition,
    ValueMap,
    Communication,
    Settings,
    Scenarios,
}

impl DataCategory {
    /// Field name used in export documents
    pub fn as_str(&self) -> &'static str {
        match self {
            DataCategory::CostAnalysis => "cost_analysis",
            DataCategory::PricingStrategy => "pricing_strategy",
            DataCategory::BusinessProfile => "business_profile",
            DataCategory::Competitors => "competitors",
            DataCategory::ValueFactors => "value_factors",
            DataCategory::ValueProposition => "value_proposition",
            DataCategory::ValueMap => "value_map",
            DataCategory::Communication => "communication",
            DataCategory::Settings => "settings",
            DataCategory::Scenarios => "scenarios",
        }
    }

    pub fn all() -> &'static [DataCategory] {
        &[
            DataCategory::CostAnalysis,
            DataCategory::PricingStrategy,
            DataCategory::BusinessProfile,
            DataCategory::Competitors,
            DataCategory::ValueFactors,
            DataCategory::ValueProposition,
            DataCategory::ValueMap,
            DataCategory::Communication,
            DataCategory::Settings,
            DataCategory::Scenarios,
        ]
    }

    /// Namespaced key this category is stored under
    pub fn storage_key(&self) -> String {
        format!("{}.{}", KEY_NAMESPACE, self.as_str())
    }

    /// Reverse of [`DataCategory::storage_key`]
    pub fn from_storage_key(key: &str) -> Option<Self> {
        let name = key.strip_prefix(KEY_NAMESPACE)?.strip_prefix('.')?;
        name.parse().ok()
    }
}

impl std::fmt::Display for DataCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DataCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .find(|c| c.as_str() == normalized)
            .copied()
            .ok_or_else(|| format!("Unknown data category: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_roundtrip() {
        for category in DataCategory::all() {
            let key = category.storage_key();
            assert!(key.starts_with("priceplan."));
            assert_eq!(DataCategory::from_storage_key(&key), Some(*category));
        }
    }

    #[test]
    fn test_foreign_keys_are_not_categories() {
        assert_eq!(DataCategory::from_storage_key("other.scenarios"), None);
        assert_eq!(DataCategory::from_storage_key("priceplan.unknown"), None);
        assert_eq!(DataCategory::from_storage_key("priceplanscenarios"), None);
    }

    #[test]
    fn test_parse_accepts_kebab_case() {
        assert_eq!(
            "value-map".parse::<DataCategory>().unwrap(),
            DataCategory::ValueMap
        );
    }
}
