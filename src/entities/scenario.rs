//! Scenario entity and the typed snapshots it carries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::cost::{DirectCost, IndirectCost, TimeCost};
use crate::entities::market::{Competitor, ValueFactor};
use crate::entities::pricing::{MarketPosition, Recommendation, Strategy};
use crate::entities::segment::CustomerSegment;

/// Current snapshot schema version
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Cost model state with its headline figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub business_type: String,
    pub target_margin: f64,
    pub expected_volume: f64,
    #[serde(default)]
    pub direct_costs: Vec<DirectCost>,
    #[serde(default)]
    pub indirect_costs: Vec<IndirectCost>,
    #[serde(default)]
    pub time_costs: Vec<TimeCost>,
    #[serde(default)]
    pub total_cost_per_unit: f64,
    #[serde(default)]
    pub minimum_viable_price: f64,
}

/// Pricing model state (market inputs and segments)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub market_position: MarketPosition,
    #[serde(default)]
    pub competitors: Vec<Competitor>,
    #[serde(default)]
    pub value_factors: Vec<ValueFactor>,
    #[serde(default)]
    pub segments: Vec<CustomerSegment>,
    #[serde(default)]
    pub weighted_elasticity: f64,
}

/// Recommendations captured at save time, one slot per strategy
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecommendationSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_plus: Option<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor: Option<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal: Option<Recommendation>,
}

impl RecommendationSnapshot {
    pub fn from_recommendations(recommendations: BTreeMap<Strategy, Recommendation>) -> Self {
        let mut snapshot = Self::default();
        for (strategy, recommendation) in recommendations {
            *snapshot.slot_mut(strategy) = Some(recommendation);
        }
        snapshot
    }

    pub fn get(&self, strategy: Strategy) -> Option<&Recommendation> {
        match strategy {
            Strategy::CostPlus => self.cost_plus.as_ref(),
            Strategy::Competitor => self.competitor.as_ref(),
            Strategy::Value => self.value.as_ref(),
            Strategy::Optimal => self.optimal.as_ref(),
        }
    }

    fn slot_mut(&mut self, strategy: Strategy) -> &mut Option<Recommendation> {
        match strategy {
            Strategy::CostPlus => &mut self.cost_plus,
            Strategy::Competitor => &mut self.competitor,
            Strategy::Value => &mut self.value,
            Strategy::Optimal => &mut self.optimal,
        }
    }

    /// Present recommendations in strategy order
    pub fn iter(&self) -> impl Iterator<Item = &Recommendation> {
        Strategy::all().iter().filter_map(|s| self.get(*s))
    }
}

/// What a caller hands to the store when saving a scenario
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<RecommendationSnapshot>,
}

/// A named, timestamped snapshot of a pricing analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Set on every save, including overwrites
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(flatten)]
    pub payload: ScenarioPayload,
}

impl Scenario {
    pub fn new(name: impl Into<String>, payload: ScenarioPayload) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            version: SNAPSHOT_VERSION,
            payload,
        }
    }

    /// The optimal recommendation, if one was captured
    pub fn optimal(&self) -> Option<&Recommendation> {
        self.payload
            .recommendations
            .as_ref()
            .and_then(|r| r.optimal.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::cost::CostModel;
    use crate::entities::pricing::PricingModel;

    #[test]
    fn test_recommendation_snapshot_slots() {
        let costs = CostModel::default();
        let model = PricingModel::new(&costs);
        let snapshot = model.recommendation_snapshot();

        assert!(snapshot.cost_plus.is_some());
        assert!(snapshot.optimal.is_some());
        let order: Vec<Strategy> = snapshot.iter().map(|r| r.strategy).collect();
        assert_eq!(order, Strategy::all());
    }

    #[test]
    fn test_scenario_json_shape() {
        let costs = CostModel::new("bakery");
        let scenario = Scenario::new(
            "Baseline",
            ScenarioPayload {
                cost: Some(costs.snapshot()),
                ..Default::default()
            },
        );

        let json = serde_json::to_value(&scenario).unwrap();
        assert_eq!(json["name"], "Baseline");
        assert_eq!(json["version"], SNAPSHOT_VERSION);
        assert_eq!(json["cost"]["business_type"], "bakery");
        assert!(json.get("pricing").is_none());

        let back: Scenario = serde_json::from_value(json).unwrap();
        assert_eq!(back, scenario);
    }

    #[test]
    fn test_missing_version_defaults_to_current() {
        let json = serde_json::json!({
            "name": "Legacy",
            "created_at": "2024-01-01T00:00:00Z"
        });
        let scenario: Scenario = serde_json::from_value(json).unwrap();
        assert_eq!(scenario.version, SNAPSHOT_VERSION);
        assert!(scenario.optimal().is_none());
    }
}
