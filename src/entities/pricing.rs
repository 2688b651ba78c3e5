//! Pricing model - price recommendations under several strategies
//!
//! A [`PricingModel`] borrows the [`CostModel`] it prices against; the cost
//! model stays owned by the caller. Recommendations are recomputed from the
//! current state on every call.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::error::{finite, ValidationError};
use crate::core::identity::SegmentId;
use crate::entities::cost::CostModel;
use crate::entities::market::{Competitor, ValueFactor};
use crate::entities::scenario::{PricingSnapshot, RecommendationSnapshot, SNAPSHOT_VERSION};
use crate::entities::segment::CustomerSegmentAggregator;

/// Weights of the blended "optimal" recommendation
const OPTIMAL_WEIGHTS: (f64, f64, f64) = (0.4, 0.3, 0.3);

/// Where the business positions itself in its market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MarketPosition {
    Budget,
    #[default]
    MidMarket,
    Premium,
}

impl MarketPosition {
    pub fn cost_plus_multiplier(&self) -> f64 {
        match self {
            MarketPosition::Budget => 0.9,
            MarketPosition::MidMarket => 1.0,
            MarketPosition::Premium => 1.2,
        }
    }

    pub fn competitor_multiplier(&self) -> f64 {
        match self {
            MarketPosition::Budget => 0.85,
            MarketPosition::MidMarket => 1.0,
            MarketPosition::Premium => 1.25,
        }
    }

    pub fn value_multiplier(&self) -> f64 {
        match self {
            MarketPosition::Budget => 0.9,
            MarketPosition::MidMarket => 1.0,
            MarketPosition::Premium => 1.15,
        }
    }
}

impl std::fmt::Display for MarketPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketPosition::Budget => write!(f, "budget"),
            MarketPosition::MidMarket => write!(f, "mid-market"),
            MarketPosition::Premium => write!(f, "premium"),
        }
    }
}

impl std::str::FromStr for MarketPosition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "budget" => Ok(MarketPosition::Budget),
            "mid-market" => Ok(MarketPosition::MidMarket),
            "premium" => Ok(MarketPosition::Premium),
            _ => Err(ValidationError::UnknownMarketPosition(s.to_string())),
        }
    }
}

/// Pricing strategy behind a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    CostPlus,
    Competitor,
    Value,
    Optimal,
}

impl Strategy {
    pub fn all() -> &'static [Strategy] {
        &[
            Strategy::CostPlus,
            Strategy::Competitor,
            Strategy::Value,
            Strategy::Optimal,
        ]
    }

    /// Heading used when presenting the strategy
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::CostPlus => "Cost-Plus",
            Strategy::Competitor => "Competitor-Indexed",
            Strategy::Value => "Value-Based",
            Strategy::Optimal => "Optimal (Blended)",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::CostPlus => write!(f, "cost-plus"),
            Strategy::Competitor => write!(f, "competitor"),
            Strategy::Value => write!(f, "value"),
            Strategy::Optimal => write!(f, "optimal"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cost-plus" | "costplus" | "cost_plus" => Ok(Strategy::CostPlus),
            "competitor" => Ok(Strategy::Competitor),
            "value" => Ok(Strategy::Value),
            "optimal" => Ok(Strategy::Optimal),
            _ => Err(ValidationError::UnknownStrategy(s.to_string())),
        }
    }
}

/// A recommended price with its supporting figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub strategy: Strategy,
    /// Rounded to 2 decimals
    pub price: f64,
    pub explanation: String,
    /// Heuristic in `[0, 1]`
    pub confidence_level: f64,
    pub margin: f64,
    /// Infinite when the price cannot break even; stored as `null`
    #[serde(with = "infinite_as_null")]
    pub break_even_volume: f64,
}

mod infinite_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

/// Figures behind a value-based price
struct ValueInputs {
    value_score: f64,
    market_value_to_price: f64,
}

/// Produces price recommendations for one cost model
#[derive(Debug, Clone)]
pub struct PricingModel<'a> {
    cost_model: &'a CostModel,
    competitors: Vec<Competitor>,
    value_factors: Vec<ValueFactor>,
    segments: CustomerSegmentAggregator,
    market_position: MarketPosition,
}

impl<'a> PricingModel<'a> {
    pub fn new(cost_model: &'a CostModel) -> Self {
        Self {
            cost_model,
            competitors: Vec::new(),
            value_factors: Vec::new(),
            segments: CustomerSegmentAggregator::new(),
            market_position: MarketPosition::default(),
        }
    }

    /// Rebuild a model from a snapshot against the given cost model
    pub fn from_snapshot(
        cost_model: &'a CostModel,
        snapshot: &PricingSnapshot,
    ) -> Result<Self, ValidationError> {
        let mut model = Self::new(cost_model);
        model.market_position = snapshot.market_position;
        for competitor in &snapshot.competitors {
            competitor.validate()?;
            model.competitors.push(competitor.clone());
        }
        for factor in &snapshot.value_factors {
            factor.validate()?;
            model.value_factors.push(factor.clone());
        }
        model.segments = CustomerSegmentAggregator::from_segments(snapshot.segments.clone())?;
        Ok(model)
    }

    pub fn cost_model(&self) -> &CostModel {
        self.cost_model
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    pub fn value_factors(&self) -> &[ValueFactor] {
        &self.value_factors
    }

    pub fn segments(&self) -> &CustomerSegmentAggregator {
        &self.segments
    }

    pub fn market_position(&self) -> MarketPosition {
        self.market_position
    }

    pub fn add_competitor(
        &mut self,
        name: impl Into<String>,
        price: f64,
        attributes: BTreeMap<String, f64>,
    ) -> Result<(), ValidationError> {
        self.competitors.push(Competitor::new(name, price, attributes)?);
        Ok(())
    }

    pub fn add_value_factor(
        &mut self,
        name: impl Into<String>,
        importance: f64,
        score: f64,
    ) -> Result<(), ValidationError> {
        self.value_factors.push(ValueFactor::new(name, importance, score)?);
        Ok(())
    }

    /// Add a segment rated on a 0-10 "how price sensitive" scale
    ///
    /// The scale maps linearly onto an elasticity in `[-10, -0.5]`.
    pub fn add_segment(
        &mut self,
        name: impl Into<String>,
        size: f64,
        price_sensitivity: f64,
        description: impl Into<String>,
    ) -> Result<SegmentId, ValidationError> {
        let scale = finite("price sensitivity", price_sensitivity)?;
        if !(0.0..=10.0).contains(&scale) {
            return Err(ValidationError::OutOfRange {
                field: "price sensitivity",
                value: scale,
                expected: "0 <= sensitivity <= 10",
            });
        }
        let elasticity = -((scale / 10.0) * 9.5 + 0.5);
        self.segments.add_segment(name, size, elasticity, description)
    }

    pub fn set_market_position(&mut self, position: &str) -> Result<(), ValidationError> {
        self.market_position = position.parse()?;
        Ok(())
    }

    pub fn weighted_elasticity(&self) -> f64 {
        self.segments.weighted_elasticity()
    }

    pub fn cost_plus_price(&self, margin_multiplier: f64) -> f64 {
        self.cost_model.minimum_viable_price()
            * self.market_position.cost_plus_multiplier()
            * margin_multiplier
    }

    fn average_competitor_price(&self) -> Option<f64> {
        if self.competitors.is_empty() {
            return None;
        }
        let total: f64 = self.competitors.iter().map(|c| c.price).sum();
        Some(total / self.competitors.len() as f64)
    }

    /// Average competitor price adjusted for market position, never below the
    /// minimum viable price
    pub fn competitor_indexed_price(&self) -> f64 {
        let Some(average) = self.average_competitor_price() else {
            return self.cost_plus_price(1.0);
        };
        let base = average * self.market_position.competitor_multiplier();
        base.max(self.cost_model.minimum_viable_price())
    }

    fn value_inputs(&self) -> Option<ValueInputs> {
        if self.competitors.is_empty() || self.value_factors.is_empty() {
            return None;
        }

        let total_importance: f64 = self.value_factors.iter().map(|f| f.importance).sum();
        if total_importance == 0.0 {
            return None;
        }
        let value_score = self
            .value_factors
            .iter()
            .map(|f| f.importance * f.score)
            .sum::<f64>()
            / total_importance;

        let count = self.competitors.len() as f64;
        let average_value = self.competitors.iter().map(|c| c.overall_value).sum::<f64>() / count;
        let average_price = self.average_competitor_price()?;
        if average_price == 0.0 {
            return None;
        }
        let market_value_to_price = average_value / average_price;
        if market_value_to_price <= 0.0 {
            return None;
        }

        Some(ValueInputs {
            value_score,
            market_value_to_price,
        })
    }

    /// Price our value score would command at the market's value-to-price
    /// ratio, never below the minimum viable price
    pub fn value_based_price(&self) -> f64 {
        let Some(inputs) = self.value_inputs() else {
            return self.cost_plus_price(1.0);
        };
        let raw = inputs.value_score / inputs.market_value_to_price;
        let adjusted = raw * self.market_position.value_multiplier();
        adjusted.max(self.cost_model.minimum_viable_price())
    }

    fn optimal_price(&self) -> f64 {
        let (cost_weight, competitor_weight, value_weight) = OPTIMAL_WEIGHTS;
        cost_weight * self.cost_plus_price(1.0)
            + competitor_weight * self.competitor_indexed_price()
            + value_weight * self.value_based_price()
    }

    fn confidence(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::CostPlus => 0.8,
            Strategy::Competitor => {
                if self.competitors.len() > 2 {
                    0.7
                } else {
                    0.5
                }
            }
            Strategy::Value => {
                if !self.competitors.is_empty() && self.value_factors.len() > 2 {
                    0.75
                } else {
                    0.4
                }
            }
            Strategy::Optimal => 0.65,
        }
    }

    fn explain(&self, strategy: Strategy) -> String {
        let cost = self.cost_model;
        let position = self.market_position;
        match strategy {
            Strategy::CostPlus => format!(
                "Total cost per unit of {:.2} with a {:.0}% target margin gives a minimum viable price of {:.2}, adjusted for {} positioning.",
                cost.total_cost_per_unit(),
                cost.target_margin() * 100.0,
                cost.minimum_viable_price(),
                position
            ),
            Strategy::Competitor => match self.average_competitor_price() {
                Some(average) => format!(
                    "Average price of {} competitor(s) is {:.2}; adjusted for {} positioning and kept at or above the minimum viable price of {:.2}.",
                    self.competitors.len(),
                    average,
                    position,
                    cost.minimum_viable_price()
                ),
                None => "No competitor data available; falling back to cost-plus pricing.".to_string(),
            },
            Strategy::Value => match self.value_inputs() {
                Some(inputs) => format!(
                    "Weighted value score of {:.2} priced at the market value-to-price ratio of {:.4}; adjusted for {} positioning and kept at or above the minimum viable price of {:.2}.",
                    inputs.value_score,
                    inputs.market_value_to_price,
                    position,
                    cost.minimum_viable_price()
                ),
                None => "Not enough competitor and value factor data; falling back to cost-plus pricing.".to_string(),
            },
            Strategy::Optimal => "Blend of 40% cost-plus, 30% competitor-indexed and 30% value-based pricing.".to_string(),
        }
    }

    pub fn price_recommendation(&self, strategy: Strategy) -> Recommendation {
        let raw = match strategy {
            Strategy::CostPlus => self.cost_plus_price(1.0),
            Strategy::Competitor => self.competitor_indexed_price(),
            Strategy::Value => self.value_based_price(),
            Strategy::Optimal => self.optimal_price(),
        };
        let price = round_price(raw);

        Recommendation {
            strategy,
            price,
            explanation: self.explain(strategy),
            confidence_level: self.confidence(strategy),
            margin: self.cost_model.margin_at_price(price).unwrap_or(0.0),
            break_even_volume: self.cost_model.break_even_volume(price),
        }
    }

    /// Every strategy, each computed independently from the current state
    pub fn all_price_recommendations(&self) -> BTreeMap<Strategy, Recommendation> {
        Strategy::all()
            .iter()
            .map(|s| (*s, self.price_recommendation(*s)))
            .collect()
    }

    pub fn snapshot(&self) -> PricingSnapshot {
        PricingSnapshot {
            version: SNAPSHOT_VERSION,
            market_position: self.market_position,
            competitors: self.competitors.clone(),
            value_factors: self.value_factors.clone(),
            segments: self.segments.segments().to_vec(),
            weighted_elasticity: self.weighted_elasticity(),
        }
    }

    pub fn recommendation_snapshot(&self) -> RecommendationSnapshot {
        RecommendationSnapshot::from_recommendations(self.all_price_recommendations())
    }
}

fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::cost::CostPeriod;

    fn consulting_costs() -> CostModel {
        let mut model = CostModel::new("consulting");
        model.add_direct_cost("Materials", 50.0, "unit").unwrap();
        model
            .add_indirect_cost("Office rent", 2000.0, CostPeriod::Month)
            .unwrap();
        model.add_time_cost("Consulting", 75.0, 8.0).unwrap();
        model.set_expected_volume(20.0).unwrap();
        model.set_target_margin(0.3).unwrap();
        model
    }

    fn attrs(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_cost_plus_price_by_position() {
        let costs = consulting_costs();
        let mut model = PricingModel::new(&costs);
        let mvp = costs.minimum_viable_price();

        assert!((model.cost_plus_price(1.0) - mvp).abs() < 1e-9);
        model.set_market_position("premium").unwrap();
        assert!((model.cost_plus_price(1.0) - mvp * 1.2).abs() < 1e-9);
        model.set_market_position("budget").unwrap();
        assert!((model.cost_plus_price(2.0) - mvp * 0.9 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_competitor_price_without_competitors_is_cost_plus() {
        let costs = consulting_costs();
        let model = PricingModel::new(&costs);
        assert_eq!(model.competitor_indexed_price(), model.cost_plus_price(1.0));
    }

    #[test]
    fn test_competitor_price_is_floored_at_minimum_viable() {
        let costs = consulting_costs();
        let mut model = PricingModel::new(&costs);
        model.add_competitor("Cheap", 400.0, BTreeMap::new()).unwrap();
        model.add_competitor("Cheaper", 600.0, BTreeMap::new()).unwrap();

        assert_eq!(
            model.competitor_indexed_price(),
            costs.minimum_viable_price()
        );
    }

    #[test]
    fn test_competitor_price_follows_market() {
        let costs = consulting_costs();
        let mut model = PricingModel::new(&costs);
        model.add_competitor("A", 1200.0, BTreeMap::new()).unwrap();
        model.add_competitor("B", 1400.0, BTreeMap::new()).unwrap();

        assert_eq!(model.competitor_indexed_price(), 1300.0);
        model.set_market_position("premium").unwrap();
        assert_eq!(model.competitor_indexed_price(), 1625.0);
    }

    #[test]
    fn test_value_price_falls_back_without_inputs() {
        let costs = consulting_costs();
        let mut model = PricingModel::new(&costs);
        assert_eq!(model.value_based_price(), model.cost_plus_price(1.0));

        model.add_competitor("A", 1200.0, BTreeMap::new()).unwrap();
        assert_eq!(model.value_based_price(), model.cost_plus_price(1.0));

        model.add_value_factor("Quality", 0.0, 9.0).unwrap();
        assert_eq!(model.value_based_price(), model.cost_plus_price(1.0));
    }

    #[test]
    fn test_value_price() {
        let costs = consulting_costs();
        let mut model = PricingModel::new(&costs);
        model
            .add_competitor("A", 1000.0, attrs(&[("quality", 6.0), ("service", 4.0)]))
            .unwrap();
        model
            .add_competitor("B", 1500.0, attrs(&[("quality", 5.0)]))
            .unwrap();
        model.add_value_factor("Quality", 3.0, 9.0).unwrap();
        model.add_value_factor("Service", 1.0, 5.0).unwrap();

        // value score = (27 + 5) / 4 = 8; ratio = 5 / 1250 = 0.004; raw = 2000
        assert!((model.value_based_price() - 2000.0).abs() < 1e-6);
        model.set_market_position("premium").unwrap();
        assert!((model.value_based_price() - 2300.0).abs() < 1e-6);
    }

    #[test]
    fn test_value_price_with_free_competitors_falls_back() {
        let costs = consulting_costs();
        let mut model = PricingModel::new(&costs);
        model.add_competitor("Free", 0.0, BTreeMap::new()).unwrap();
        model.add_value_factor("Quality", 1.0, 9.0).unwrap();
        assert_eq!(model.value_based_price(), model.cost_plus_price(1.0));
    }

    #[test]
    fn test_unknown_market_position_rejected() {
        let costs = consulting_costs();
        let mut model = PricingModel::new(&costs);
        model.set_market_position("premium").unwrap();

        let err = model.set_market_position("luxury").unwrap_err();
        assert_eq!(err, ValidationError::UnknownMarketPosition("luxury".into()));
        assert_eq!(model.market_position(), MarketPosition::Premium);
    }

    #[test]
    fn test_segment_sensitivity_mapping() {
        let costs = consulting_costs();
        let mut model = PricingModel::new(&costs);
        let most = model.add_segment("Bargain hunters", 10.0, 10.0, "").unwrap();
        let least = model.add_segment("Loyal", 10.0, 0.0, "").unwrap();

        assert_eq!(model.segments().get(&most).unwrap().price_elasticity, -10.0);
        assert_eq!(model.segments().get(&least).unwrap().price_elasticity, -0.5);
        assert!((model.weighted_elasticity() + 5.25).abs() < 1e-12);
        assert!(model.add_segment("Off scale", 10.0, 11.0, "").is_err());
    }

    #[test]
    fn test_recommendation_fields() {
        let costs = consulting_costs();
        let model = PricingModel::new(&costs);

        let rec = model.price_recommendation(Strategy::CostPlus);
        assert_eq!(rec.price, 1071.43);
        assert_eq!(rec.confidence_level, 0.8);
        assert!((rec.margin - 0.3).abs() < 1e-4);
        assert!(rec.break_even_volume.is_finite());

        let competitor = model.price_recommendation(Strategy::Competitor);
        assert_eq!(competitor.confidence_level, 0.5);
        assert!(competitor.explanation.contains("falling back"));

        assert_eq!(model.price_recommendation(Strategy::Value).confidence_level, 0.4);
        assert_eq!(model.price_recommendation(Strategy::Optimal).confidence_level, 0.65);
    }

    #[test]
    fn test_confidence_grows_with_data() {
        let costs = consulting_costs();
        let mut model = PricingModel::new(&costs);
        for (name, price) in [("A", 1100.0), ("B", 1200.0), ("C", 1300.0)] {
            model.add_competitor(name, price, BTreeMap::new()).unwrap();
        }
        for name in ["Quality", "Speed", "Support"] {
            model.add_value_factor(name, 1.0, 7.0).unwrap();
        }

        assert_eq!(model.price_recommendation(Strategy::Competitor).confidence_level, 0.7);
        assert_eq!(model.price_recommendation(Strategy::Value).confidence_level, 0.75);
    }

    #[test]
    fn test_optimal_is_weighted_blend() {
        let costs = consulting_costs();
        let mut model = PricingModel::new(&costs);
        model.add_competitor("A", 1200.0, BTreeMap::new()).unwrap();
        model.add_competitor("B", 1400.0, BTreeMap::new()).unwrap();
        model.add_value_factor("Quality", 1.0, 8.0).unwrap();

        let expected = 0.4 * model.cost_plus_price(1.0)
            + 0.3 * model.competitor_indexed_price()
            + 0.3 * model.value_based_price();
        let rec = model.price_recommendation(Strategy::Optimal);
        assert!((rec.price - expected).abs() < 0.01);
    }

    #[test]
    fn test_zero_cost_recommendation_has_zero_margin() {
        let costs = CostModel::default();
        let model = PricingModel::new(&costs);
        let rec = model.price_recommendation(Strategy::CostPlus);

        assert_eq!(rec.price, 0.0);
        assert_eq!(rec.margin, 0.0);
        assert_eq!(rec.break_even_volume, f64::INFINITY);
    }

    #[test]
    fn test_recommendations_reflect_latest_state() {
        let costs = consulting_costs();
        let mut model = PricingModel::new(&costs);
        let before = model.all_price_recommendations();
        assert_eq!(before.len(), 4);

        model.add_competitor("A", 5000.0, BTreeMap::new()).unwrap();
        let after = model.all_price_recommendations();
        assert!(after[&Strategy::Competitor].price > before[&Strategy::Competitor].price);
    }

    #[test]
    fn test_infinite_break_even_serializes_as_null() {
        let costs = CostModel::default();
        let model = PricingModel::new(&costs);
        let rec = model.price_recommendation(Strategy::CostPlus);

        let json = serde_json::to_value(&rec).unwrap();
        assert!(json["break_even_volume"].is_null());
        assert_eq!(json["strategy"], "cost-plus");

        let back: Recommendation = serde_json::from_value(json).unwrap();
        assert_eq!(back.break_even_volume, f64::INFINITY);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let costs = consulting_costs();
        let mut model = PricingModel::new(&costs);
        model.set_market_position("budget").unwrap();
        model
            .add_competitor("A", 1200.0, attrs(&[("quality", 7.0)]))
            .unwrap();
        model.add_value_factor("Quality", 2.0, 8.0).unwrap();
        model.add_segment("SMB", 40.0, 6.0, "Small firms").unwrap();

        let snapshot = model.snapshot();
        let restored = PricingModel::from_snapshot(&costs, &snapshot).unwrap();
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(
            restored.all_price_recommendations(),
            model.all_price_recommendations()
        );
    }

    #[test]
    fn test_snapshot_with_invalid_market_inputs_is_rejected() {
        let costs = consulting_costs();
        let mut model = PricingModel::new(&costs);
        model.add_competitor("A", 1200.0, BTreeMap::new()).unwrap();
        model.add_value_factor("Quality", 2.0, 8.0).unwrap();

        let mut snapshot = model.snapshot();
        snapshot.competitors[0].price = -7.0;
        assert!(matches!(
            PricingModel::from_snapshot(&costs, &snapshot),
            Err(ValidationError::Negative { field: "competitor price", .. })
        ));

        let mut snapshot = model.snapshot();
        snapshot.value_factors[0].importance = f64::NAN;
        assert!(PricingModel::from_snapshot(&costs, &snapshot).is_err());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("cost-plus".parse::<Strategy>().unwrap(), Strategy::CostPlus);
        assert_eq!("Optimal".parse::<Strategy>().unwrap(), Strategy::Optimal);
        assert!(matches!(
            "cheapest".parse::<Strategy>(),
            Err(ValidationError::UnknownStrategy(_))
        ));
    }
}
