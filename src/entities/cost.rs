//! Cost model - direct, indirect and time costs rolled up per unit

use serde::{Deserialize, Serialize};

use crate::core::error::{non_negative, ValidationError};
use crate::entities::scenario::{CostSnapshot, SNAPSHOT_VERSION};

fn default_unit() -> String {
    "unit".to_string()
}

/// Billing period of an indirect (overhead) cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CostPeriod {
    #[default]
    Month,
    Year,
}

impl CostPeriod {
    /// Convert an amount billed in this period to a monthly amount
    pub fn to_monthly(&self, amount: f64) -> f64 {
        match self {
            CostPeriod::Month => amount,
            CostPeriod::Year => amount / 12.0,
        }
    }
}

impl std::fmt::Display for CostPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostPeriod::Month => write!(f, "month"),
            CostPeriod::Year => write!(f, "year"),
        }
    }
}

impl std::str::FromStr for CostPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "month" | "monthly" => Ok(CostPeriod::Month),
            "year" | "yearly" | "annual" => Ok(CostPeriod::Year),
            _ => Err(format!("Invalid period: {}. Use 'month' or 'year'", s)),
        }
    }
}

/// A cost incurred for every unit sold (materials, packaging, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectCost {
    pub name: String,
    pub amount: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
}

/// An overhead cost shared across the expected volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndirectCost {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub period: CostPeriod,
}

/// Labour spent per unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeCost {
    pub name: String,
    /// Currency per hour
    pub rate: f64,
    pub hours: f64,
}

impl TimeCost {
    pub fn total(&self) -> f64 {
        self.rate * self.hours
    }
}

/// Aggregates costs into a per-unit cost and minimum viable price
#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    business_type: String,
    target_margin: f64,
    expected_volume: f64,
    direct_costs: Vec<DirectCost>,
    indirect_costs: Vec<IndirectCost>,
    time_costs: Vec<TimeCost>,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            business_type: "general".to_string(),
            target_margin: 0.3,
            expected_volume: 1.0,
            direct_costs: Vec::new(),
            indirect_costs: Vec::new(),
            time_costs: Vec::new(),
        }
    }
}

impl CostModel {
    pub fn new(business_type: impl Into<String>) -> Self {
        Self {
            business_type: business_type.into(),
            ..Default::default()
        }
    }

    pub fn business_type(&self) -> &str {
        &self.business_type
    }

    pub fn target_margin(&self) -> f64 {
        self.target_margin
    }

    pub fn expected_volume(&self) -> f64 {
        self.expected_volume
    }

    pub fn direct_costs(&self) -> &[DirectCost] {
        &self.direct_costs
    }

    pub fn indirect_costs(&self) -> &[IndirectCost] {
        &self.indirect_costs
    }

    pub fn time_costs(&self) -> &[TimeCost] {
        &self.time_costs
    }

    pub fn set_business_type(&mut self, business_type: impl Into<String>) {
        self.business_type = business_type.into();
    }

    pub fn add_direct_cost(
        &mut self,
        name: impl Into<String>,
        amount: f64,
        unit: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let amount = non_negative("direct cost amount", amount)?;
        self.direct_costs.push(DirectCost {
            name: name.into(),
            amount,
            unit: unit.into(),
        });
        Ok(())
    }

    pub fn add_indirect_cost(
        &mut self,
        name: impl Into<String>,
        amount: f64,
        period: CostPeriod,
    ) -> Result<(), ValidationError> {
        let amount = non_negative("indirect cost amount", amount)?;
        self.indirect_costs.push(IndirectCost {
            name: name.into(),
            amount,
            period,
        });
        Ok(())
    }

    pub fn add_time_cost(
        &mut self,
        name: impl Into<String>,
        rate: f64,
        hours: f64,
    ) -> Result<(), ValidationError> {
        let rate = non_negative("time cost rate", rate)?;
        let hours = non_negative("time cost hours", hours)?;
        self.time_costs.push(TimeCost {
            name: name.into(),
            rate,
            hours,
        });
        Ok(())
    }

    /// Set the target margin, which must lie in `[0, 1)`
    pub fn set_target_margin(&mut self, margin: f64) -> Result<(), ValidationError> {
        let margin = non_negative("target margin", margin)?;
        if margin >= 1.0 {
            return Err(ValidationError::OutOfRange {
                field: "target margin",
                value: margin,
                expected: "0 <= margin < 1",
            });
        }
        self.target_margin = margin;
        Ok(())
    }

    /// Set the expected monthly volume, which must be positive
    pub fn set_expected_volume(&mut self, volume: f64) -> Result<(), ValidationError> {
        let volume = non_negative("expected volume", volume)?;
        if volume == 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "expected volume",
                value: volume,
                expected: "volume > 0",
            });
        }
        self.expected_volume = volume;
        Ok(())
    }

    pub fn total_direct_cost(&self) -> f64 {
        self.direct_costs.iter().map(|c| c.amount).sum()
    }

    pub fn total_time_cost(&self) -> f64 {
        self.time_costs.iter().map(TimeCost::total).sum()
    }

    /// Sum of indirect costs, with yearly costs amortized to monthly terms
    pub fn monthly_indirect_costs(&self) -> f64 {
        self.indirect_costs
            .iter()
            .map(|c| c.period.to_monthly(c.amount))
            .sum()
    }

    /// Indirect cost carried by each unit at the expected volume
    pub fn allocated_indirect_cost(&self) -> f64 {
        self.monthly_indirect_costs() / self.expected_volume
    }

    pub fn total_cost_per_unit(&self) -> f64 {
        self.total_direct_cost() + self.total_time_cost() + self.allocated_indirect_cost()
    }

    /// Lowest price that still achieves the target margin
    pub fn minimum_viable_price(&self) -> f64 {
        self.total_cost_per_unit() / (1.0 - self.target_margin)
    }

    /// Margin achieved at `price`, or `None` when the price is zero
    pub fn margin_at_price(&self, price: f64) -> Option<f64> {
        if price == 0.0 {
            return None;
        }
        Some((price - self.total_cost_per_unit()) / price)
    }

    pub fn break_even_price(&self) -> f64 {
        self.total_cost_per_unit()
    }

    /// Monthly units needed to cover indirect costs at `price`
    ///
    /// Returns `f64::INFINITY` when the price does not exceed the unit cost.
    pub fn break_even_volume(&self, price: f64) -> f64 {
        if price <= self.total_cost_per_unit() {
            return f64::INFINITY;
        }
        let contribution = price - self.total_direct_cost() - self.total_time_cost();
        self.monthly_indirect_costs() / contribution
    }

    pub fn snapshot(&self) -> CostSnapshot {
        CostSnapshot {
            version: SNAPSHOT_VERSION,
            business_type: self.business_type.clone(),
            target_margin: self.target_margin,
            expected_volume: self.expected_volume,
            direct_costs: self.direct_costs.clone(),
            indirect_costs: self.indirect_costs.clone(),
            time_costs: self.time_costs.clone(),
            total_cost_per_unit: self.total_cost_per_unit(),
            minimum_viable_price: self.minimum_viable_price(),
        }
    }

    /// Rebuild a model from a snapshot, revalidating every value
    pub fn from_snapshot(snapshot: &CostSnapshot) -> Result<Self, ValidationError> {
        let mut model = CostModel::new(snapshot.business_type.clone());
        model.set_target_margin(snapshot.target_margin)?;
        model.set_expected_volume(snapshot.expected_volume)?;
        for cost in &snapshot.direct_costs {
            model.add_direct_cost(cost.name.clone(), cost.amount, cost.unit.clone())?;
        }
        for cost in &snapshot.indirect_costs {
            model.add_indirect_cost(cost.name.clone(), cost.amount, cost.period)?;
        }
        for cost in &snapshot.time_costs {
            model.add_time_cost(cost.name.clone(), cost.rate, cost.hours)?;
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consulting_model() -> CostModel {
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

    #[test]
    fn test_consulting_scenario_totals() {
        let model = consulting_model();

        assert_eq!(model.total_direct_cost(), 50.0);
        assert_eq!(model.total_time_cost(), 600.0);
        assert_eq!(model.allocated_indirect_cost(), 100.0);
        assert_eq!(model.total_cost_per_unit(), 750.0);
        assert!((model.minimum_viable_price() - 1071.4285714).abs() < 1e-6);
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let mut model = consulting_model();
        model.add_direct_cost("Packaging", 3.25, "box").unwrap();
        model
            .add_indirect_cost("Insurance", 1200.0, CostPeriod::Year)
            .unwrap();

        let parts = model.total_direct_cost()
            + model.total_time_cost()
            + model.allocated_indirect_cost();
        assert_eq!(model.total_cost_per_unit(), parts);
    }

    #[test]
    fn test_yearly_costs_are_amortized() {
        let mut model = CostModel::default();
        model
            .add_indirect_cost("Software", 1200.0, CostPeriod::Year)
            .unwrap();
        model.set_expected_volume(10.0).unwrap();

        assert_eq!(model.monthly_indirect_costs(), 100.0);
        assert_eq!(model.allocated_indirect_cost(), 10.0);
    }

    #[test]
    fn test_margin_at_minimum_viable_price_matches_target() {
        for margin in [0.0, 0.15, 0.3, 0.6, 0.95] {
            let mut model = consulting_model();
            model.set_target_margin(margin).unwrap();
            let achieved = model
                .margin_at_price(model.minimum_viable_price())
                .unwrap();
            assert!((achieved - margin).abs() < 1e-9, "margin {}", margin);
        }
    }

    #[test]
    fn test_margin_at_zero_price_is_none() {
        assert_eq!(consulting_model().margin_at_price(0.0), None);
    }

    #[test]
    fn test_break_even_volume() {
        let model = consulting_model();

        assert_eq!(model.break_even_volume(750.0), f64::INFINITY);
        assert_eq!(model.break_even_volume(100.0), f64::INFINITY);

        // 2000 / (1050 - 50 - 600)
        assert_eq!(model.break_even_volume(1050.0), 5.0);
        assert_eq!(model.break_even_price(), 750.0);
    }

    #[test]
    fn test_invalid_inputs_are_rejected_without_mutation() {
        let mut model = consulting_model();
        let before = model.clone();

        assert!(model.add_direct_cost("Bad", f64::NAN, "unit").is_err());
        assert!(model.add_direct_cost("Bad", -1.0, "unit").is_err());
        assert!(model
            .add_indirect_cost("Bad", f64::INFINITY, CostPeriod::Month)
            .is_err());
        assert!(model.add_time_cost("Bad", 10.0, -2.0).is_err());
        assert!(model.set_target_margin(1.0).is_err());
        assert!(model.set_target_margin(-0.1).is_err());
        assert!(model.set_expected_volume(0.0).is_err());

        assert_eq!(model, before);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let model = consulting_model();
        let snapshot = model.snapshot();

        assert_eq!(snapshot.total_cost_per_unit, 750.0);
        assert_eq!(CostModel::from_snapshot(&snapshot).unwrap(), model);
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("Monthly".parse::<CostPeriod>().unwrap(), CostPeriod::Month);
        assert_eq!("year".parse::<CostPeriod>().unwrap(), CostPeriod::Year);
        assert!("weekly".parse::<CostPeriod>().is_err());
    }
}
