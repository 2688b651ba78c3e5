//! Workbook - YAML description of one pricing analysis
//!
//! A workbook is the file a user edits. Building models from it goes through
//! the same validated operations as programmatic use, so a workbook that
//! passes schema validation can still be rejected for e.g. a 100% margin.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::error::ValidationError;
use crate::entities::cost::{CostModel, CostPeriod};
use crate::entities::pricing::{MarketPosition, PricingModel};

fn default_business_type() -> String {
    "general".to_string()
}

fn default_target_margin() -> f64 {
    0.3
}

fn default_expected_volume() -> f64 {
    1.0
}

fn default_unit() -> String {
    "unit".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookDirectCost {
    pub name: String,
    pub amount: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookIndirectCost {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub period: CostPeriod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookTimeCost {
    pub name: String,
    pub rate: f64,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookCompetitor {
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookValueFactor {
    pub name: String,
    pub importance: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookSegment {
    pub name: String,
    pub size: f64,
    /// 0 (insensitive) to 10 (very price sensitive)
    pub price_sensitivity: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Everything needed to price one product or service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default = "default_business_type")]
    pub business_type: String,

    #[serde(default = "default_target_margin")]
    pub target_margin: f64,

    /// Units sold per month
    #[serde(default = "default_expected_volume")]
    pub expected_volume: f64,

    #[serde(default)]
    pub market_position: MarketPosition,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub direct_costs: Vec<WorkbookDirectCost>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indirect_costs: Vec<WorkbookIndirectCost>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_costs: Vec<WorkbookTimeCost>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub competitors: Vec<WorkbookCompetitor>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_factors: Vec<WorkbookValueFactor>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<WorkbookSegment>,
}

impl Workbook {
    pub fn build_cost_model(&self) -> Result<CostModel, ValidationError> {
        let mut model = CostModel::new(self.business_type.clone());
        model.set_target_margin(self.target_margin)?;
        model.set_expected_volume(self.expected_volume)?;

        for cost in &self.direct_costs {
            model.add_direct_cost(cost.name.clone(), cost.amount, cost.unit.clone())?;
        }
        for cost in &self.indirect_costs {
            model.add_indirect_cost(cost.name.clone(), cost.amount, cost.period)?;
        }
        for cost in &self.time_costs {
            model.add_time_cost(cost.name.clone(), cost.rate, cost.hours)?;
        }
        Ok(model)
    }

    pub fn build_pricing_model<'a>(
        &self,
        cost_model: &'a CostModel,
    ) -> Result<PricingModel<'a>, ValidationError> {
        let mut model = PricingModel::new(cost_model);
        model.set_market_position(&self.market_position.to_string())?;

        for competitor in &self.competitors {
            model.add_competitor(
                competitor.name.clone(),
                competitor.price,
                competitor.attributes.clone(),
            )?;
        }
        for factor in &self.value_factors {
            model.add_value_factor(factor.name.clone(), factor.importance, factor.score)?;
        }
        for segment in &self.segments {
            model.add_segment(
                segment.name.clone(),
                segment.size,
                segment.price_sensitivity,
                segment.description.clone(),
            )?;
        }
        Ok(model)
    }
}
