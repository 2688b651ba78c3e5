//! Pricing domain types
//!
//! - [`CostModel`] - direct, indirect and time costs rolled up per unit
//! - [`CustomerSegmentAggregator`] - segments and size-weighted elasticity
//! - [`PricingModel`] - cost-plus, competitor, value and blended prices
//! - [`Scenario`] - named snapshot of an analysis for later comparison
//! - [`Workbook`] - YAML input describing one analysis

pub mod cost;
pub mod market;
pub mod pricing;
pub mod scenario;
pub mod segment;
pub mod workbook;

pub use cost::{CostModel, CostPeriod, DirectCost, IndirectCost, TimeCost};
pub use market::{Competitor, ValueFactor};
pub use pricing::{MarketPosition, PricingModel, Recommendation, Strategy};
pub use scenario::{
    CostSnapshot, PricingSnapshot, RecommendationSnapshot, Scenario, ScenarioPayload,
};
pub use segment::{CustomerSegment, CustomerSegmentAggregator, SegmentUpdate};
pub use workbook::Workbook;
