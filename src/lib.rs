//! PricePlan: pricing recommendations for small businesses
//!
//! Builds a per-unit cost model, prices it under cost-plus,
//! competitor-indexed, value-based and blended strategies, and keeps named
//! scenarios of each analysis in a pluggable key-value store.

pub mod cli;
pub mod core;
pub mod entities;
pub mod schema;
