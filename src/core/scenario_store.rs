//! Scenario store - named analysis snapshots and whole-application
//! export/import on top of a [`StoragePort`]
//!
//! Every category is stored as one JSON document under its own key. Updates
//! are read-modify-write with last-write-wins semantics; callers must not
//! interleave saves to the same store.

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::category::DataCategory;
use crate::core::error::ValidationError;
use crate::core::storage::{StorageError, StoragePort};
use crate::entities::cost::CostModel;
use crate::entities::market::{Competitor, ValueFactor};
use crate::entities::scenario::{
    CostSnapshot, PricingSnapshot, Scenario, ScenarioPayload, SNAPSHOT_VERSION,
};
use crate::entities::pricing::PricingModel;

/// Every category of application data in one document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    pub cost_analysis: Option<CostSnapshot>,
    pub pricing_strategy: Option<PricingSnapshot>,
    pub business_profile: Option<Value>,
    pub competitors: Option<Vec<Competitor>>,
    pub value_factors: Option<Vec<ValueFactor>>,
    pub value_proposition: Option<Value>,
    pub value_map: Option<Value>,
    pub communication: Option<Value>,
    pub settings: Option<Value>,
    pub scenarios: Option<BTreeMap<String, Scenario>>,
}

impl ExportDocument {
    /// Serialized value of each category present in the document
    fn entries(&self) -> Result<Vec<(DataCategory, String)>, serde_json::Error> {
        fn push<T: Serialize>(
            out: &mut Vec<(DataCategory, String)>,
            category: DataCategory,
            value: &Option<T>,
        ) -> Result<(), serde_json::Error> {
            if let Some(value) = value {
                out.push((category, serde_json::to_string(value)?));
            }
            Ok(())
        }

        let mut out = Vec::new();
        push(&mut out, DataCategory::CostAnalysis, &self.cost_analysis)?;
        push(&mut out, DataCategory::PricingStrategy, &self.pricing_strategy)?;
        push(&mut out, DataCategory::BusinessProfile, &self.business_profile)?;
        push(&mut out, DataCategory::Competitors, &self.competitors)?;
        push(&mut out, DataCategory::ValueFactors, &self.value_factors)?;
        push(&mut out, DataCategory::ValueProposition, &self.value_proposition)?;
        push(&mut out, DataCategory::ValueMap, &self.value_map)?;
        push(&mut out, DataCategory::Communication, &self.communication)?;
        push(&mut out, DataCategory::Settings, &self.settings)?;
        push(&mut out, DataCategory::Scenarios, &self.scenarios)?;
        Ok(out)
    }

    /// Reject documents whose snapshots would not load
    fn validate(&self) -> Result<(), StoreError> {
        check_version("document", self.version)?;
        if let Some(cost) = &self.cost_analysis {
            check_cost("cost_analysis", cost)?;
        }
        if let Some(pricing) = &self.pricing_strategy {
            check_pricing("pricing_strategy", pricing)?;
        }
        for competitor in self.competitors.iter().flatten() {
            competitor
                .validate()
                .map_err(|e| StoreError::Import(format!("competitors: {}", e)))?;
        }
        for factor in self.value_factors.iter().flatten() {
            factor
                .validate()
                .map_err(|e| StoreError::Import(format!("value_factors: {}", e)))?;
        }
        if let Some(scenarios) = &self.scenarios {
            for (key, scenario) in scenarios {
                if key.trim().is_empty() || key.trim() != key {
                    return Err(StoreError::Import(format!(
                        "scenario name '{}' is blank or padded with whitespace",
                        key
                    )));
                }
                if key != &scenario.name {
                    return Err(StoreError::Import(format!(
                        "scenario stored under '{}' is named '{}'",
                        key, scenario.name
                    )));
                }
                let context = format!("scenario '{}'", key);
                check_version(&context, scenario.version)?;
                if let Some(cost) = &scenario.payload.cost {
                    check_cost(&context, cost)?;
                }
                if let Some(pricing) = &scenario.payload.pricing {
                    check_pricing(&context, pricing)?;
                }
            }
        }
        Ok(())
    }
}

fn check_version(context: &str, version: u32) -> Result<(), StoreError> {
    if version > SNAPSHOT_VERSION {
        return Err(StoreError::Import(format!(
            "{}: version {} is newer than supported version {}",
            context, version, SNAPSHOT_VERSION
        )));
    }
    Ok(())
}

fn check_cost(context: &str, snapshot: &CostSnapshot) -> Result<(), StoreError> {
    check_version(context, snapshot.version)?;
    CostModel::from_snapshot(snapshot)
        .map_err(|e| StoreError::Import(format!("{}: {}", context, e)))?;
    Ok(())
}

/// Market inputs and segments are checked without a cost model of their own
fn check_pricing(context: &str, snapshot: &PricingSnapshot) -> Result<(), StoreError> {
    check_version(context, snapshot.version)?;
    let costs = CostModel::default();
    PricingModel::from_snapshot(&costs, snapshot)
        .map_err(|e| StoreError::Import(format!("{}: {}", context, e)))?;
    Ok(())
}

fn entry<T: Serialize>(category: DataCategory, value: &T) -> Result<(String, String), StoreError> {
    let raw = serde_json::to_string(value)
        .map_err(|source| StoreError::Serialize { category, source })?;
    Ok((category.storage_key(), raw))
}

/// Scenario names are matched with surrounding whitespace removed
fn scenario_key(name: &str) -> &str {
    name.trim()
}

/// Price and margin of one scenario's optimal recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioFigures {
    pub name: String,
    pub price: f64,
    pub margin: f64,
}

/// Side-by-side figures for two scenarios; differences are A − B
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioComparison {
    pub a: ScenarioFigures,
    pub b: ScenarioFigures,
    pub price_difference: f64,
    pub margin_difference: f64,
}

/// Errors surfaced by the scenario store
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error("stored {category} data is unreadable: {source}")]
    #[diagnostic(
        code(priceplan::store::corrupt),
        help("export what is still readable, then clear or re-import the category")
    )]
    Corrupt {
        category: DataCategory,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not parse import document: {0}")]
    #[diagnostic(code(priceplan::store::parse))]
    Parse(#[source] serde_json::Error),

    #[error("import rejected: {0}")]
    #[diagnostic(code(priceplan::store::import))]
    Import(String),

    #[error("could not serialize {category}: {source}")]
    #[diagnostic(code(priceplan::store::serialize))]
    Serialize {
        category: DataCategory,
        #[source]
        source: serde_json::Error,
    },
}

/// Categories written by an import
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportSummary {
    pub categories: Vec<DataCategory>,
    pub scenarios: usize,
}

/// Scenario persistence over an injected backend
pub struct ScenarioStore<S: StoragePort> {
    storage: S,
}

impl<S: StoragePort> ScenarioStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read a category, `None` when it has never been written
    pub fn load_category<T: DeserializeOwned>(
        &self,
        category: DataCategory,
    ) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.storage.get(&category.storage_key())? else {
            return Ok(None);
        };
        debug!(%category, bytes = raw.len(), "loaded category");
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt { category, source })
    }

    /// Overwrite a category
    pub fn save_category<T: Serialize>(
        &mut self,
        category: DataCategory,
        value: &T,
    ) -> Result<(), StoreError> {
        let (key, raw) = entry(category, value)?;
        self.storage.set(&key, &raw)?;
        debug!(%category, "saved category");
        Ok(())
    }

    fn scenario_map(&self) -> Result<BTreeMap<String, Scenario>, StoreError> {
        Ok(self
            .load_category(DataCategory::Scenarios)?
            .unwrap_or_default())
    }

    /// Insert a scenario into the current map without writing it
    fn stage_scenario(
        &self,
        name: &str,
        payload: ScenarioPayload,
    ) -> Result<(Scenario, BTreeMap<String, Scenario>, bool), StoreError> {
        let name = scenario_key(name);
        if name.is_empty() {
            return Err(ValidationError::Empty("scenario name").into());
        }

        let mut scenarios = self.scenario_map()?;
        let scenario = Scenario::new(name, payload);
        let replaced = scenarios
            .insert(name.to_string(), scenario.clone())
            .is_some();
        Ok((scenario, scenarios, replaced))
    }

    /// Save (or overwrite) a scenario; `created_at` is stamped now
    ///
    /// Surrounding whitespace is dropped from the name, here and in every
    /// lookup.
    pub fn save_scenario(
        &mut self,
        name: &str,
        payload: ScenarioPayload,
    ) -> Result<Scenario, StoreError> {
        let (scenario, scenarios, replaced) = self.stage_scenario(name, payload)?;
        self.save_category(DataCategory::Scenarios, &scenarios)?;

        info!(scenario = %scenario.name, replaced, "saved scenario");
        Ok(scenario)
    }

    /// Save a scenario and make its snapshots the project's current data
    ///
    /// The scenario, `cost_analysis`, `pricing_strategy`, `competitors` and
    /// `value_factors` go out in a single batch.
    pub fn save_analysis(
        &mut self,
        name: &str,
        payload: ScenarioPayload,
    ) -> Result<Scenario, StoreError> {
        let (scenario, scenarios, replaced) = self.stage_scenario(name, payload)?;

        let mut batch = vec![entry(DataCategory::Scenarios, &scenarios)?];
        if let Some(cost) = &scenario.payload.cost {
            batch.push(entry(DataCategory::CostAnalysis, cost)?);
        }
        if let Some(pricing) = &scenario.payload.pricing {
            batch.push(entry(DataCategory::PricingStrategy, pricing)?);
            batch.push(entry(DataCategory::Competitors, &pricing.competitors)?);
            batch.push(entry(DataCategory::ValueFactors, &pricing.value_factors)?);
        }
        self.storage.set_many(&batch)?;

        info!(scenario = %scenario.name, replaced, entries = batch.len(), "saved analysis");
        Ok(scenario)
    }

    pub fn load_scenario(&self, name: &str) -> Result<Option<Scenario>, StoreError> {
        Ok(self.scenario_map()?.remove(scenario_key(name)))
    }

    pub fn all_scenarios(&self) -> Result<BTreeMap<String, Scenario>, StoreError> {
        self.scenario_map()
    }

    /// Returns `false` when there is no scenario with this name
    pub fn delete_scenario(&mut self, name: &str) -> Result<bool, StoreError> {
        let name = scenario_key(name);
        let mut scenarios = self.scenario_map()?;
        if scenarios.remove(name).is_none() {
            return Ok(false);
        }
        self.save_category(DataCategory::Scenarios, &scenarios)?;
        info!(scenario = name, "deleted scenario");
        Ok(true)
    }

    /// Compare the optimal recommendations of two scenarios
    ///
    /// Returns `None` if either scenario is missing. Missing recommendation
    /// figures count as zero.
    pub fn compare_scenarios(
        &self,
        name_a: &str,
        name_b: &str,
    ) -> Result<Option<ScenarioComparison>, StoreError> {
        let scenarios = self.scenario_map()?;
        let (Some(a), Some(b)) = (
            scenarios.get(scenario_key(name_a)),
            scenarios.get(scenario_key(name_b)),
        ) else {
            return Ok(None);
        };

        let figures = |scenario: &Scenario| {
            let optimal = scenario.optimal();
            ScenarioFigures {
                name: scenario.name.clone(),
                price: optimal.map(|r| r.price).unwrap_or(0.0),
                margin: optimal.map(|r| r.margin).unwrap_or(0.0),
            }
        };
        let a = figures(a);
        let b = figures(b);

        Ok(Some(ScenarioComparison {
            price_difference: a.price - b.price,
            margin_difference: a.margin - b.margin,
            a,
            b,
        }))
    }

    /// Snapshot every category into one document
    pub fn export_all_data(&self) -> Result<ExportDocument, StoreError> {
        Ok(ExportDocument {
            version: SNAPSHOT_VERSION,
            exported_at: Some(Utc::now()),
            cost_analysis: self.load_category(DataCategory::CostAnalysis)?,
            pricing_strategy: self.load_category(DataCategory::PricingStrategy)?,
            business_profile: self.load_category(DataCategory::BusinessProfile)?,
            competitors: self.load_category(DataCategory::Competitors)?,
            value_factors: self.load_category(DataCategory::ValueFactors)?,
            value_proposition: self.load_category(DataCategory::ValueProposition)?,
            value_map: self.load_category(DataCategory::ValueMap)?,
            communication: self.load_category(DataCategory::Communication)?,
            settings: self.load_category(DataCategory::Settings)?,
            scenarios: self.load_category(DataCategory::Scenarios)?,
        })
    }

    /// Parse, validate and apply an export document
    ///
    /// Nothing is written unless the whole document is valid. Unknown
    /// top-level fields are ignored; null categories are left untouched.
    pub fn import_all_data(&mut self, json: &str) -> Result<ImportSummary, StoreError> {
        let document: ExportDocument = serde_json::from_str(json).map_err(|e| {
            warn!(error = %e, "rejected import document");
            StoreError::Parse(e)
        })?;
        self.import_document(&document)
    }

    pub fn import_document(&mut self, document: &ExportDocument) -> Result<ImportSummary, StoreError> {
        document.validate().inspect_err(|e| {
            warn!(error = %e, "rejected import document");
        })?;

        let entries = document.entries().map_err(StoreError::Parse)?;
        let batch: Vec<(String, String)> = entries
            .iter()
            .map(|(category, raw)| (category.storage_key(), raw.clone()))
            .collect();
        self.storage.set_many(&batch)?;

        let summary = ImportSummary {
            categories: entries.into_iter().map(|(category, _)| category).collect(),
            scenarios: document.scenarios.as_ref().map_or(0, BTreeMap::len),
        };
        info!(
            categories = summary.categories.len(),
            scenarios = summary.scenarios,
            "imported data"
        );
        Ok(summary)
    }

    /// Remove every category, scenarios included; returns how many existed
    pub fn clear_all_data(&mut self) -> Result<usize, StoreError> {
        let mut removed = 0;
        for category in DataCategory::all() {
            if self.storage.remove(&category.storage_key())? {
                removed += 1;
            }
        }
        info!(removed, "cleared all data");
        Ok(removed)
    }
}
