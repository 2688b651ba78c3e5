//! `priceplan analyze` command - price a workbook under every strategy

use console::style;
use miette::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::helpers::{
    format_money, format_percent, format_volume, load_config, open_store, print_structured,
    render_csv, render_table,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::ValidationError;
use crate::entities::cost::CostModel;
use crate::entities::pricing::{MarketPosition, PricingModel, Recommendation, Strategy};
use crate::entities::scenario::{RecommendationSnapshot, ScenarioPayload};
use crate::schema::{WorkbookError, WorkbookValidator};

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Workbook file describing costs, competitors and segments
    pub workbook: PathBuf,

    /// Strategy to recommend: cost-plus, competitor, value, optimal
    /// (default: from config, else optimal)
    #[arg(long, short = 's')]
    pub strategy: Option<String>,

    /// Save the analysis as a named scenario in the project store
    #[arg(long, value_name = "NAME")]
    pub save: Option<String>,
}

/// Structured form of an analysis, for json/yaml output
#[derive(Debug, Serialize)]
struct AnalysisReport<'a> {
    business_type: &'a str,
    market_position: MarketPosition,
    total_cost_per_unit: f64,
    minimum_viable_price: f64,
    break_even_price: f64,
    target_margin: f64,
    weighted_elasticity: f64,
    recommended: Strategy,
    recommendations: Vec<&'a Recommendation>,
}

pub fn run(args: AnalyzeArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let recommended = match &args.strategy {
        Some(name) => name.parse::<Strategy>()?,
        None => config.strategy(),
    };

    let validator = WorkbookValidator::new()?;
    let workbook = validator.load(&args.workbook)?;

    let path = args.workbook.display().to_string();
    let invalid = |source: ValidationError| WorkbookError::Invalid {
        path: path.clone(),
        source,
    };
    let costs = workbook.build_cost_model().map_err(invalid)?;
    let pricing = workbook.build_pricing_model(&costs).map_err(invalid)?;
    let recommendations = pricing.all_price_recommendations();
    debug!(
        workbook = %path,
        competitors = pricing.competitors().len(),
        segments = pricing.segments().len(),
        "analyzed workbook"
    );

    let format = global
        .format
        .resolve(config.default_format.as_deref(), OutputFormat::Table);
    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let report = AnalysisReport {
                business_type: costs.business_type(),
                market_position: pricing.market_position(),
                total_cost_per_unit: costs.total_cost_per_unit(),
                minimum_viable_price: costs.minimum_viable_price(),
                break_even_price: costs.break_even_price(),
                target_margin: costs.target_margin(),
                weighted_elasticity: pricing.weighted_elasticity(),
                recommended,
                recommendations: recommendations.values().collect(),
            };
            print_structured(&report, format)?;
        }
        OutputFormat::Csv => {
            let rows: Vec<Vec<String>> = recommendations
                .values()
                .map(|r| {
                    vec![
                        r.strategy.to_string(),
                        format!("{:.2}", r.price),
                        format!("{:.4}", r.margin),
                        if r.break_even_volume.is_finite() {
                            format!("{:.2}", r.break_even_volume)
                        } else {
                            String::new()
                        },
                        format!("{:.2}", r.confidence_level),
                        r.explanation.clone(),
                    ]
                })
                .collect();
            print!(
                "{}",
                render_csv(
                    &["strategy", "price", "margin", "break_even_volume", "confidence", "explanation"],
                    &rows
                )?
            );
        }
        OutputFormat::Table | OutputFormat::Auto => {
            print_summary(&costs, &pricing, &recommendations, recommended, config.currency());
        }
    }

    if let Some(name) = &args.save {
        let mut store = open_store(global)?;
        let payload = ScenarioPayload {
            cost: Some(costs.snapshot()),
            pricing: Some(pricing.snapshot()),
            recommendations: Some(RecommendationSnapshot::from_recommendations(
                recommendations.clone(),
            )),
        };
        let scenario = store.save_analysis(name, payload)?;

        if !global.quiet && matches!(format, OutputFormat::Table | OutputFormat::Auto) {
            println!();
            println!(
                "{} Saved scenario {}",
                style("✓").green(),
                style(&scenario.name).cyan()
            );
        }
    }

    Ok(())
}

fn print_summary(
    costs: &CostModel,
    pricing: &PricingModel<'_>,
    recommendations: &BTreeMap<Strategy, Recommendation>,
    recommended: Strategy,
    currency: &str,
) {
    println!(
        "{} ({} positioning)",
        style(costs.business_type()).bold(),
        pricing.market_position()
    );
    println!(
        "  Cost per unit:        {}",
        format_money(currency, costs.total_cost_per_unit())
    );
    println!(
        "  Minimum viable price: {} at {} margin",
        format_money(currency, costs.minimum_viable_price()),
        format_percent(costs.target_margin())
    );
    if !pricing.segments().is_empty() {
        println!(
            "  Weighted elasticity:  {:.2}",
            pricing.weighted_elasticity()
        );
    }
    println!();

    let rows: Vec<Vec<String>> = recommendations
        .values()
        .map(|r| {
            let marker = if r.strategy == recommended { " *" } else { "" };
            vec![
                format!("{}{}", r.strategy.label(), marker),
                format_money(currency, r.price),
                format_percent(r.margin),
                format_volume(r.break_even_volume),
                format!("{:.0}%", r.confidence_level * 100.0),
            ]
        })
        .collect();
    println!(
        "{}",
        render_table(
            &["Strategy", "Price", "Margin", "Break-even units/mo", "Confidence"],
            &rows
        )
    );

    if let Some(chosen) = recommendations.get(&recommended) {
        println!();
        println!(
            "Recommended price: {}",
            style(format_money(currency, chosen.price)).green().bold()
        );
        println!("  {}", chosen.explanation);
    }
}
