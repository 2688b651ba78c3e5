//! `priceplan scenario` command - saved scenario management

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{
    format_money, format_percent, load_config, open_store, print_structured, render_csv,
    render_table, truncate_str,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::scenario::Scenario;

#[derive(Subcommand, Debug)]
pub enum ScenarioCommands {
    /// List saved scenarios
    List,

    /// Show one scenario in full
    Show {
        /// Scenario name
        name: String,
    },

    /// Delete a scenario
    Delete {
        /// Scenario name
        name: String,
    },

    /// Compare the optimal price and margin of two scenarios
    Compare {
        /// First scenario (A)
        a: String,
        /// Second scenario (B)
        b: String,
    },

    /// Remove all saved data, scenarios included
    Clear {
        /// Confirm removal
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(cmd: ScenarioCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ScenarioCommands::List => run_list(global),
        ScenarioCommands::Show { name } => run_show(&name, global),
        ScenarioCommands::Delete { name } => run_delete(&name, global),
        ScenarioCommands::Compare { a, b } => run_compare(&a, &b, global),
        ScenarioCommands::Clear { yes } => run_clear(yes, global),
    }
}

fn scenario_row(scenario: &Scenario, currency: &str) -> Vec<String> {
    let optimal = scenario.optimal();
    vec![
        scenario.name.clone(),
        scenario.created_at.format("%Y-%m-%d %H:%M").to_string(),
        scenario
            .payload
            .cost
            .as_ref()
            .map(|c| truncate_str(&c.business_type, 20))
            .unwrap_or_default(),
        optimal
            .map(|r| format_money(currency, r.price))
            .unwrap_or_else(|| "-".to_string()),
        optimal
            .map(|r| format_percent(r.margin))
            .unwrap_or_else(|| "-".to_string()),
    ]
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let store = open_store(global)?;
    let scenarios = store.all_scenarios()?;

    let format = global
        .format
        .resolve(config.default_format.as_deref(), OutputFormat::Table);
    match format {
        OutputFormat::Json | OutputFormat::Yaml => print_structured(&scenarios, format)?,
        OutputFormat::Csv => {
            let rows: Vec<Vec<String>> = scenarios
                .values()
                .map(|s| scenario_row(s, ""))
                .collect();
            print!(
                "{}",
                render_csv(&["name", "created_at", "business_type", "price", "margin"], &rows)?
            );
        }
        OutputFormat::Table | OutputFormat::Auto => {
            if scenarios.is_empty() {
                if !global.quiet {
                    println!("No scenarios saved.");
                }
                return Ok(());
            }
            let rows: Vec<Vec<String>> = scenarios
                .values()
                .map(|s| scenario_row(s, config.currency()))
                .collect();
            println!(
                "{}",
                render_table(&["Name", "Saved", "Business", "Optimal price", "Margin"], &rows)
            );
            if !global.quiet {
                println!("{} scenario(s)", scenarios.len());
            }
        }
    }
    Ok(())
}

fn run_show(name: &str, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let store = open_store(global)?;
    let scenario = store
        .load_scenario(name)?
        .ok_or_else(|| miette::miette!("No scenario named '{}'", name))?;

    let format = match global
        .format
        .resolve(config.default_format.as_deref(), OutputFormat::Yaml)
    {
        OutputFormat::Json => OutputFormat::Json,
        _ => OutputFormat::Yaml,
    };
    print_structured(&scenario, format)
}

fn run_delete(name: &str, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    if !store.delete_scenario(name)? {
        return Err(miette::miette!("No scenario named '{}'", name));
    }
    if !global.quiet {
        println!(
            "{} Deleted scenario {}",
            style("✓").green(),
            style(name).cyan()
        );
    }
    Ok(())
}

fn run_compare(a: &str, b: &str, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let store = open_store(global)?;
    let comparison = store.compare_scenarios(a, b)?.ok_or_else(|| {
        miette::miette!(
            help = "run 'priceplan scenario list' to see saved names",
            "Both '{}' and '{}' must be saved scenarios",
            a,
            b
        )
    })?;

    let format = global
        .format
        .resolve(config.default_format.as_deref(), OutputFormat::Table);
    match format {
        OutputFormat::Json | OutputFormat::Yaml => print_structured(&comparison, format),
        OutputFormat::Csv => {
            let rows = vec![
                vec![
                    "price".to_string(),
                    format!("{:.2}", comparison.a.price),
                    format!("{:.2}", comparison.b.price),
                    format!("{:.2}", comparison.price_difference),
                ],
                vec![
                    "margin".to_string(),
                    format!("{:.4}", comparison.a.margin),
                    format!("{:.4}", comparison.b.margin),
                    format!("{:.4}", comparison.margin_difference),
                ],
            ];
            print!(
                "{}",
                render_csv(&["metric", &comparison.a.name, &comparison.b.name, "difference"], &rows)?
            );
            Ok(())
        }
        OutputFormat::Table | OutputFormat::Auto => {
            let currency = config.currency();
            let rows = vec![
                vec![
                    "Optimal price".to_string(),
                    format_money(currency, comparison.a.price),
                    format_money(currency, comparison.b.price),
                    format!("{:+.2}", comparison.price_difference),
                ],
                vec![
                    "Margin".to_string(),
                    format_percent(comparison.a.margin),
                    format_percent(comparison.b.margin),
                    format!("{:+.1} pts", comparison.margin_difference * 100.0),
                ],
            ];
            println!(
                "{}",
                render_table(&["", &comparison.a.name, &comparison.b.name, "A - B"], &rows)
            );
            Ok(())
        }
    }
}

fn run_clear(yes: bool, global: &GlobalOpts) -> Result<()> {
    if !yes {
        return Err(miette::miette!(
            help = "re-run with --yes to confirm",
            "This removes every saved scenario and category"
        ));
    }
    let mut store = open_store(global)?;
    let removed = store.clear_all_data()?;
    if !global.quiet {
        println!(
            "{} Cleared {} data categor{}",
            style("✓").green(),
            removed,
            if removed == 1 { "y" } else { "ies" }
        );
    }
    Ok(())
}
