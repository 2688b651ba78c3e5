//! Shared helper functions for CLI commands

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, Project, ScenarioStore, SqliteStorage};

/// Locate the project from `--project` or the current directory
pub fn find_project(global: &GlobalOpts) -> Result<Project> {
    let found = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    };
    found.map_err(|e| miette::miette!("{}", e))
}

/// Configuration for the project in scope, if there is one
pub fn load_config(global: &GlobalOpts) -> Config {
    let project = find_project(global).ok();
    Config::load_for(project.as_ref())
}

/// Open the project's scenario store
pub fn open_store(global: &GlobalOpts) -> Result<ScenarioStore<SqliteStorage>> {
    let project = find_project(global)?;
    let storage = SqliteStorage::open(&project.store_path())?;
    Ok(ScenarioStore::new(storage))
}

pub fn format_money(symbol: &str, amount: f64) -> String {
    format!("{}{:.2}", symbol, amount)
}

pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Units per month; unreachable break-even prints as "never"
pub fn format_volume(volume: f64) -> String {
    if volume.is_finite() {
        format!("{:.1}", volume)
    } else {
        "never".to_string()
    }
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render rows as a rounded table
pub fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(header.iter().copied());
    for row in rows {
        builder.push_record(row.iter().map(String::as_str));
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Render rows as CSV
pub fn render_csv(header: &[&str], rows: &[Vec<String>]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header).into_diagnostic()?;
    for row in rows {
        writer.write_record(row).into_diagnostic()?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| miette::miette!("{}", e.error()))?;
    String::from_utf8(bytes).into_diagnostic()
}

/// Print a serializable value as JSON or YAML
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).into_diagnostic()?,
        _ => serde_yml::to_string(value).into_diagnostic()?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_money("$", 1071.428), "$1071.43");
        assert_eq!(format_percent(0.3), "30.0%");
        assert_eq!(format_volume(f64::INFINITY), "never");
        assert_eq!(format_volume(4.74), "4.7");
    }

    #[test]
    fn test_render_csv_quotes_commas() {
        let csv = render_csv(&["name", "note"], &[vec!["A".into(), "x, y".into()]]).unwrap();
        assert_eq!(csv, "name,note\nA,\"x, y\"\n");
    }

    #[test]
    fn test_render_table_contains_cells() {
        let table = render_table(&["Strategy", "Price"], &[vec!["Cost-Plus".into(), "$1.00".into()]]);
        assert!(table.contains("Cost-Plus"));
        assert!(table.contains("$1.00"));
    }
}
