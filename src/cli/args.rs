//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    analyze::AnalyzeArgs, completions::CompletionsArgs, data::DataCommands, init::InitArgs,
    scenario::ScenarioCommands, workbook::WorkbookCommands,
};

#[derive(Parser)]
#[command(name = "priceplan")]
#[command(author, version, about = "Pricing recommendations for small businesses")]
#[command(long_about = "Work out what to charge from your costs, your competitors and the value you deliver, then save and compare pricing scenarios.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .priceplan/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new PricePlan project
    Init(InitArgs),

    /// Create and check workbook files
    #[command(subcommand)]
    Workbook(WorkbookCommands),

    /// Price a workbook under every strategy
    Analyze(AnalyzeArgs),

    /// Saved scenario management
    #[command(subcommand)]
    Scenario(ScenarioCommands),

    /// Export or import all project data
    #[command(subcommand)]
    Data(DataCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table for listings, YAML for single records
    #[default]
    Auto,
    /// Human-readable table
    Table,
    /// JSON format (for programming)
    Json,
    /// YAML format (full fidelity)
    Yaml,
    /// CSV format (for spreadsheets)
    Csv,
}

impl OutputFormat {
    /// Resolve `auto` using the configured default, then `fallback`
    pub fn resolve(self, configured: Option<&str>, fallback: OutputFormat) -> OutputFormat {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|name| OutputFormat::from_str(name, true).ok())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_format_resolution() {
        assert_eq!(
            OutputFormat::Auto.resolve(None, OutputFormat::Table),
            OutputFormat::Table
        );
        assert_eq!(
            OutputFormat::Auto.resolve(Some("json"), OutputFormat::Table),
            OutputFormat::Json
        );
        assert_eq!(
            OutputFormat::Csv.resolve(Some("json"), OutputFormat::Table),
            OutputFormat::Csv
        );
        assert_eq!(
            OutputFormat::Auto.resolve(Some("nonsense"), OutputFormat::Yaml),
            OutputFormat::Yaml
        );
    }
}
