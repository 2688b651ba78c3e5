//! `priceplan workbook` command - starter files and validation

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::ValidationError;
use crate::entities::cost::CostModel;
use crate::entities::pricing::MarketPosition;
use crate::schema::{TemplateGenerator, WorkbookError, WorkbookTemplate, WorkbookValidator};

#[derive(Subcommand, Debug)]
pub enum WorkbookCommands {
    /// Write a starter workbook
    New(NewArgs),

    /// Check a workbook against the schema and the model rules
    Validate(ValidateArgs),

    /// Print the workbook JSON schema
    Schema,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// File to create
    pub path: PathBuf,

    /// Business type tag (e.g. consulting, bakery)
    #[arg(long = "type", short = 't', default_value = "general")]
    pub business_type: String,

    /// Target margin as a fraction (0.3 = 30%)
    #[arg(long, short = 'm', default_value_t = 0.3)]
    pub margin: f64,

    /// Expected units sold per month
    #[arg(long, default_value_t = 1.0)]
    pub volume: f64,

    /// Market position: budget, mid-market, premium
    #[arg(long, default_value = "mid-market")]
    pub position: String,

    /// Fill the workbook with sample costs, competitors and segments
    #[arg(long)]
    pub examples: bool,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Workbook file to check
    pub path: PathBuf,
}

pub fn run(cmd: WorkbookCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        WorkbookCommands::New(args) => run_new(args, global),
        WorkbookCommands::Validate(args) => run_validate(args, global),
        WorkbookCommands::Schema => {
            let schema = WorkbookValidator::schema_source()
                .ok_or_else(|| miette::miette!("workbook schema is not embedded"))?;
            println!("{}", schema.trim_end());
            Ok(())
        }
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(miette::miette!(
            help = "pass --force to overwrite it",
            "{} already exists",
            args.path.display()
        ));
    }

    // Reject values the models would refuse before writing anything
    let mut draft = CostModel::new(args.business_type.clone());
    draft.set_target_margin(args.margin)?;
    draft.set_expected_volume(args.volume)?;
    let position: MarketPosition = args.position.parse()?;

    let file_name = args
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "workbook.yaml".to_string());
    let ctx = WorkbookTemplate::new(file_name, args.business_type)
        .with_target_margin(args.margin)
        .with_expected_volume(args.volume)
        .with_market_position(position)
        .with_examples(args.examples);

    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let content = generator
        .generate_workbook(&ctx)
        .map_err(|e| miette::miette!("{}", e))?;

    if let Some(parent) = args.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }
    std::fs::write(&args.path, content).into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Created workbook {}",
            style("✓").green(),
            style(args.path.display()).cyan()
        );
    }
    Ok(())
}

fn run_validate(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let validator = WorkbookValidator::new()?;
    let workbook = validator.load(&args.path)?;

    let path = args.path.display().to_string();
    let invalid = |source: ValidationError| WorkbookError::Invalid {
        path: path.clone(),
        source,
    };
    let costs = workbook.build_cost_model().map_err(invalid)?;
    workbook.build_pricing_model(&costs).map_err(invalid)?;

    if !global.quiet {
        println!(
            "{} {} is valid",
            style("✓").green(),
            style(args.path.display()).cyan()
        );
    }
    Ok(())
}
