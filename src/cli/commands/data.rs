//! `priceplan data` command - whole-project export and import

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::io::Read;
use std::path::PathBuf;

use crate::cli::helpers::open_store;
use crate::cli::GlobalOpts;

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Write every data category as one JSON document
    Export {
        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Load a previously exported document; nothing is written if it is invalid
    Import {
        /// JSON file to import, or '-' for stdin
        path: PathBuf,
    },
}

pub fn run(cmd: DataCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DataCommands::Export { output } => {
            let store = open_store(global)?;
            let document = store.export_all_data()?;
            let json = serde_json::to_string_pretty(&document).into_diagnostic()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json + "\n").into_diagnostic()?;
                    if !global.quiet {
                        println!(
                            "{} Exported data to {}",
                            style("✓").green(),
                            style(path.display()).cyan()
                        );
                    }
                }
                None => println!("{}", json),
            }
            Ok(())
        }
        DataCommands::Import { path } => {
            let content = if path.as_os_str() == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf).into_diagnostic()?;
                buf
            } else {
                std::fs::read_to_string(&path).into_diagnostic()?
            };

            let mut store = open_store(global)?;
            let summary = store.import_all_data(&content)?;
            if !global.quiet {
                println!(
                    "{} Imported {} categor{} ({} scenario(s))",
                    style("✓").green(),
                    summary.categories.len(),
                    if summary.categories.len() == 1 { "y" } else { "ies" },
                    summary.scenarios
                );
            }
            Ok(())
        }
    }
}
