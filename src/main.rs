use clap::Parser;
use miette::Result;
use priceplan::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) so piping into
    // `head` and friends does not panic on a broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let default_level = if global.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("PRICEPLAN_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("priceplan={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init(args) => priceplan::cli::commands::init::run(args),
        Commands::Workbook(cmd) => priceplan::cli::commands::workbook::run(cmd, &global),
        Commands::Analyze(args) => priceplan::cli::commands::analyze::run(args, &global),
        Commands::Scenario(cmd) => priceplan::cli::commands::scenario::run(cmd, &global),
        Commands::Data(cmd) => priceplan::cli::commands::data::run(cmd, &global),
        Commands::Completions(args) => priceplan::cli::commands::completions::run(args),
    }
}
