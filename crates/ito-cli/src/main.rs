//! # itocheck CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ito_cli::rules::{run_rules, RulesArgs};
use ito_cli::validate::{run_validate, ValidateArgs};
use ito_cli::RuleSettings;

/// ito content checker
///
/// Validates mystery, event and enemy `.ito` records: quoting, duplicate
/// keys, enumerated values, prize domains, file references, and every
/// event or enemy reachable through trigger links.
#[derive(Parser, Debug)]
#[command(name = "itocheck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding the rule tables.
    #[arg(long, global = true)]
    rules_dir: Option<PathBuf>,

    /// Path to the rule manifest (defaults to rules.yaml in the rules directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a record and everything it links to.
    Validate(ValidateArgs),

    /// Load the rule tables and summarize them.
    Rules(RulesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so JSON reports on stdout stay parseable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("itocheck v{} starting", env!("CARGO_PKG_VERSION"));

    let settings = RuleSettings::resolve(cli.rules_dir, cli.config);
    tracing::debug!(rules_dir = %settings.rules_dir.display(), "resolved rules directory");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args, &settings),
        Commands::Rules(args) => run_rules(&args, &settings),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
