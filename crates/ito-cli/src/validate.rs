//! # Validate Subcommand
//!
//! Detects the kind of the given record from its header, walks everything
//! reachable from it, and prints a text or JSON report.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use ito_core::ValidationResult;
use ito_validate::{Validator, DEFAULT_MOD_PREFIX};

use crate::{display_name, RuleSettings};

/// Report format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for the `itocheck validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to a mystery, event or enemy `.ito` file.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Subdirectory that mod-relative references must start with.
    /// Pass an empty string to disable the requirement; unlike earlier
    /// releases of the checker, an empty value does not fall back to `mystery`.
    #[arg(long, default_value = DEFAULT_MOD_PREFIX)]
    pub subdir: String,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on validation failure. Operational
/// errors (rule tables, unreadable input) are returned as `Err`.
pub fn run_validate(args: &ValidateArgs, settings: &RuleSettings) -> Result<u8> {
    let book = settings.load()?;
    let validator = Validator::new(book).with_mod_prefix(Some(args.subdir.as_str()));

    let result = validator
        .validate(&args.path)
        .with_context(|| format!("failed to validate {}", args.path.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => write_text_report(&mut out, &args.path, &result)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &result).context("failed to write report")?;
            writeln!(out)?;
        }
    }

    Ok(if result.ok { 0 } else { 1 })
}

/// Render `result` as the human-readable report.
pub fn write_text_report<W: Write>(out: &mut W, path: &Path, result: &ValidationResult) -> Result<()> {
    let name = display_name(path);

    if let Some(failure) = &result.failure {
        writeln!(out, "FAIL: {failure}")?;
        for error in &result.errors {
            writeln!(out, "  {error}")?;
        }
    }

    if !result.enemies.is_empty() {
        writeln!(out, "Validated {} enemies:", result.enemies.len())?;
        for enemy in &result.enemies {
            writeln!(out, "   {}", display_name(enemy))?;
        }
    }
    if !result.events.is_empty() {
        writeln!(out, "Validated {} events:", result.events.len())?;
        for event in &result.events {
            writeln!(out, "   {}", display_name(event))?;
        }
    }

    if result.ok {
        writeln!(out, "OK: {name} validation passed")?;
    } else {
        writeln!(out, "\n{name} validation failed.")?;
    }
    Ok(())
}
