//! # Rules Subcommand
//!
//! Loads every configured rule table, which fails on the first missing
//! file, and prints how many entries each holds.

use anyhow::{Context, Result};
use clap::Args;

use crate::RuleSettings;

/// Arguments for the `itocheck rules` subcommand.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Print the effective rule manifest as YAML instead of loading tables.
    #[arg(long)]
    pub manifest: bool,
}

/// Execute the rules subcommand.
pub fn run_rules(args: &RulesArgs, settings: &RuleSettings) -> Result<u8> {
    if args.manifest {
        let manifest = settings.manifest().context("failed to load rule manifest")?;
        let yaml = serde_yaml::to_string(&manifest).context("failed to render rule manifest")?;
        print!("{yaml}");
        return Ok(0);
    }

    let book = settings.load()?;
    println!("Rules directory: {}", settings.rules_dir.display());
    for (table, entries) in book.summary() {
        println!("  {table:<36} {entries}");
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ito_rules::RuleManifest;

    #[test]
    fn complete_rules_dir_loads() {
        let dir = tempfile::tempdir().unwrap();
        for file in RuleManifest::default().table_files() {
            std::fs::write(dir.path().join(file), "").unwrap();
        }
        let settings = RuleSettings::resolve(Some(dir.path().to_path_buf()), None);
        assert_eq!(run_rules(&RulesArgs { manifest: false }, &settings).unwrap(), 0);
    }

    #[test]
    fn empty_rules_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let settings = RuleSettings::resolve(Some(dir.path().to_path_buf()), None);
        assert!(run_rules(&RulesArgs { manifest: false }, &settings).is_err());
    }

    #[test]
    fn manifest_prints_without_tables() {
        let dir = tempfile::tempdir().unwrap();
        let settings = RuleSettings::resolve(Some(dir.path().to_path_buf()), None);
        assert_eq!(run_rules(&RulesArgs { manifest: true }, &settings).unwrap(), 0);
    }
}
