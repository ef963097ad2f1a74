//! # ito-cli: Content Checker CLI
//!
//! Provides the `itocheck` command-line interface.
//!
//! ## Subcommands
//!
//! - `itocheck validate <PATH>`: validate a mystery, event or enemy record
//!   and everything it links to.
//! - `itocheck rules`: load the rule tables and print what was loaded.
//!
//! ```bash
//! itocheck validate mods/mystery/mystery.ito
//! itocheck validate mods/mystery/ev_01.ito --subdir mystery --format json
//! itocheck --rules-dir ./config rules
//! ```
//!
//! ## Rules Directory
//!
//! `--rules-dir` if given, else `config/` next to the executable, else
//! `./config`. The rule manifest is `--config` if given, else `rules.yaml`
//! inside the rules directory, else the built-in layout.

pub mod rules;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ito_rules::{RuleBook, RuleManifest, RulesResult};

/// Name of the rules directory looked up by default.
pub const RULES_DIR_NAME: &str = "config";

/// Where the rule tables and manifest come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSettings {
    pub rules_dir: PathBuf,
    pub config: Option<PathBuf>,
}

impl RuleSettings {
    /// Apply the lookup order for anything not given explicitly.
    pub fn resolve(rules_dir: Option<PathBuf>, config: Option<PathBuf>) -> Self {
        Self {
            rules_dir: rules_dir.unwrap_or_else(default_rules_dir),
            config,
        }
    }

    /// The manifest in effect.
    pub fn manifest(&self) -> RulesResult<RuleManifest> {
        match &self.config {
            Some(path) => RuleManifest::load(path),
            None => RuleManifest::load_or_default(&self.rules_dir),
        }
    }

    /// Load every rule table.
    pub fn load(&self) -> Result<RuleBook> {
        let manifest = self.manifest().context("failed to load rule manifest")?;
        RuleBook::load(&self.rules_dir, &manifest).with_context(|| {
            format!("failed to load rule tables from {}", self.rules_dir.display())
        })
    }
}

/// `config/` beside the running executable if it exists, else `./config`.
pub fn default_rules_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(RULES_DIR_NAME)))
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from(RULES_DIR_NAME))
}

/// File name of `path` for short report lines.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_rules_dir_wins() {
        let s = RuleSettings::resolve(Some(PathBuf::from("/opt/rules")), None);
        assert_eq!(s.rules_dir, PathBuf::from("/opt/rules"));
        assert!(s.config.is_none());
    }

    #[test]
    fn default_rules_dir_ends_in_config() {
        assert!(default_rules_dir().ends_with(RULES_DIR_NAME));
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let s = RuleSettings::resolve(
            Some(dir.path().to_path_buf()),
            Some(dir.path().join("custom.yaml")),
        );
        assert!(s.manifest().is_err());
    }

    #[test]
    fn missing_tables_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let s = RuleSettings::resolve(Some(dir.path().to_path_buf()), None);
        let err = s.load().unwrap_err();
        assert!(format!("{err:#}").contains("not found"));
    }

    #[test]
    fn display_name_is_file_name() {
        assert_eq!(display_name(Path::new("/a/b/ev_01.ito")), "ev_01.ito");
    }
}
