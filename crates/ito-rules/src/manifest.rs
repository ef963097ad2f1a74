//! # Rule Manifest
//!
//! The manifest names the rule-table files each record kind uses and
//! registers the enumerated-domain and prize-domain checks. It is optional:
//! [`RuleManifest::default`] reproduces the standard rules-directory layout,
//! and a `rules.yaml` next to the tables (or a path passed explicitly) only
//! needs to spell out what it changes.
//!
//! ```yaml
//! event:
//!   prizes:
//!     - prize_type: item
//!       values: item_values.txt
//!     - prize_type: relic
//!       values: relic_values.txt
//! mystery:
//!   forced_marker: _frc
//! ```
//!
//! Any list given in the manifest replaces the default list entirely.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{read_error, RulesError, RulesResult};

/// File name of the manifest inside a rules directory.
pub const MANIFEST_FILE: &str = "rules.yaml";

/// An enumerated-domain check: every key listed in `keys` must hold a value
/// listed in `values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSpec {
    /// Short name used in logs.
    pub name: String,
    /// Set file of keys to check.
    pub keys: String,
    /// Set file of valid values.
    pub values: String,
    /// Whether an empty value passes.
    #[serde(default = "default_true")]
    pub allow_empty: bool,
}

impl DomainSpec {
    fn new(name: &str, allow_empty: bool) -> Self {
        Self {
            name: name.to_string(),
            keys: format!("{name}_keys.txt"),
            values: format!("{name}_values.txt"),
            allow_empty,
        }
    }
}

/// A single-key domain check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDomainSpec {
    /// The key to check.
    pub key: String,
    /// Set file of valid values.
    pub values: String,
    /// Whether an empty value passes.
    #[serde(default = "default_true")]
    pub allow_empty: bool,
}

/// A prize-domain registration: when a prize key holds `prize_type`, the
/// paired number key must hold a value from `values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeSpec {
    pub prize_type: String,
    pub values: String,
}

impl PrizeSpec {
    fn new(prize_type: &str) -> Self {
        Self {
            prize_type: prize_type.to_string(),
            values: format!("{prize_type}_values.txt"),
        }
    }
}

/// Tables used by mystery records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MysteryManifest {
    pub asset_keys: String,
    pub trigger_keys: String,
    pub allowed_duplicate_keys: String,
    pub music_keys: String,
    pub music_values: String,
    /// Key suffix marking a forced event reference.
    pub forced_marker: String,
}

impl Default for MysteryManifest {
    fn default() -> Self {
        Self {
            asset_keys: "mystery_asset_keys.txt".to_string(),
            trigger_keys: "mystery_trigger_keys.txt".to_string(),
            allowed_duplicate_keys: "mystery_allowed_duplicate_keys.txt".to_string(),
            music_keys: "music_keys.txt".to_string(),
            music_values: "music_values.txt".to_string(),
            forced_marker: "_frc".to_string(),
        }
    }
}

/// Tables used by event records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventManifest {
    pub asset_keys: String,
    pub trigger_keys: String,
    pub allowed_duplicate_keys: String,
    pub domains: Vec<DomainSpec>,
    pub prizes: Vec<PrizeSpec>,
}

impl Default for EventManifest {
    fn default() -> Self {
        Self {
            asset_keys: "event_asset_keys.txt".to_string(),
            trigger_keys: "event_trigger_keys.txt".to_string(),
            allowed_duplicate_keys: "event_allowed_duplicate_keys.txt".to_string(),
            domains: ["winprize", "extra_winprize", "wineffect", "location", "character"]
                .into_iter()
                .map(|n| DomainSpec::new(n, true))
                .collect(),
            prizes: [
                "item",
                "itempool",
                "curse_ex",
                "spell_ex",
                "injury_ex",
                "ally_ex",
                "card_add",
            ]
            .into_iter()
            .map(PrizeSpec::new)
            .collect(),
        }
    }
}

/// Tables used by enemy records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyManifest {
    pub asset_keys: String,
    pub allowed_duplicate_keys: String,
    pub domains: Vec<DomainSpec>,
    /// Enemy drops only support the item prize domain.
    pub drop: KeyDomainSpec,
}

impl Default for EnemyManifest {
    fn default() -> Self {
        Self {
            asset_keys: "enemy_asset_keys.txt".to_string(),
            allowed_duplicate_keys: "enemy_allowed_duplicate_keys.txt".to_string(),
            domains: vec![
                DomainSpec::new("weakness", true),
                DomainSpec::new("location", false),
                DomainSpec::new("enmtype", false),
                DomainSpec::new("damagetype", false),
            ],
            drop: KeyDomainSpec {
                key: "prize_name".to_string(),
                values: "item_values.txt".to_string(),
                allow_empty: true,
            },
        }
    }
}

/// The complete rule layout for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleManifest {
    pub mystery: MysteryManifest,
    pub event: EventManifest,
    pub enemy: EnemyManifest,
}

impl RuleManifest {
    /// Parse manifest YAML. `origin` is only used for error context.
    pub fn parse(text: &str, origin: &Path) -> RulesResult<Self> {
        let manifest: Self =
            serde_yaml::from_str(text).map_err(|e| RulesError::ManifestParse {
                path: origin.to_path_buf(),
                source: e,
            })?;
        manifest.check()?;
        Ok(manifest)
    }

    /// Load the manifest at `path`. The file must exist.
    pub fn load(path: &Path) -> RulesResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
        Self::parse(&text, path)
    }

    /// Load `rules.yaml` from `rules_dir` if present, else the default layout.
    pub fn load_or_default(rules_dir: &Path) -> RulesResult<Self> {
        let path = rules_dir.join(MANIFEST_FILE);
        if path.is_file() {
            tracing::info!(path = %path.display(), "using rule manifest");
            Self::load(&path)
        } else {
            tracing::debug!(dir = %rules_dir.display(), "no rule manifest, using default layout");
            Ok(Self::default())
        }
    }

    /// Every table file the manifest names, sorted and deduplicated.
    pub fn table_files(&self) -> Vec<&str> {
        let mut files = BTreeSet::new();
        let m = &self.mystery;
        files.extend([
            m.asset_keys.as_str(),
            m.trigger_keys.as_str(),
            m.allowed_duplicate_keys.as_str(),
            m.music_keys.as_str(),
            m.music_values.as_str(),
        ]);
        let e = &self.event;
        files.extend([
            e.asset_keys.as_str(),
            e.trigger_keys.as_str(),
            e.allowed_duplicate_keys.as_str(),
        ]);
        let n = &self.enemy;
        files.extend([
            n.asset_keys.as_str(),
            n.allowed_duplicate_keys.as_str(),
            n.drop.values.as_str(),
        ]);
        for d in e.domains.iter().chain(&n.domains) {
            files.insert(d.keys.as_str());
            files.insert(d.values.as_str());
        }
        files.extend(e.prizes.iter().map(|p| p.values.as_str()));
        files.into_iter().collect()
    }

    /// Reject manifests that cannot drive a coherent run.
    fn check(&self) -> RulesResult<()> {
        let mut seen = BTreeSet::new();
        for prize in &self.event.prizes {
            if prize.prize_type.trim().is_empty() {
                return Err(RulesError::InvalidManifest(
                    "prize registration with empty prize_type".to_string(),
                ));
            }
            if !seen.insert(prize.prize_type.as_str()) {
                return Err(RulesError::InvalidManifest(format!(
                    "prize type '{}' registered twice",
                    prize.prize_type
                )));
            }
        }
        if self.mystery.forced_marker.trim().is_empty() {
            return Err(RulesError::InvalidManifest(
                "mystery.forced_marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
