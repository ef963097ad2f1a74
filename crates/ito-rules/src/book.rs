//! # Rule Book
//!
//! The [`RuleBook`] is every table a run needs, loaded once from a rules
//! directory according to a [`RuleManifest`] and then shared read-only by
//! all checks. Tables referenced by more than one check (for example
//! `item_values.txt`, used both as an event prize domain and as the enemy
//! drop domain) are read from disk once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::RulesResult;
use crate::manifest::{DomainSpec, KeyDomainSpec, RuleManifest};
use crate::table::{KeyRoots, ValueSet};

/// A loaded enumerated-domain check.
#[derive(Debug, Clone)]
pub struct DomainRule {
    pub name: String,
    pub keys: ValueSet,
    pub values: ValueSet,
    pub allow_empty: bool,
}

/// A loaded single-key domain check.
#[derive(Debug, Clone)]
pub struct KeyDomainRule {
    pub key: String,
    pub values: ValueSet,
    pub allow_empty: bool,
}

/// A loaded prize-domain registration.
#[derive(Debug, Clone)]
pub struct PrizeRule {
    pub prize_type: String,
    pub values: ValueSet,
}

/// Rules for mystery records.
#[derive(Debug, Clone, Default)]
pub struct MysteryRules {
    pub asset_roots: KeyRoots,
    pub trigger_roots: KeyRoots,
    pub allowed_duplicates: ValueSet,
    pub music_roots: KeyRoots,
    pub music_hardcoded: ValueSet,
    pub forced_marker: String,
}

/// Rules for event records.
#[derive(Debug, Clone, Default)]
pub struct EventRules {
    pub asset_roots: KeyRoots,
    pub trigger_roots: KeyRoots,
    pub allowed_duplicates: ValueSet,
    pub domains: Vec<DomainRule>,
    pub prizes: Vec<PrizeRule>,
}

/// Rules for enemy records.
#[derive(Debug, Clone)]
pub struct EnemyRules {
    pub asset_roots: KeyRoots,
    pub allowed_duplicates: ValueSet,
    pub domains: Vec<DomainRule>,
    pub drop: KeyDomainRule,
}

/// Every rule table of a run.
#[derive(Debug, Clone)]
pub struct RuleBook {
    pub mystery: MysteryRules,
    pub event: EventRules,
    pub enemy: EnemyRules,
}

impl RuleBook {
    /// Load every table named by `manifest` from `rules_dir`.
    ///
    /// # Errors
    ///
    /// Returns `RulesError::ConfigurationMissing` for the first table that
    /// does not exist.
    pub fn load(rules_dir: &Path, manifest: &RuleManifest) -> RulesResult<Self> {
        let mut loader = TableLoader::new(rules_dir);

        let m = &manifest.mystery;
        let mystery = MysteryRules {
            asset_roots: loader.roots(&m.asset_keys)?,
            trigger_roots: loader.roots(&m.trigger_keys)?,
            allowed_duplicates: loader.set(&m.allowed_duplicate_keys)?,
            music_roots: loader.roots(&m.music_keys)?,
            music_hardcoded: loader.set(&m.music_values)?,
            forced_marker: m.forced_marker.clone(),
        };

        let e = &manifest.event;
        let event = EventRules {
            asset_roots: loader.roots(&e.asset_keys)?,
            trigger_roots: loader.roots(&e.trigger_keys)?,
            allowed_duplicates: loader.set(&e.allowed_duplicate_keys)?,
            domains: loader.domains(&e.domains)?,
            prizes: e
                .prizes
                .iter()
                .map(|p| -> RulesResult<PrizeRule> {
                    Ok(PrizeRule {
                        prize_type: p.prize_type.clone(),
                        values: loader.set(&p.values)?,
                    })
                })
                .collect::<RulesResult<Vec<_>>>()?,
        };

        let n = &manifest.enemy;
        let enemy = EnemyRules {
            asset_roots: loader.roots(&n.asset_keys)?,
            allowed_duplicates: loader.set(&n.allowed_duplicate_keys)?,
            domains: loader.domains(&n.domains)?,
            drop: loader.key_domain(&n.drop)?,
        };

        tracing::info!(
            dir = %rules_dir.display(),
            tables = loader.files_read,
            "loaded rule book"
        );

        Ok(Self {
            mystery,
            event,
            enemy,
        })
    }

    /// Load `rules.yaml` (or the default layout) and then the tables.
    pub fn load_dir(rules_dir: &Path) -> RulesResult<Self> {
        let manifest = RuleManifest::load_or_default(rules_dir)?;
        Self::load(rules_dir, &manifest)
    }

    /// `(table, entry count)` pairs describing what was loaded.
    pub fn summary(&self) -> Vec<(String, usize)> {
        let mut out = vec![
            ("mystery asset keys".to_string(), self.mystery.asset_roots.len()),
            ("mystery trigger keys".to_string(), self.mystery.trigger_roots.len()),
            ("mystery allowed duplicates".to_string(), self.mystery.allowed_duplicates.len()),
            ("music keys".to_string(), self.mystery.music_roots.len()),
            ("music hardcoded values".to_string(), self.mystery.music_hardcoded.len()),
            ("event asset keys".to_string(), self.event.asset_roots.len()),
            ("event trigger keys".to_string(), self.event.trigger_roots.len()),
            ("event allowed duplicates".to_string(), self.event.allowed_duplicates.len()),
        ];
        for d in &self.event.domains {
            out.push((format!("event {} values", d.name), d.values.len()));
        }
        for p in &self.event.prizes {
            out.push((format!("prize '{}' values", p.prize_type), p.values.len()));
        }
        out.push(("enemy asset keys".to_string(), self.enemy.asset_roots.len()));
        out.push(("enemy allowed duplicates".to_string(), self.enemy.allowed_duplicates.len()));
        for d in &self.enemy.domains {
            out.push((format!("enemy {} values", d.name), d.values.len()));
        }
        out.push((format!("enemy {} values", self.enemy.drop.key), self.enemy.drop.values.len()));
        out
    }
}

/// Reads tables relative to a rules directory, memoizing by file name.
struct TableLoader {
    dir: PathBuf,
    sets: HashMap<String, ValueSet>,
    roots: HashMap<String, KeyRoots>,
    files_read: usize,
}

impl TableLoader {
    fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            sets: HashMap::new(),
            roots: HashMap::new(),
            files_read: 0,
        }
    }

    fn set(&mut self, file: &str) -> RulesResult<ValueSet> {
        if let Some(set) = self.sets.get(file) {
            return Ok(set.clone());
        }
        let set = ValueSet::load(&self.dir.join(file))?;
        self.files_read += 1;
        self.sets.insert(file.to_string(), set.clone());
        Ok(set)
    }

    fn roots(&mut self, file: &str) -> RulesResult<KeyRoots> {
        if let Some(roots) = self.roots.get(file) {
            return Ok(roots.clone());
        }
        let roots = KeyRoots::load(&self.dir.join(file))?;
        self.files_read += 1;
        self.roots.insert(file.to_string(), roots.clone());
        Ok(roots)
    }

    fn domains(&mut self, specs: &[DomainSpec]) -> RulesResult<Vec<DomainRule>> {
        specs
            .iter()
            .map(|spec| -> RulesResult<DomainRule> {
                Ok(DomainRule {
                    name: spec.name.clone(),
                    keys: self.set(&spec.keys)?,
                    values: self.set(&spec.values)?,
                    allow_empty: spec.allow_empty,
                })
            })
            .collect()
    }

    fn key_domain(&mut self, spec: &KeyDomainSpec) -> RulesResult<KeyDomainRule> {
        Ok(KeyDomainRule {
            key: spec.key.clone(),
            values: self.set(&spec.values)?,
            allow_empty: spec.allow_empty,
        })
    }
}
