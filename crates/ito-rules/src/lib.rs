//! # ito-rules: Rule Tables
//!
//! The static rule data that drives validation lives outside the code, in a
//! rules directory of plain text tables:
//!
//! - **Sets** ([`ValueSet`]): valid keys, valid values, allowed duplicate
//!   keys, hardcoded music values.
//! - **Key roots** ([`KeyRoots`]): which keys hold file references, and the
//!   path prefix each one must carry.
//! - **Manifest** ([`RuleManifest`]): which table files each record kind
//!   uses, plus the registered enumerated and prize domains. Optional; the
//!   default layout applies when `rules.yaml` is absent.
//!
//! [`RuleBook::load`] reads all of it once per run. Nothing here is mutated
//! after loading.
//!
//! ## Crate Policy
//!
//! - Depends only on `ito-core` internally.
//! - A missing table is `RulesError::ConfigurationMissing`, never an empty
//!   rule set.

pub mod book;
pub mod error;
pub mod manifest;
pub mod table;

pub use book::{DomainRule, EnemyRules, EventRules, KeyDomainRule, MysteryRules, PrizeRule, RuleBook};
pub use error::{RulesError, RulesResult};
pub use manifest::{RuleManifest, MANIFEST_FILE};
pub use table::{KeyRoot, KeyRoots, ValueSet};
