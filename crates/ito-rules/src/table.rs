//! # Rule Table Files
//!
//! Two on-disk shapes:
//!
//! - **Sets**: one entry per line (`*_keys.txt`, `*_values.txt`, allowed
//!   duplicates, hardcoded music values). Entries are trimmed; blank lines
//!   are ignored.
//! - **Key roots**: comma-delimited `key[,column...]` lines naming the keys
//!   whose values are file references. A `True` column marks the key as
//!   requiring the mod-relative prefix, `False` is the explicit default,
//!   and any other column is a fixed path prefix the value must carry.
//!
//! A missing file is [`RulesError::ConfigurationMissing`], never an empty
//! table.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use ito_core::normalize_separators;

use crate::error::{read_error, RulesResult};

/// An immutable set of strings (valid keys, valid values, allow-lists).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueSet {
    items: BTreeSet<String>,
}

impl ValueSet {
    /// Parse newline-delimited set text.
    pub fn parse(text: &str) -> Self {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }

    /// Load a set file.
    pub fn load(path: &Path) -> RulesResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
        let set = Self::parse(&text);
        tracing::debug!(path = %path.display(), entries = set.len(), "loaded rule set");
        Ok(set)
    }

    /// True if `value` is a member.
    pub fn contains(&self, value: &str) -> bool {
        self.items.contains(value)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if there are no members.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Members in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ValueSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Path requirements of one reference key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRoot {
    /// Fixed prefix the value must start with, `/`-separated, no trailing
    /// separator.
    pub required_prefix: Option<String>,
    /// Whether the value must start with the run's mod-relative prefix.
    pub mod_relative: bool,
}

impl KeyRoot {
    /// The composite prefix a value must carry under `mod_prefix`, or
    /// `None` when the key carries no requirement.
    ///
    /// The mod-relative part comes first, then the fixed prefix.
    pub fn composite_prefix(&self, mod_prefix: Option<&str>) -> Option<String> {
        let mut parts: Vec<&str> = Vec::new();
        if self.mod_relative {
            if let Some(m) = mod_prefix.map(|m| m.trim_matches('/')).filter(|m| !m.is_empty()) {
                parts.push(m);
            }
        }
        if let Some(fixed) = self.required_prefix.as_deref() {
            parts.push(fixed);
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}

/// Reference keys and their path requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRoots {
    roots: BTreeMap<String, KeyRoot>,
}

impl KeyRoots {
    /// Parse comma-delimited key-root text.
    pub fn parse(text: &str) -> Self {
        let mut roots = BTreeMap::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let mut columns = line.split(',').map(str::trim);
            let key = match columns.next() {
                Some(k) if !k.is_empty() => k,
                _ => continue,
            };
            let mut root = KeyRoot::default();
            for column in columns.filter(|c| !c.is_empty()) {
                if column.eq_ignore_ascii_case("true") {
                    root.mod_relative = true;
                } else if column.eq_ignore_ascii_case("false") {
                    root.mod_relative = false;
                } else {
                    let prefix = normalize_separators(column).trim_matches('/').to_string();
                    if !prefix.is_empty() {
                        root.required_prefix = Some(prefix);
                    }
                }
            }
            roots.insert(key.to_string(), root);
        }
        Self { roots }
    }

    /// Load a key-root file.
    pub fn load(path: &Path) -> RulesResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
        let roots = Self::parse(&text);
        tracing::debug!(path = %path.display(), keys = roots.len(), "loaded key roots");
        Ok(roots)
    }

    /// Requirements for `key`, if it is a reference key.
    pub fn get(&self, key: &str) -> Option<&KeyRoot> {
        self.roots.get(key)
    }

    /// True if `key` is a reference key.
    pub fn contains(&self, key: &str) -> bool {
        self.roots.contains_key(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// True if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Add or replace one key's requirements.
    pub fn insert(&mut self, key: impl Into<String>, root: KeyRoot) {
        self.roots.insert(key.into(), root);
    }
}

impl<K: Into<String>> FromIterator<(K, KeyRoot)> for KeyRoots {
    fn from_iter<I: IntoIterator<Item = (K, KeyRoot)>>(iter: I) -> Self {
        Self {
            roots: iter.into_iter().map(|(k, r)| (k.into(), r)).collect(),
        }
    }
}
