//! # Reference Resolution
//!
//! Path-valued keys name files under the content root. A key's
//! [`KeyRoot`] may require the value to carry a prefix (the mod-relative
//! directory, a fixed directory, or both); that prefix is checked and
//! stripped before the rest is joined onto the content root. Values of keys
//! without a requirement are joined as written.
//!
//! Trigger links are the subset of references that point at further
//! records. They are classified from the record alone, then resolved here
//! exactly once; the walker recurses on the resolved paths.
//!
//! [`KeyRoot`]: ito_rules::KeyRoot

use std::path::PathBuf;

use ito_core::{join_relative, lexical_normalize, normalize_separators, ContentSource, Issue, Record, RecordKind};
use ito_rules::{KeyRoots, ValueSet};

use crate::semantic::PrizePairs;

/// Prize type that makes the paired value an event record path.
pub const TRIGGER_EVENT: &str = "trigger_event";

/// Prize type that makes the paired value an enemy record path.
pub const TRIGGER_ENEMY: &str = "trigger_enemy";

/// Where references of one run resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    /// Directory every reference is joined onto.
    pub content_root: PathBuf,
    /// Mod-relative prefix, `/`-separated without surrounding separators.
    /// `None` disables the mod-relative requirement.
    pub mod_prefix: Option<String>,
}

impl PathContext {
    /// Build a context, normalizing `mod_prefix`. An empty prefix is `None`.
    pub fn new(content_root: impl Into<PathBuf>, mod_prefix: Option<&str>) -> Self {
        let mod_prefix = mod_prefix
            .map(|p| normalize_separators(p).trim_matches('/').to_string())
            .filter(|p| !p.is_empty());
        Self {
            content_root: content_root.into(),
            mod_prefix,
        }
    }
}

/// What a reference value resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    /// The value is empty; nothing to check.
    Empty,
    /// The value is a hardcoded name, not a path.
    Hardcoded,
    /// The value names an existing file.
    Resolved(PathBuf),
}

/// Resolve one reference value.
///
/// # Errors
///
/// - `MissingRequiredRoot` if the key requires a prefix the value lacks.
/// - `FileNotFound` if the stripped value does not exist under the root.
/// - `RestrictedFilename` if the file name starts with `n` or `r` and
///   `allow_restricted` is false.
pub fn resolve_reference<S: ContentSource + ?Sized>(
    key: &str,
    raw: &str,
    ctx: &PathContext,
    roots: &KeyRoots,
    hardcoded: &ValueSet,
    allow_restricted: bool,
    source: &S,
) -> Result<PathOutcome, Issue> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(PathOutcome::Empty);
    }
    if hardcoded.contains(value) {
        return Ok(PathOutcome::Hardcoded);
    }

    let normalized = normalize_separators(value);
    let required = roots
        .get(key)
        .and_then(|root| root.composite_prefix(ctx.mod_prefix.as_deref()))
        .map(|prefix| format!("{prefix}/"));
    let relative = match required {
        Some(required) => {
            let Some(rest) = normalized.strip_prefix(required.as_str()) else {
                return Err(Issue::MissingRequiredRoot {
                    key: key.to_string(),
                    required,
                    found: value.to_string(),
                });
            };
            rest
        }
        None => normalized.as_str(),
    };

    let path = join_relative(&ctx.content_root, relative);
    if !source.exists(&path) {
        return Err(Issue::FileNotFound {
            key: key.to_string(),
            path: relative.to_string(),
        });
    }

    if !allow_restricted {
        if let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) {
            if name.chars().next().is_some_and(|c| matches!(c.to_ascii_lowercase(), 'n' | 'r')) {
                return Err(Issue::RestrictedFilename {
                    key: key.to_string(),
                    filename: name,
                });
            }
        }
    }

    Ok(PathOutcome::Resolved(lexical_normalize(&path)))
}

/// Resolve every entry whose key is in `roots`, collecting all issues.
pub fn check_references<S: ContentSource + ?Sized>(
    record: &Record,
    roots: &KeyRoots,
    hardcoded: &ValueSet,
    ctx: &PathContext,
    allow_restricted: bool,
    source: &S,
) -> Vec<Issue> {
    record
        .entries()
        .iter()
        .filter(|e| roots.contains(&e.key))
        .filter_map(|e| {
            resolve_reference(&e.key, &e.value, ctx, roots, hardcoded, allow_restricted, source)
                .err()
        })
        .collect()
}

/// A reference from one record to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerLink {
    /// Key holding the target path.
    pub source_key: String,
    /// Target path as written.
    pub target: String,
    /// Kind of record the link expects.
    pub target_kind: RecordKind,
    /// 1-based line of the key.
    pub line: usize,
}

/// A trigger link and the file it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub link: TriggerLink,
    pub path: PathBuf,
}

/// Prize-value entries whose paired prize type is `trigger_event` or
/// `trigger_enemy`, in document order. Empty values are not links.
pub fn classify_trigger_links(record: &Record) -> Vec<TriggerLink> {
    PrizePairs::from_record(record)
        .iter()
        .filter(|pair| !pair.value.is_blank())
        .filter_map(|pair| {
            let target_kind = match pair.prize_type? {
                TRIGGER_EVENT => RecordKind::Event,
                TRIGGER_ENEMY => RecordKind::Enemy,
                _ => return None,
            };
            Some(TriggerLink {
                source_key: pair.value.key.clone(),
                target: pair.value.value.clone(),
                target_kind,
                line: pair.value.line,
            })
        })
        .collect()
}

/// Mystery forced events: keys ending with `marker` with a non-empty value.
pub fn forced_event_links(record: &Record, marker: &str) -> Vec<TriggerLink> {
    record
        .entries()
        .iter()
        .filter(|e| e.key.ends_with(marker) && !e.is_blank())
        .map(|e| TriggerLink {
            source_key: e.key.clone(),
            target: e.value.clone(),
            target_kind: RecordKind::Event,
            line: e.line,
        })
        .collect()
}

/// Resolve trigger links against `roots`.
///
/// # Errors
///
/// Every link that fails to resolve, as issues in link order.
pub fn resolve_trigger_links<S: ContentSource + ?Sized>(
    links: Vec<TriggerLink>,
    roots: &KeyRoots,
    ctx: &PathContext,
    allow_restricted: bool,
    source: &S,
) -> Result<Vec<ResolvedLink>, Vec<Issue>> {
    let no_hardcoded = ValueSet::default();
    let mut resolved = Vec::new();
    let mut issues = Vec::new();

    for link in links {
        match resolve_reference(
            &link.source_key,
            &link.target,
            ctx,
            roots,
            &no_hardcoded,
            allow_restricted,
            source,
        ) {
            Ok(PathOutcome::Resolved(path)) => resolved.push(ResolvedLink { link, path }),
            Ok(PathOutcome::Empty | PathOutcome::Hardcoded) => {}
            Err(issue) => issues.push(issue),
        }
    }

    if issues.is_empty() {
        Ok(resolved)
    } else {
        Err(issues)
    }
}
