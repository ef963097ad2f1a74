//! # Graph Walker
//!
//! Depth-first validation of a mystery → event → (event | enemy) graph.
//!
//! ## Visited Contract
//!
//! Event and enemy identities are inserted into [`VisitedSets`] before their
//! own checks start and are never removed, not even when the record fails.
//! A record already in its set is accepted immediately, without reading the
//! file or touching the filesystem. This is what terminates trigger cycles.
//!
//! ## Failure
//!
//! Each step collects every issue it finds in one record. The first step
//! with any issue rejects the record, and the rejection unwinds the whole
//! walk: sibling links of any ancestor are not explored.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ito_core::{
    identity_path, CheckStep, ContentSource, DiskSource, Issue, Record, RecordFailure, RecordKind,
    ValidationResult,
};
use ito_rules::{KeyRoots, RuleBook, ValueSet};

use crate::error::{ValidateError, ValidateResult};
use crate::reference::{self, PathContext, ResolvedLink, TriggerLink};
use crate::semantic;
use crate::structure;

/// Mod-relative prefix used when the caller does not choose one.
pub const DEFAULT_MOD_PREFIX: &str = "mystery";

/// Identities entered during one top-level run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedSets {
    events: BTreeSet<PathBuf>,
    enemies: BTreeSet<PathBuf>,
}

impl VisitedSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `identity` as entered. Returns `false` if it already was.
    ///
    /// Mysteries are not tracked; they are only ever top-level.
    pub fn insert(&mut self, kind: RecordKind, identity: &Path) -> bool {
        match kind {
            RecordKind::Mystery => true,
            RecordKind::Event => self.events.insert(identity.to_path_buf()),
            RecordKind::Enemy => self.enemies.insert(identity.to_path_buf()),
        }
    }

    pub fn contains(&self, kind: RecordKind, identity: &Path) -> bool {
        match kind {
            RecordKind::Mystery => false,
            RecordKind::Event => self.events.contains(identity),
            RecordKind::Enemy => self.enemies.contains(identity),
        }
    }

    /// Entered event identities, sorted.
    pub fn events(&self) -> impl Iterator<Item = &Path> {
        self.events.iter().map(PathBuf::as_path)
    }

    /// Entered enemy identities, sorted.
    pub fn enemies(&self) -> impl Iterator<Item = &Path> {
        self.enemies.iter().map(PathBuf::as_path)
    }

    /// `(events, enemies)` as sorted lists.
    pub fn into_lists(self) -> (Vec<PathBuf>, Vec<PathBuf>) {
        (
            self.events.into_iter().collect(),
            self.enemies.into_iter().collect(),
        )
    }
}

/// Runs the per-kind pipelines and follows trigger links.
pub struct Walker<'a, S: ContentSource + ?Sized> {
    rules: &'a RuleBook,
    ctx: &'a PathContext,
    source: &'a S,
}

impl<'a, S: ContentSource + ?Sized> Walker<'a, S> {
    pub fn new(rules: &'a RuleBook, ctx: &'a PathContext, source: &'a S) -> Self {
        Self { rules, ctx, source }
    }

    /// Validate the record at `path` as a `kind` record, then everything it
    /// links to.
    ///
    /// # Errors
    ///
    /// `Rejected` for the first failing record of the walk; `ReadRecord` or
    /// `WrongKind` if the file itself cannot be validated as `kind`.
    pub fn validate_record(
        &self,
        kind: RecordKind,
        path: &Path,
        visited: &mut VisitedSets,
    ) -> ValidateResult<()> {
        let identity = identity_path(path);
        if !visited.insert(kind, &identity) {
            tracing::debug!(path = %identity.display(), "skipping already checked {kind} file");
            return Ok(());
        }
        let record = self.load(&identity)?;
        if record.kind() != Some(kind) {
            return Err(ValidateError::WrongKind {
                path: identity,
                expected: kind,
                header: record.section().unwrap_or_default().to_string(),
            });
        }
        self.run(kind, &record, visited)
    }

    pub fn validate_mystery(&self, path: &Path, visited: &mut VisitedSets) -> ValidateResult<()> {
        self.validate_record(RecordKind::Mystery, path, visited)
    }

    pub fn validate_event(&self, path: &Path, visited: &mut VisitedSets) -> ValidateResult<()> {
        self.validate_record(RecordKind::Event, path, visited)
    }

    pub fn validate_enemy(&self, path: &Path, visited: &mut VisitedSets) -> ValidateResult<()> {
        self.validate_record(RecordKind::Enemy, path, visited)
    }

    /// Validate an already parsed record, dispatching on its header.
    pub fn validate_parsed(&self, record: &Record, visited: &mut VisitedSets) -> ValidateResult<()> {
        let kind = record.kind().ok_or_else(|| ValidateError::UnrecognizedRecord {
            path: record.identity().to_path_buf(),
            header: record.section().unwrap_or_default().to_string(),
        })?;
        if !visited.insert(kind, record.identity()) {
            return Ok(());
        }
        self.run(kind, record, visited)
    }

    fn load(&self, identity: &Path) -> ValidateResult<Record> {
        Record::load(self.source, identity).map_err(|source| ValidateError::ReadRecord {
            path: identity.to_path_buf(),
            source,
        })
    }

    /// Load a linked record. Failures become the reason text of an issue
    /// against the linking record, not an operational error.
    fn load_linked(&self, identity: &Path) -> Result<Record, String> {
        if !self.source.is_file(identity) {
            return Err("not a regular file".to_string());
        }
        Record::load(self.source, identity).map_err(|e| e.to_string())
    }

    fn run(&self, kind: RecordKind, record: &Record, visited: &mut VisitedSets) -> ValidateResult<()> {
        let span = tracing::info_span!("record", %kind, file = %record.display_name());
        let _guard = span.enter();

        match kind {
            RecordKind::Mystery => self.check_mystery(record, visited),
            RecordKind::Event => self.check_event(record, visited),
            RecordKind::Enemy => self.check_enemy(record, visited),
        }
    }

    /// Every forced link is resolved before any of them is followed, so a
    /// bad reference anywhere in the mystery is reported ahead of failures
    /// inside the linked events.
    fn check_mystery(&self, record: &Record, visited: &mut VisitedSets) -> ValidateResult<()> {
        let kind = RecordKind::Mystery;
        let rules = &self.rules.mystery;

        self.step(record, kind, CheckStep::Quotes, || {
            structure::check_quote_balance(record)
        })?;
        self.step(record, kind, CheckStep::Duplicates, || {
            structure::check_no_duplicate_keys(record, &rules.allowed_duplicates)
        })?;
        self.step(record, kind, CheckStep::AssetReferences, || {
            self.references(record, &rules.asset_roots, &ValueSet::default(), true)
        })?;
        self.step(record, kind, CheckStep::MusicReferences, || {
            self.references(record, &rules.music_roots, &rules.music_hardcoded, true)
        })?;

        let forced = reference::forced_event_links(record, &rules.forced_marker);
        let links =
            self.resolve_links(record, kind, CheckStep::ForcedEvents, forced, &rules.trigger_roots, true)?;
        for link in &links {
            self.follow(record, kind, CheckStep::ForcedEvents, link, visited)?;
        }

        tracing::info!("{} mystery validation passed", record.display_name());
        Ok(())
    }

    /// Trigger links are resolved as one step, then followed in document
    /// order with events and enemies interleaved as they appear. Under
    /// fail-fast the first link in the file whose subtree fails is the one
    /// reported.
    fn check_event(&self, record: &Record, visited: &mut VisitedSets) -> ValidateResult<()> {
        let kind = RecordKind::Event;
        let rules = &self.rules.event;

        self.step(record, kind, CheckStep::Quotes, || {
            structure::check_quote_balance(record)
        })?;
        self.step(record, kind, CheckStep::Duplicates, || {
            structure::check_no_duplicate_keys(record, &rules.allowed_duplicates)
        })?;
        self.step(record, kind, CheckStep::KeyValues, || {
            rules
                .domains
                .iter()
                .flat_map(|d| semantic::check_key_value_domain(record, &d.keys, &d.values, d.allow_empty))
                .collect()
        })?;
        self.step(record, kind, CheckStep::Prizes, || {
            rules
                .prizes
                .iter()
                .flat_map(|p| semantic::check_prize_domain(record, &p.prize_type, &p.values))
                .collect()
        })?;
        self.step(record, kind, CheckStep::AssetReferences, || {
            self.references(record, &rules.asset_roots, &ValueSet::default(), false)
        })?;

        let triggers = reference::classify_trigger_links(record);
        let links = self.resolve_links(
            record,
            kind,
            CheckStep::TriggerReferences,
            triggers,
            &rules.trigger_roots,
            false,
        )?;

        tracing::info!("{} event validation passed", record.display_name());

        for link in &links {
            self.follow(record, kind, CheckStep::TriggerReferences, link, visited)?;
        }
        Ok(())
    }

    fn check_enemy(&self, record: &Record, _visited: &mut VisitedSets) -> ValidateResult<()> {
        let kind = RecordKind::Enemy;
        let rules = &self.rules.enemy;

        self.step(record, kind, CheckStep::Quotes, || {
            structure::check_quote_balance(record)
        })?;
        self.step(record, kind, CheckStep::Duplicates, || {
            structure::check_no_duplicate_keys(record, &rules.allowed_duplicates)
        })?;
        self.step(record, kind, CheckStep::KeyValues, || {
            let mut issues: Vec<Issue> = rules
                .domains
                .iter()
                .flat_map(|d| semantic::check_key_value_domain(record, &d.keys, &d.values, d.allow_empty))
                .collect();
            let drop = &rules.drop;
            issues.extend(semantic::check_single_key_domain(
                record,
                &drop.key,
                &drop.values,
                drop.allow_empty,
            ));
            issues
        })?;
        self.step(record, kind, CheckStep::AssetReferences, || {
            self.references(record, &rules.asset_roots, &ValueSet::default(), false)
        })?;

        tracing::info!("{} enemy validation passed", record.display_name());
        Ok(())
    }

    fn references(
        &self,
        record: &Record,
        roots: &KeyRoots,
        hardcoded: &ValueSet,
        allow_restricted: bool,
    ) -> Vec<Issue> {
        reference::check_references(record, roots, hardcoded, self.ctx, allow_restricted, self.source)
    }

    /// Run one check step; any issue rejects the record.
    fn step(
        &self,
        record: &Record,
        kind: RecordKind,
        step: CheckStep,
        check: impl FnOnce() -> Vec<Issue>,
    ) -> ValidateResult<()> {
        tracing::info!(%step, "checking {step}");
        let issues = check();
        if issues.is_empty() {
            tracing::debug!(%step, "{step} check passed");
            Ok(())
        } else {
            Err(self.reject(record, kind, step, issues))
        }
    }

    fn resolve_links(
        &self,
        record: &Record,
        kind: RecordKind,
        step: CheckStep,
        links: Vec<TriggerLink>,
        roots: &KeyRoots,
        allow_restricted: bool,
    ) -> ValidateResult<Vec<ResolvedLink>> {
        tracing::info!(%step, links = links.len(), "checking {step}");
        reference::resolve_trigger_links(links, roots, self.ctx, allow_restricted, self.source)
            .map_err(|issues| self.reject(record, kind, step, issues))
    }

    /// Enter the record a resolved link points at.
    fn follow(
        &self,
        parent: &Record,
        kind: RecordKind,
        step: CheckStep,
        resolved: &ResolvedLink,
        visited: &mut VisitedSets,
    ) -> ValidateResult<()> {
        let target_kind = resolved.link.target_kind;
        let identity = identity_path(&resolved.path);
        if !visited.insert(target_kind, &identity) {
            tracing::debug!(
                key = %resolved.link.source_key,
                "skipping already checked {target_kind} file {}",
                resolved.link.target
            );
            return Ok(());
        }

        tracing::info!(
            key = %resolved.link.source_key,
            "validating linked {target_kind} file {}",
            resolved.link.target
        );
        let child = match self.load_linked(&identity) {
            Ok(child) => child,
            Err(reason) => {
                let unreadable = Issue::UnreadableRecord {
                    key: resolved.link.source_key.clone(),
                    path: resolved.link.target.clone(),
                    reason,
                };
                return Err(self.reject(parent, kind, step, vec![unreadable]));
            }
        };
        if child.kind() != Some(target_kind) {
            let mismatch = Issue::KindMismatch {
                key: resolved.link.source_key.clone(),
                path: resolved.link.target.clone(),
                expected: target_kind,
                found: child.section().unwrap_or_default().to_string(),
            };
            return Err(self.reject(parent, kind, step, vec![mismatch]));
        }
        self.run(target_kind, &child, visited)
    }

    fn reject(&self, record: &Record, kind: RecordKind, step: CheckStep, issues: Vec<Issue>) -> ValidateError {
        for issue in &issues {
            tracing::warn!(%step, "{}: {issue}", record.display_name());
        }
        ValidateError::Rejected(RecordFailure {
            record: record.identity().to_path_buf(),
            kind,
            step,
            issues,
        })
    }
}

/// Top-level entry point: owns the rule book and the content source.
pub struct Validator<S = DiskSource> {
    rules: RuleBook,
    source: S,
    mod_prefix: Option<String>,
}

impl Validator<DiskSource> {
    /// A validator over the local filesystem.
    pub fn new(rules: RuleBook) -> Self {
        Self::with_source(rules, DiskSource)
    }
}

impl<S: ContentSource> Validator<S> {
    /// A validator reading content through `source`.
    pub fn with_source(rules: RuleBook, source: S) -> Self {
        Self {
            rules,
            source,
            mod_prefix: Some(DEFAULT_MOD_PREFIX.to_string()),
        }
    }

    /// Set the mod-relative prefix. `None` or an empty string disables it.
    pub fn with_mod_prefix(mut self, prefix: Option<&str>) -> Self {
        self.mod_prefix = prefix.map(str::to_string);
        self
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Validate the record at `path` and everything reachable from it.
    ///
    /// The content root is the directory containing `path`.
    ///
    /// # Errors
    ///
    /// `ReadRecord` if `path` cannot be read, `UnrecognizedRecord` if its
    /// header names no known kind, and any operational error met while
    /// walking. A rejected record is `Ok` with `ok == false`.
    pub fn validate(&self, path: &Path) -> ValidateResult<ValidationResult> {
        let identity = identity_path(path);
        let content_root = identity.parent().map(Path::to_path_buf).unwrap_or_default();
        let ctx = PathContext::new(content_root, self.mod_prefix.as_deref());

        let record = Record::load(&self.source, &identity).map_err(|source| {
            ValidateError::ReadRecord {
                path: identity.clone(),
                source,
            }
        })?;
        if let Some(kind) = record.kind() {
            tracing::info!("recognized {kind} file {}", record.display_name());
        }

        let walker = Walker::new(&self.rules, &ctx, &self.source);
        let mut visited = VisitedSets::new();
        let outcome = walker.validate_parsed(&record, &mut visited);
        let (events, enemies) = visited.into_lists();

        match outcome {
            Ok(()) => Ok(ValidationResult::ok(events, enemies)),
            Err(ValidateError::Rejected(failure)) => {
                Ok(ValidationResult::fail(failure, events, enemies))
            }
            Err(e) => Err(e),
        }
    }
}
