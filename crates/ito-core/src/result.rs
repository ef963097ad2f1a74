//! # Validation Results
//!
//! [`CheckStep`] names the ordered steps of a record pipeline,
//! [`RecordFailure`] captures the first step that reported issues, and
//! [`ValidationResult`] is what a top-level run hands back to its caller.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::issue::Issue;
use crate::record::RecordKind;

/// One step of a record pipeline. Steps run in a fixed order per kind and
/// the first step that reports any issue ends validation of that record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStep {
    Quotes,
    Duplicates,
    KeyValues,
    Prizes,
    AssetReferences,
    MusicReferences,
    TriggerReferences,
    ForcedEvents,
}

impl CheckStep {
    /// Human-readable step name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Quotes => "quotes",
            Self::Duplicates => "key duplicates",
            Self::KeyValues => "keys and values",
            Self::Prizes => "prizes",
            Self::AssetReferences => "asset references",
            Self::MusicReferences => "music references",
            Self::TriggerReferences => "trigger references",
            Self::ForcedEvents => "forced events",
        }
    }
}

impl fmt::Display for CheckStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The step that rejected a record, and everything it found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    /// Identity path of the rejected record.
    pub record: PathBuf,
    /// Kind of the rejected record.
    pub kind: RecordKind,
    /// The step that reported issues.
    pub step: CheckStep,
    /// All issues reported by that step, in discovery order.
    pub issues: Vec<Issue>,
}

impl RecordFailure {
    /// Issues rendered as `<file name>: <issue>` lines.
    pub fn messages(&self) -> Vec<String> {
        let name = self
            .record
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.record.display().to_string());
        self.issues.iter().map(|i| format!("{name}: {i}")).collect()
    }
}

impl fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} failed {} check ({} issue(s))",
            self.kind,
            self.record.display(),
            self.step,
            self.issues.len()
        )
    }
}

/// Outcome of a top-level validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the whole reachable graph validated.
    pub ok: bool,
    /// Human-readable diagnostics of the first failing record.
    pub errors: Vec<String>,
    /// The first failing record, if any.
    pub failure: Option<RecordFailure>,
    /// Event identities entered during the run, sorted.
    pub events: Vec<PathBuf>,
    /// Enemy identities entered during the run, sorted.
    pub enemies: Vec<PathBuf>,
}

impl ValidationResult {
    /// A passing result.
    pub fn ok(events: Vec<PathBuf>, enemies: Vec<PathBuf>) -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            failure: None,
            events,
            enemies,
        }
    }

    /// A failing result built from the record that stopped the walk.
    pub fn fail(failure: RecordFailure, events: Vec<PathBuf>, enemies: Vec<PathBuf>) -> Self {
        Self {
            ok: false,
            errors: failure.messages(),
            failure: Some(failure),
            events,
            enemies,
        }
    }
}
