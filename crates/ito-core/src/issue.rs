//! # Diagnostics
//!
//! Every check in the workspace reports problems as [`Issue`] values. A
//! check step collects all issues it finds in one record and returns them
//! together; the walker decides whether the step failed by looking at
//! whether the list is empty.
//!
//! Quote and duplicate issues are fatal for their step (scanning stops at
//! the first one). All other variants accumulate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::RecordKind;

/// A single problem found in a content record.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// A line carries an odd number of `"` characters.
    #[error("unclosed quotes found at line {line}")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
    },

    /// A key appears twice and is not on the allowed-duplicates list.
    #[error("duplicate key '{key}' found at line {second_line} (first seen at line {first_line})")]
    DuplicateKey {
        key: String,
        first_line: usize,
        second_line: usize,
    },

    /// A `[section]` tag appears twice.
    #[error("duplicate section '{section}' found at line {second_line} (first seen at line {first_line})")]
    DuplicateSection {
        section: String,
        first_line: usize,
        second_line: usize,
    },

    /// An enumerated key holds a value outside its domain.
    #[error("incorrect value '{value}' for key '{key}'")]
    InvalidValue { key: String, value: String },

    /// A prize number is outside the domain of its paired prize type.
    #[error("incorrect prize '{value}' for prize type '{prize_type}' at key '{key}'")]
    InvalidPrizeValue {
        key: String,
        value: String,
        prize_type: String,
    },

    /// A reference does not start with the root its key requires.
    #[error("missing required root '{required}' for key '{key}', found '{found}'")]
    MissingRequiredRoot {
        key: String,
        required: String,
        found: String,
    },

    /// A referenced file does not exist under the content root.
    #[error("file not found: {path} referenced at key '{key}'")]
    FileNotFound { key: String, path: String },

    /// A referenced file name begins with `n` or `r`.
    #[error("filename '{filename}' starts with restricted character 'n' or 'r' at key '{key}'")]
    RestrictedFilename { key: String, filename: String },

    /// A trigger link points at a record of a different kind.
    #[error("'{path}' referenced at key '{key}' is not a {expected} record (header: {found})")]
    KindMismatch {
        key: String,
        path: String,
        expected: RecordKind,
        found: String,
    },

    /// A trigger link points at something that cannot be read as a record:
    /// a directory, or a file that is not UTF-8 text.
    #[error("'{path}' referenced at key '{key}' cannot be read: {reason}")]
    UnreadableRecord {
        key: String,
        path: String,
        reason: String,
    },
}

impl Issue {
    /// Stable snake_case identifier of the variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedLine { .. } => "malformed_line",
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::DuplicateSection { .. } => "duplicate_section",
            Self::InvalidValue { .. } => "invalid_value",
            Self::InvalidPrizeValue { .. } => "invalid_prize_value",
            Self::MissingRequiredRoot { .. } => "missing_required_root",
            Self::FileNotFound { .. } => "file_not_found",
            Self::RestrictedFilename { .. } => "restricted_filename",
            Self::KindMismatch { .. } => "kind_mismatch",
            Self::UnreadableRecord { .. } => "unreadable_record",
        }
    }
}
