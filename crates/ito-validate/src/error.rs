//! Validation error types.
//!
//! A rejected record is reported as [`ValidateError::Rejected`] while the
//! walk unwinds; [`crate::Validator::validate`] turns it back into a failing
//! `ValidationResult`. The other variants are problems with the run itself
//! and reach the caller as errors.

use std::path::PathBuf;

use ito_core::{RecordFailure, RecordKind};
use ito_rules::RulesError;
use thiserror::Error;

/// Errors that end a validation walk.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// A record failed one of its check steps.
    #[error("{0}")]
    Rejected(RecordFailure),

    /// Rule tables could not be loaded.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// A record file could not be read.
    #[error("failed to read record {path}: {source}")]
    ReadRecord {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The first non-blank line is not a known section tag.
    #[error("unrecognized file type {path}: header {header:?}")]
    UnrecognizedRecord { path: PathBuf, header: String },

    /// A record was validated as one kind but its header names another.
    #[error("{path} is not a {expected} record (header {header:?})")]
    WrongKind {
        path: PathBuf,
        expected: RecordKind,
        header: String,
    },
}

/// Result type alias for validation operations.
pub type ValidateResult<T> = Result<T, ValidateError>;
