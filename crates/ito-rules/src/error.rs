//! Rule-loading error types.
//!
//! A missing rule table is a configuration problem for the whole run, never
//! an empty rule set: every variant here aborts validation before any
//! record is checked.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading rule tables or the rule manifest.
#[derive(Debug, Error)]
pub enum RulesError {
    /// A required rule table or manifest does not exist.
    #[error("configuration file '{path}' not found; ensure the file exists to continue")]
    ConfigurationMissing { path: PathBuf },

    /// A rule table exists but could not be read.
    #[error("failed to read rule table {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The YAML rule manifest did not parse.
    #[error("failed to parse rule manifest at {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The manifest parsed but describes an unusable rule set.
    #[error("invalid rule manifest: {0}")]
    InvalidManifest(String),
}

/// Result type alias for rule operations.
pub type RulesResult<T> = Result<T, RulesError>;

/// Map an I/O error on `path` to the matching variant.
pub(crate) fn read_error(path: &std::path::Path, e: std::io::Error) -> RulesError {
    if e.kind() == std::io::ErrorKind::NotFound {
        RulesError::ConfigurationMissing {
            path: path.to_path_buf(),
        }
    } else {
        RulesError::Read {
            path: path.to_path_buf(),
            source: e,
        }
    }
}
