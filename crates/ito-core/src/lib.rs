//! # ito-core: Foundational Types for the Content Checker
//!
//! Every other crate in the workspace depends on `ito-core`; it depends on
//! nothing internal.
//!
//! ## Contents
//!
//! - [`record`]: parsing of `.ito` content files (`[section]` header plus
//!   `key=value` lines) into an immutable [`Record`].
//! - [`issue`]: the [`Issue`] diagnostic enum shared by every check.
//! - [`result`]: [`CheckStep`], [`RecordFailure`] and the run-level
//!   [`ValidationResult`].
//! - [`source`]: the [`ContentSource`] seam through which all file reads and
//!   existence checks flow.
//! - [`path`]: separator normalization and lexical path helpers.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ito-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Records are never mutated after parsing.

pub mod issue;
pub mod path;
pub mod record;
pub mod result;
pub mod source;

pub use issue::Issue;
pub use path::{identity_path, join_relative, lexical_normalize, normalize_separators};
pub use record::{Entry, Record, RecordKind, RecordLine};
pub use result::{CheckStep, RecordFailure, ValidationResult};
pub use source::{ContentSource, DiskSource};
