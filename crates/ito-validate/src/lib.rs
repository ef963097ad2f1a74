//! # ito-validate: Content Graph Validation
//!
//! Checks a mystery, event or enemy record and everything reachable from it.
//!
//! ## Pipeline
//!
//! Each record runs a fixed sequence of steps for its kind. The first step
//! that reports any issue rejects the record, and the first rejected record
//! ends the whole walk.
//!
//! 1. [`structure`]: quote balance, duplicate keys and sections.
//! 2. [`semantic`]: enumerated key/value domains, prize-type gated domains.
//! 3. [`reference`]: path-valued keys against the content tree, and the
//!    trigger links that point at further records.
//! 4. [`walker`]: recursion over trigger links with per-run visited sets.
//!
//! ## Entry Point
//!
//! [`Validator::validate`] takes the path of a top-level record, detects
//! its kind from the header and returns a [`ValidationResult`]. A rejected
//! record is an `Ok` result with `ok == false`; only problems with the run
//! itself (rule tables, unreadable input) are `Err`.
//!
//! [`ValidationResult`]: ito_core::ValidationResult

pub mod error;
pub mod reference;
pub mod semantic;
pub mod structure;
pub mod walker;

pub use error::{ValidateError, ValidateResult};
pub use reference::{PathContext, PathOutcome, ResolvedLink, TriggerLink};
pub use walker::{Validator, VisitedSets, Walker, DEFAULT_MOD_PREFIX};
