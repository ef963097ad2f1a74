//! # Structural Checks
//!
//! Line-level well-formedness. Both checks stop at the first offending line
//! and return at most one issue.

use std::collections::HashMap;

use ito_core::{Issue, Record};
use ito_rules::ValueSet;

/// Every line must carry an even number of `"` characters.
pub fn check_quote_balance(record: &Record) -> Vec<Issue> {
    record
        .lines()
        .iter()
        .find(|l| l.raw.matches('"').count() % 2 != 0)
        .map(|l| Issue::MalformedLine { line: l.number })
        .into_iter()
        .collect()
}

/// No key or `[section]` tag may appear twice unless it is in `allowed`.
///
/// The reported first line is the first occurrence of the name, even when
/// allowed repeats came in between.
pub fn check_no_duplicate_keys(record: &Record, allowed: &ValueSet) -> Vec<Issue> {
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for line in record.lines() {
        let trimmed = line.trimmed();
        let (name, is_section) = match trimmed.split_once('=') {
            Some((key, _)) => (key.trim(), false),
            None if line.is_section() => (trimmed, true),
            None => continue,
        };

        if let Some(&first_line) = seen.get(name) {
            if allowed.contains(name) {
                continue;
            }
            let issue = if is_section {
                Issue::DuplicateSection {
                    section: name.to_string(),
                    first_line,
                    second_line: line.number,
                }
            } else {
                Issue::DuplicateKey {
                    key: name.to_string(),
                    first_line,
                    second_line: line.number,
                }
            };
            return vec![issue];
        }
        seen.insert(name, line.number);
    }

    Vec::new()
}
