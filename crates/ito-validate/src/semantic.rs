//! # Semantic Checks
//!
//! Enumerated key/value domains and prize-type gated domains. Every check
//! here collects all violations in the record.
//!
//! ## Prize Pairs
//!
//! Event prizes are written as key pairs: a prize-type key such as
//! `event_winprize_1=item` and a prize-value key such as
//! `event_winnumber_1=sword_01`. [`PrizePairs`] is the one place that
//! decides which keys form a pair; both the prize check and trigger-link
//! classification go through it.

use std::collections::HashMap;

use ito_core::{Entry, Issue, Record};
use ito_rules::ValueSet;

/// Role of a key in a prize pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairRole {
    /// Holds a prize type (`*winprize*`, `*failprize*`).
    PrizeType,
    /// Holds a prize value (`*winnumber*`, `*failnumber*`).
    PrizeValue,
}

/// Classify `key` as one half of a prize pair.
pub fn pair_role(key: &str) -> Option<PairRole> {
    if key.contains("winprize") || key.contains("failprize") {
        Some(PairRole::PrizeType)
    } else if key.contains("winnumber") || key.contains("failnumber") {
        Some(PairRole::PrizeValue)
    } else {
        None
    }
}

/// The prize-type key paired with a prize-value key.
pub fn sibling_prize_key(value_key: &str) -> String {
    value_key.replace("number", "prize")
}

/// One prize-value entry together with the type its sibling declares.
#[derive(Debug, Clone, Copy)]
pub struct PrizePair<'a> {
    /// The prize-value entry.
    pub value: &'a Entry,
    /// Value of the sibling prize-type key, if the record has one.
    pub prize_type: Option<&'a str>,
}

/// The prize/number partition of a record.
#[derive(Debug)]
pub struct PrizePairs<'a> {
    types: HashMap<&'a str, &'a str>,
    values: Vec<&'a Entry>,
}

impl<'a> PrizePairs<'a> {
    /// Partition the entries of `record`.
    ///
    /// When a prize-type key repeats, its last value wins. Prize-value
    /// entries keep document order.
    pub fn from_record(record: &'a Record) -> Self {
        let mut types = HashMap::new();
        let mut values = Vec::new();
        for entry in record.entries() {
            match pair_role(&entry.key) {
                Some(PairRole::PrizeType) => {
                    types.insert(entry.key.as_str(), entry.value.as_str());
                }
                Some(PairRole::PrizeValue) => values.push(entry),
                None => {}
            }
        }
        Self { types, values }
    }

    /// Every prize-value entry in document order, with its declared type.
    pub fn iter(&self) -> impl Iterator<Item = PrizePair<'a>> + '_ {
        self.values.iter().map(|&value| PrizePair {
            value,
            prize_type: self.types.get(sibling_prize_key(&value.key).as_str()).copied(),
        })
    }
}

/// Every entry whose key is in `keys` must hold a value from `values`.
///
/// Empty or whitespace values pass iff `allow_empty`.
pub fn check_key_value_domain(
    record: &Record,
    keys: &ValueSet,
    values: &ValueSet,
    allow_empty: bool,
) -> Vec<Issue> {
    record
        .entries()
        .iter()
        .filter(|e| keys.contains(&e.key))
        .filter_map(|e| domain_violation(e, values, allow_empty))
        .collect()
}

/// Single-key variant of [`check_key_value_domain`].
pub fn check_single_key_domain(
    record: &Record,
    key: &str,
    values: &ValueSet,
    allow_empty: bool,
) -> Vec<Issue> {
    record
        .entries()
        .iter()
        .filter(|e| e.key == key)
        .filter_map(|e| domain_violation(e, values, allow_empty))
        .collect()
}

fn domain_violation(entry: &Entry, values: &ValueSet, allow_empty: bool) -> Option<Issue> {
    if entry.is_blank() && allow_empty {
        return None;
    }
    if values.contains(&entry.value) {
        return None;
    }
    Some(Issue::InvalidValue {
        key: entry.key.clone(),
        value: entry.value.clone(),
    })
}

/// Where a prize-type key holds `prize_type`, its paired prize value must
/// be a member of `values`.
pub fn check_prize_domain(record: &Record, prize_type: &str, values: &ValueSet) -> Vec<Issue> {
    PrizePairs::from_record(record)
        .iter()
        .filter(|pair| pair.prize_type == Some(prize_type))
        .filter(|pair| !values.contains(&pair.value.value))
        .map(|pair| Issue::InvalidPrizeValue {
            key: pair.value.key.clone(),
            value: pair.value.value.clone(),
            prize_type: prize_type.to_string(),
        })
        .collect()
}
