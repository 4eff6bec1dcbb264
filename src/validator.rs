//! Purpose: Accumulate independent field checks into a field-addressable report.
//! Exports: `Validator`, `unique`, `permitted_value`.
//! Role: Domain-tier half of the error model; resource rules are built on `check`.
//! Invariants: At most one message per field; the first failure wins.
//! Invariants: Iteration order is sorted by field name, independent of check order.
//! Invariants: Request-scoped; a validator is never shared between requests.

use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Validator {
    errors: BTreeMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` for `field` unless the field already failed.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    /// Record a failure when `passed` is false.
    pub fn check(&mut self, passed: bool, field: &str, message: &str) {
        if !passed {
            self.add_error(field, message);
        }
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }
}

pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|value| seen.insert(value))
}

pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}
