//! Field-level validation accumulator.
//!
//! # Responsibility
//! - Collect `(field, message)` failures during one validation pass.
//! - Provide pure predicate helpers reused by entity rule sets.
//!
//! # Invariants
//! - At most one message is kept per field; the first failure wins.
//! - A `Validator` is owned by the call that created it and is never shared.
//! - This module has no knowledge of storage or transport concerns.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::hash::Hash;

/// Sanity-check pattern for email addresses, meant to be passed to `matches`.
///
/// Part of the public validator toolkit for rule sets outside this crate;
/// the module rules do not use it.
pub static EMAIL_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid email regex")
});

/// Field name to failure message map produced by a validation pass.
pub type FieldErrors = BTreeMap<String, String>;

/// Accumulator of per-field validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    /// Creates a validator with no recorded failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when no failure has been recorded.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Records `message` under `field` unless that field already failed.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    /// Records `message` under `field` only when `ok` is `false`.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_error(field, message);
        }
    }

    /// Borrows the recorded failures.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Consumes the validator and returns the recorded failures.
    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}

/// Returns whether `value` matches `pattern`.
pub fn matches(value: &str, pattern: &Regex) -> bool {
    pattern.is_match(value)
}

/// Returns whether `value` equals one of `permitted`.
pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.iter().any(|candidate| candidate == value)
}

/// Returns whether all values are pairwise distinct.
///
/// Empty input is considered unique.
pub fn unique<T: Eq + Hash>(values: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().all(|value| seen.insert(value))
}
