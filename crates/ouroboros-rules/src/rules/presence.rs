//! Presence rules: Required, NotEmpty and Empty
//!
//! These rules are about absence itself, so they never consult
//! `ignore_empty`.

use super::{is_empty, is_missing, Rule, RuleOptions};
use crate::data::DataSet;
use crate::errors::ValidationResult;
use crate::types::Value;

/// Fails when the value was not provided
///
/// Missing, absent, null and `""` count as not provided. An empty list or
/// object is provided; use [`NotEmpty`] to reject those too.
#[derive(Debug, Clone, Default)]
pub struct Required {
    options: RuleOptions,
    also_missing: Vec<Value>,
}

impl Required {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat additional values as not provided
    pub fn also_missing(mut self, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        self.also_missing.extend(values.into_iter().map(Into::into));
        self
    }
}

impl Rule for Required {
    rule_options!();

    fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
        let missing = is_missing(value) || self.also_missing.iter().any(|m| m.equals(value));
        Ok(!missing)
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` field is required."
    }

    fn default_code(&self) -> &'static str {
        "required"
    }
}

/// Fails when the value is missing or an empty collection
#[derive(Debug, Clone, Default)]
pub struct NotEmpty {
    options: RuleOptions,
}

impl NotEmpty {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rule for NotEmpty {
    rule_options!();

    fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
        Ok(!is_empty(value))
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` field should not be empty."
    }

    fn default_code(&self) -> &'static str {
        "not_empty"
    }
}

/// Passes only when the value is missing or an empty collection
#[derive(Debug, Clone, Default)]
pub struct Empty {
    options: RuleOptions,
}

impl Empty {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rule for Empty {
    rule_options!();

    fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
        Ok(is_empty(value))
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` field should be empty."
    }

    fn default_code(&self) -> &'static str {
        "empty"
    }
}
