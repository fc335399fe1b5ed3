//! Integer, bound and length rules

use super::{Rule, RuleOptions};
use crate::data::DataSet;
use crate::errors::{ValidationError, ValidationResult};
use crate::formats::INTEGER_REGEX;
use crate::types::Value;
use std::cmp::Ordering;

/// Placeholder holding the configured bound
pub const LIMIT_PLACEHOLDER: &str = "limit";

fn compare(value: &Value, limit: &Value) -> ValidationResult<Ordering> {
    value.compare(limit).ok_or_else(|| {
        ValidationError::Coercion(format!(
            "cannot compare {} `{}` with {} `{}`",
            value.type_name(),
            value,
            limit.type_name(),
            limit
        ))
    })
}

fn length(value: &Value) -> ValidationResult<usize> {
    value.len().ok_or_else(|| {
        ValidationError::Coercion(format!("value of type {} has no length", value.type_name()))
    })
}

// ============================================================================
// Integer
// ============================================================================

/// Integral value or the canonical text of one
///
/// Integers pass. Strings pass when they read back unchanged as an integer,
/// so `"20"` and `"-3"` pass while `"20.0"`, `"+2"` and `"020"` fail.
/// Floats and booleans fail even when integral.
#[derive(Debug, Clone, Default)]
pub struct Integer {
    options: RuleOptions,
}

impl Integer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Rule for Integer {
    rule_options!();

    fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
        if self.should_ignore(value) {
            return Ok(true);
        }
        Ok(match value {
            Value::Int(_) => true,
            Value::String(s) => INTEGER_REGEX.is_match(s),
            _ => false,
        })
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` must be an integer."
    }

    fn default_code(&self) -> &'static str {
        "integer"
    }
}

// ============================================================================
// Bounds
// ============================================================================

/// Value must not be greater than the limit
#[derive(Debug, Clone)]
pub struct Max {
    options: RuleOptions,
    limit: Value,
}

impl Max {
    pub fn new(limit: impl Into<Value>) -> Self {
        let limit = limit.into();
        Self {
            options: RuleOptions::with_placeholder(LIMIT_PLACEHOLDER, limit.clone()),
            limit,
        }
    }

    pub fn limit(&self) -> &Value {
        &self.limit
    }
}

impl Rule for Max {
    rule_options!();

    fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
        if self.should_ignore(value) {
            return Ok(true);
        }
        Ok(compare(value, &self.limit)? != Ordering::Greater)
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` must be less than or equal to {limit}."
    }

    fn default_code(&self) -> &'static str {
        "max"
    }
}

/// Value must not be less than the limit
#[derive(Debug, Clone)]
pub struct Min {
    options: RuleOptions,
    limit: Value,
}

impl Min {
    pub fn new(limit: impl Into<Value>) -> Self {
        let limit = limit.into();
        Self {
            options: RuleOptions::with_placeholder(LIMIT_PLACEHOLDER, limit.clone()),
            limit,
        }
    }

    pub fn limit(&self) -> &Value {
        &self.limit
    }
}

impl Rule for Min {
    rule_options!();

    fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
        if self.should_ignore(value) {
            return Ok(true);
        }
        Ok(compare(value, &self.limit)? != Ordering::Less)
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` must be greater than or equal to {limit}."
    }

    fn default_code(&self) -> &'static str {
        "min"
    }
}

// ============================================================================
// Lengths
// ============================================================================

/// At most `limit` items (characters for strings)
#[derive(Debug, Clone)]
pub struct MaxLen {
    options: RuleOptions,
    limit: usize,
}

impl MaxLen {
    pub fn new(limit: usize) -> Self {
        Self {
            options: RuleOptions::with_placeholder(LIMIT_PLACEHOLDER, limit),
            limit,
        }
    }
}

impl Rule for MaxLen {
    rule_options!();

    fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
        Ok(self.should_ignore(value) || length(value)? <= self.limit)
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` must be at most {limit} character(s)."
    }

    fn default_code(&self) -> &'static str {
        "max_length"
    }
}

/// At least `limit` items (characters for strings)
#[derive(Debug, Clone)]
pub struct MinLen {
    options: RuleOptions,
    limit: usize,
}

impl MinLen {
    pub fn new(limit: usize) -> Self {
        Self {
            options: RuleOptions::with_placeholder(LIMIT_PLACEHOLDER, limit),
            limit,
        }
    }
}

impl Rule for MinLen {
    rule_options!();

    fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
        Ok(self.should_ignore(value) || length(value)? >= self.limit)
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` must be at least {limit} character(s)."
    }

    fn default_code(&self) -> &'static str {
        "min_length"
    }
}

/// Exactly `limit` items (characters for strings)
#[derive(Debug, Clone)]
pub struct Length {
    options: RuleOptions,
    limit: usize,
}

impl Length {
    pub fn new(limit: usize) -> Self {
        Self {
            options: RuleOptions::with_placeholder(LIMIT_PLACEHOLDER, limit),
            limit,
        }
    }
}

impl Rule for Length {
    rule_options!();

    fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
        Ok(self.should_ignore(value) || length(value)? == self.limit)
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` must be {limit} character(s)."
    }

    fn default_code(&self) -> &'static str {
        "length"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(rule: &impl Rule, value: impl Into<Value>) -> ValidationResult<bool> {
        rule.check(&value.into(), &DataSet::empty())
    }

    #[test]
    fn test_integer() {
        let rule = Integer::new();
        assert!(check(&rule, 20).unwrap());
        assert!(check(&rule, "20").unwrap());
        assert!(check(&rule, "-3").unwrap());
        assert!(check(&Integer::new().ignore_empty(true), "").unwrap());
        assert!(!check(&rule, 23.5).unwrap());
        assert!(!check(&rule, 20.0).unwrap());
        assert!(!check(&rule, "20.0").unwrap());
        assert!(!check(&rule, "23i").unwrap());
        assert!(!check(&rule, "").unwrap());
        assert!(!check(&rule, true).unwrap());
        assert!(!check(&rule, Value::Object(vec![])).unwrap());
    }

    #[test]
    fn test_max() {
        assert!(!check(&Max::new(100), 101).unwrap());
        assert!(check(&Max::new(100), 100).unwrap());
        assert!(check(&Max::new(100), 99.5).unwrap());
        assert!(check(&Max::new(100).ignore_empty(true), "").unwrap());
        assert!(check(&Max::new("30"), "20").unwrap());
        assert!(!check(&Max::new("30"), "4").unwrap());
    }

    #[test]
    fn test_min() {
        assert!(check(&Min::new(18), 18).unwrap());
        assert!(!check(&Min::new(18), 17).unwrap());
        assert!(check(&Min::new("20"), "30").unwrap());
        assert!(check(&Min::new(0).ignore_empty(true), Value::Null).unwrap());
    }

    #[test]
    fn test_incomparable_bound_is_coercion_error() {
        assert!(matches!(check(&Max::new(100), ""), Err(ValidationError::Coercion(_))));
        assert!(matches!(check(&Min::new(1), "1"), Err(ValidationError::Coercion(_))));
    }

    #[test]
    fn test_lengths() {
        assert!(check(&MaxLen::new(3), "abc").unwrap());
        assert!(!check(&MaxLen::new(3), "abcd").unwrap());
        assert!(check(&MinLen::new(2), Value::list([1, 2])).unwrap());
        assert!(!check(&MinLen::new(2), "a").unwrap());
        assert!(check(&Length::new(4), "héll").unwrap());
        assert!(!check(&Length::new(4), "abc").unwrap());
        assert!(check(&MinLen::new(5).ignore_empty(true), "").unwrap());
    }

    #[test]
    fn test_unsized_value_is_coercion_error() {
        assert!(matches!(check(&MaxLen::new(3), 42), Err(ValidationError::Coercion(_))));
        assert!(matches!(check(&Length::new(0), Value::Null), Err(ValidationError::Coercion(_))));
    }

    #[test]
    fn test_limit_placeholder() {
        let error = Max::new(100)
            .with_name("Age")
            .validate(&Value::Int(101), &DataSet::empty(), None)
            .unwrap_err();
        let report = error.into_report().unwrap();
        let entries = report.entries();
        let entry = entries[0];
        assert_eq!(entry.placeholders[LIMIT_PLACEHOLDER], Value::Int(100));
        assert_eq!(entry.placeholders["__value__"], Value::Int(101));
        assert_eq!(entry.code.as_deref(), Some("max"));
        assert_eq!(report.messages(), vec!["The `Age` must be less than or equal to 100."]);

        let error = MinLen::new(8)
            .validate(&Value::from("short"), &DataSet::empty(), None)
            .unwrap_err();
        assert_eq!(
            error.into_report().unwrap().messages(),
            vec!["The  must be at least 8 character(s)."]
        );
    }
}
