//! Comparison rules: Same and Equals

use super::{Rule, RuleOptions};
use crate::data::DataSet;
use crate::errors::ValidationResult;
use crate::text::humanize;
use crate::types::{Placeholders, Value};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Same
// ============================================================================

/// Value must equal another field of the same record
///
/// The other field is read through the [`DataSet`]; when it does not exist
/// the lookup yields [`Value::Missing`] and the check fails.
#[derive(Debug, Clone)]
pub struct Same {
    options: RuleOptions,
    other: String,
}

impl Same {
    /// Compare against the field `other`; `{other}` renders its humanized name
    pub fn new(other: impl Into<String>) -> Self {
        let other = other.into();
        Self {
            options: RuleOptions::with_placeholder("other", humanize(&other)),
            other,
        }
    }

    /// Display name used for `{other}`
    pub fn other_name(self, name: impl Into<String>) -> Self {
        self.with_placeholder("other", name.into())
    }

    pub fn other(&self) -> &str {
        &self.other
    }
}

impl Rule for Same {
    rule_options!();

    fn check(&self, value: &Value, data: &DataSet<'_>) -> ValidationResult<bool> {
        if self.should_ignore(value) {
            return Ok(true);
        }
        Ok(value.equals(&data.get(&self.other)))
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` and `{other}` fields must match."
    }

    fn default_code(&self) -> &'static str {
        "same"
    }
}

// ============================================================================
// Equals
// ============================================================================

#[derive(Clone)]
enum Expected {
    Fixed(Value),
    Lazy(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl fmt::Debug for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// Value must equal a fixed or computed value
///
/// A computed value is produced again on every check, so the rule holds no
/// per-call state and can be shared freely.
#[derive(Debug, Clone)]
pub struct Equals {
    options: RuleOptions,
    expected: Expected,
    as_str: bool,
}

impl Equals {
    /// Compare against a fixed value
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            options: RuleOptions::default(),
            expected: Expected::Fixed(value.into()),
            as_str: false,
        }
    }

    /// Compare against a value computed at check time
    pub fn lazy(compute: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self {
            options: RuleOptions::default(),
            expected: Expected::Lazy(Arc::new(compute)),
            as_str: false,
        }
    }

    /// Compare the text forms of both sides
    pub fn as_str(mut self, as_str: bool) -> Self {
        self.as_str = as_str;
        self
    }

    /// The value compared against
    pub fn expected(&self) -> Value {
        match &self.expected {
            Expected::Fixed(value) => value.clone(),
            Expected::Lazy(compute) => compute(),
        }
    }
}

impl Rule for Equals {
    rule_options!();

    fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
        if self.should_ignore(value) {
            return Ok(true);
        }
        let expected = self.expected();
        if self.as_str {
            return Ok(value.to_string() == expected.to_string());
        }
        Ok(value.equals(&expected))
    }

    fn failure_placeholders(&self, _value: &Value, _data: &DataSet<'_>) -> Placeholders {
        std::iter::once(("other_value".to_string(), self.expected())).collect()
    }

    fn default_message(&self) -> &'static str {
        "The value of '{__name__}' should be equal to {other_value}."
    }

    fn default_code(&self) -> &'static str {
        "equals"
    }
}
