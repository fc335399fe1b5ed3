//! Predicate adapter rules
//!
//! [`Passes`] and [`Fails`] turn any closure over the value and the record
//! into a rule, which is the quickest way to add a one-off check without
//! implementing [`Rule`].

use super::{Rule, RuleOptions};
use crate::data::DataSet;
use crate::errors::ValidationResult;
use crate::types::Value;
use std::fmt;
use std::sync::Arc;

/// Shared predicate over a value and its record
pub type Predicate = Arc<dyn Fn(&Value, &DataSet<'_>) -> bool + Send + Sync>;

/// Passes when the predicate returns true
#[derive(Clone)]
pub struct Passes {
    options: RuleOptions,
    condition: Predicate,
}

impl Passes {
    pub fn new<F>(condition: F) -> Self
    where
        F: Fn(&Value, &DataSet<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            options: RuleOptions::default(),
            condition: Arc::new(condition),
        }
    }
}

impl Rule for Passes {
    rule_options!();

    fn check(&self, value: &Value, data: &DataSet<'_>) -> ValidationResult<bool> {
        Ok(self.should_ignore(value) || (self.condition)(value, data))
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` must pass a condition."
    }

    fn default_code(&self) -> &'static str {
        "passes"
    }
}

impl fmt::Debug for Passes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passes").field("options", &self.options).finish_non_exhaustive()
    }
}

/// Passes when the predicate returns false
#[derive(Clone)]
pub struct Fails {
    options: RuleOptions,
    condition: Predicate,
}

impl Fails {
    pub fn new<F>(condition: F) -> Self
    where
        F: Fn(&Value, &DataSet<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            options: RuleOptions::default(),
            condition: Arc::new(condition),
        }
    }
}

impl Rule for Fails {
    rule_options!();

    fn check(&self, value: &Value, data: &DataSet<'_>) -> ValidationResult<bool> {
        Ok(self.should_ignore(value) || !(self.condition)(value, data))
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` must fail a condition."
    }

    fn default_code(&self) -> &'static str {
        "fails"
    }
}

impl fmt::Debug for Fails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fails").field("options", &self.options).finish_non_exhaustive()
    }
}
