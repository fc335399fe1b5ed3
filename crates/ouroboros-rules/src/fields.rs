//! Field declarations
//!
//! A [`Field`] binds an attribute of the record to an ordered list of rules,
//! a display name for messages, an optional clean transform and an optional
//! condition on the outcome of other fields.

use crate::data::DataSet;
use crate::errors::{ErrorReport, ValidationError, ValidationResult};
use crate::rules::{Rule, NAME_PLACEHOLDER};
use crate::text::humanize;
use crate::types::{Placeholders, Value};
use std::fmt;
use std::sync::Arc;

/// Transform applied to the raw value before the rules run
pub type Cleaner = Arc<dyn Fn(Value, &DataSet<'_>) -> Value + Send + Sync>;

/// Builds a fresh rule for every validation
pub type RuleFactory = Arc<dyn Fn() -> Arc<dyn Rule> + Send + Sync>;

// ============================================================================
// Rule References
// ============================================================================

/// A rule attached to a field
#[derive(Clone)]
pub enum RuleRef {
    /// One instance, possibly shared with other fields
    Shared(Arc<dyn Rule>),
    /// A factory invoked each time the field is validated
    Factory(RuleFactory),
}

impl RuleRef {
    /// The rule to apply for this validation
    pub fn resolve(&self) -> Arc<dyn Rule> {
        match self {
            Self::Shared(rule) => Arc::clone(rule),
            Self::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for RuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared(rule) => write!(f, "Shared({})", rule.code()),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

// ============================================================================
// Conditions
// ============================================================================

/// The fields a condition looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Every other field evaluated before this one
    All,
    /// The named fields
    Fields(Vec<String>),
}

impl Trigger {
    /// Wildcard accepted by the `From<&str>` conversion
    pub const WILDCARD: &'static str = "*";
}

impl From<&str> for Trigger {
    fn from(field: &str) -> Self {
        if field == Self::WILDCARD {
            Self::All
        } else {
            Self::Fields(vec![field.to_string()])
        }
    }
}

impl From<String> for Trigger {
    fn from(field: String) -> Self {
        Self::from(field.as_str())
    }
}

impl From<Vec<String>> for Trigger {
    fn from(fields: Vec<String>) -> Self {
        Self::Fields(fields)
    }
}

impl From<Vec<&str>> for Trigger {
    fn from(fields: Vec<&str>) -> Self {
        Self::Fields(fields.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Trigger {
    fn from(fields: [&str; N]) -> Self {
        Self::Fields(fields.iter().map(|f| f.to_string()).collect())
    }
}

/// When a field is evaluated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Condition {
    /// Always, in the first pass
    #[default]
    Always,
    /// After the unconditional fields, when the trigger fields passed
    IfPasses(Trigger),
    /// After the unconditional fields, when a trigger field failed
    IfFails(Trigger),
}

impl Condition {
    /// The trigger of a conditional field
    pub fn trigger(&self) -> Option<&Trigger> {
        match self {
            Self::Always => None,
            Self::IfPasses(trigger) | Self::IfFails(trigger) => Some(trigger),
        }
    }
}

// ============================================================================
// Field
// ============================================================================

/// Declaration of one field to validate
#[derive(Clone)]
pub struct Field {
    attribute: String,
    rules: Vec<RuleRef>,
    display_name: String,
    error_message: Option<String>,
    condition: Condition,
    clean: Option<Cleaner>,
}

impl Field {
    /// Declare a field; its display name is the humanized attribute
    pub fn new(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self {
            display_name: humanize(&attribute),
            attribute,
            rules: Vec::new(),
            error_message: None,
            condition: Condition::Always,
            clean: None,
        }
    }

    /// Append a rule
    pub fn rule(self, rule: impl Rule + 'static) -> Self {
        self.shared_rule(Arc::new(rule))
    }

    /// Append a rule instance that may be shared with other fields
    pub fn shared_rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rules.push(RuleRef::Shared(rule));
        self
    }

    /// Append a rule built afresh for every validation
    pub fn rule_factory<F, R>(mut self, factory: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: Rule + 'static,
    {
        self.rules
            .push(RuleRef::Factory(Arc::new(move || Arc::new(factory()) as Arc<dyn Rule>)));
        self
    }

    /// Override the display name
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Message used by every rule that has no message of its own
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Only evaluate when the trigger fields passed
    pub fn if_passes(mut self, trigger: impl Into<Trigger>) -> Self {
        self.condition = Condition::IfPasses(trigger.into());
        self
    }

    /// Only evaluate when a trigger field failed
    pub fn if_fails(mut self, trigger: impl Into<Trigger>) -> Self {
        self.condition = Condition::IfFails(trigger.into());
        self
    }

    /// Transform the raw value before the rules see it
    pub fn clean<F>(mut self, clean: F) -> Self
    where
        F: Fn(Value, &DataSet<'_>) -> Value + Send + Sync + 'static,
    {
        self.clean = Some(Arc::new(clean));
        self
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn rules(&self) -> &[RuleRef] {
        &self.rules
    }

    /// Whether the field waits on other fields
    pub fn is_conditional(&self) -> bool {
        self.condition != Condition::Always
    }

    /// Apply the clean transform (identity when none is set)
    pub fn clean_value(&self, value: Value, data: &DataSet<'_>) -> Value {
        match &self.clean {
            Some(clean) => clean(value, data),
            None => value,
        }
    }

    /// Apply the rules in order, stopping at the first failure
    ///
    /// Rules without an explicit name get the display name, and rules
    /// without an explicit message get the field's error message.
    pub fn apply_rules(&self, value: &Value, data: &DataSet<'_>) -> ValidationResult<()> {
        for rule_ref in &self.rules {
            let rule = rule_ref.resolve();
            let mut placeholders = Placeholders::new();
            if rule.name().is_none() {
                placeholders.insert(NAME_PLACEHOLDER.to_string(), Value::from(&self.display_name));
            }

            match rule.validate(value, data, Some(&placeholders)) {
                Ok(()) => {}
                Err(ValidationError::Invalid(report)) => {
                    return Err(ValidationError::Invalid(self.override_message(&*rule, report)));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn override_message(&self, rule: &dyn Rule, report: ErrorReport) -> ErrorReport {
        let Some(message) = self.error_message.as_ref().filter(|_| !rule.has_message()) else {
            return report;
        };
        let entries = report
            .into_entries()
            .into_iter()
            .map(|mut entry| {
                entry.message = message.clone();
                entry
            })
            .collect();
        ErrorReport::List(entries)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("attribute", &self.attribute)
            .field("display_name", &self.display_name)
            .field("rules", &self.rules)
            .field("error_message", &self.error_message)
            .field("condition", &self.condition)
            .field("clean", &self.clean.is_some())
            .finish()
    }
}
