//! Rule contract and the built-in rule library
//!
//! A rule is a predicate ([`Rule::check`]) plus the message plumbing needed
//! to turn a failed check into an [`ErrorReport`] entry
//! ([`Rule::validate`]). Implementors only provide `check` and access to
//! their [`RuleOptions`]; everything else has a default.
//!
//! # Example
//!
//! ```rust
//! use ouroboros_rules::rules::{Max, Rule};
//! use ouroboros_rules::{DataSet, Value};
//!
//! let rule = Max::new(100).with_name("Age");
//! let data = DataSet::empty();
//!
//! assert!(rule.check(&Value::Int(100), &data).unwrap());
//!
//! let error = rule.validate(&Value::Int(101), &data, None).unwrap_err();
//! assert_eq!(
//!     error.report().unwrap().messages(),
//!     vec!["The `Age` must be less than or equal to 100."]
//! );
//! ```

use crate::data::DataSet;
use crate::errors::{ErrorEntry, ErrorReport, ValidationError, ValidationResult};
use crate::types::{Placeholders, Value};

/// Implements [`Rule::options`] and [`Rule::options_mut`] for a struct with
/// an `options: RuleOptions` field
macro_rules! rule_options {
    () => {
        fn options(&self) -> &$crate::rules::RuleOptions {
            &self.options
        }

        fn options_mut(&mut self) -> &mut $crate::rules::RuleOptions {
            &mut self.options
        }
    };
}

mod compare;
mod condition;
mod numeric;
mod pattern;
mod presence;

pub use compare::{Equals, Same};
pub use condition::{Fails, Passes, Predicate};
pub use numeric::{Integer, Length, Max, MaxLen, Min, MinLen};
pub use pattern::{
    Email, PhoneNumber, PhoneNumberE164, Regex, RegexFlags, Slug, Url, IP, IPv4, IPv6,
    DEFAULT_URL_SCHEMES,
};
pub use presence::{Empty, NotEmpty, Required};

/// Placeholder holding the field's display name
pub const NAME_PLACEHOLDER: &str = "__name__";

/// Placeholder holding the offending value
pub const VALUE_PLACEHOLDER: &str = "__value__";

/// Code used by rules that do not define their own
pub const DEFAULT_CODE: &str = "invalid";

// ============================================================================
// Missing and Empty Values
// ============================================================================

/// Whether a value counts as not provided: missing, absent, null or `""`
pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Missing | Value::Absent | Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Whether a value is missing or an empty list or object
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::List(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        other => is_missing(other),
    }
}

// ============================================================================
// Rule Options
// ============================================================================

/// Per-instance settings shared by every rule
#[derive(Debug, Clone, Default)]
pub struct RuleOptions {
    /// Message template overriding the rule's default
    pub message: Option<String>,

    /// Code overriding the rule's default
    pub code: Option<String>,

    /// Instance placeholders (type defaults such as `limit` are set here on
    /// construction)
    pub placeholders: Placeholders,

    /// Pass vacuously when the value is in `empty_values`
    pub ignore_empty: bool,

    /// Values treated as empty; `None` means [`is_missing`]
    pub empty_values: Option<Vec<Value>>,
}

impl RuleOptions {
    /// Options carrying one placeholder
    pub fn with_placeholder(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut options = Self::default();
        options.placeholders.insert(key.into(), value.into());
        options
    }
}

// ============================================================================
// Rule Trait
// ============================================================================

/// A named predicate with a message template
///
/// Rules must be side-effect free: one instance may be shared between
/// fields and threads through `Arc<dyn Rule>`.
pub trait Rule: Send + Sync {
    /// The predicate
    ///
    /// `Ok(false)` is a failed check. `Err` is reserved for values the rule
    /// cannot handle at all, such as incomparable types.
    fn check(&self, value: &Value, data: &DataSet<'_>) -> ValidationResult<bool>;

    /// Instance settings
    fn options(&self) -> &RuleOptions;

    /// Mutable instance settings, used by the builder methods
    fn options_mut(&mut self) -> &mut RuleOptions;

    /// Message template used when none is configured
    fn default_message(&self) -> &'static str {
        ""
    }

    /// Code used when none is configured
    fn default_code(&self) -> &'static str {
        DEFAULT_CODE
    }

    /// Value exposed to the message as `__value__`
    fn clean_value(&self, value: &Value) -> Value {
        value.clone()
    }

    /// Extra placeholders computed when a check fails
    ///
    /// These never override a placeholder that is already set.
    fn failure_placeholders(&self, _value: &Value, _data: &DataSet<'_>) -> Placeholders {
        Placeholders::new()
    }

    /// Whether the rule should pass without looking at the value
    fn should_ignore(&self, value: &Value) -> bool {
        let options = self.options();
        if !options.ignore_empty {
            return false;
        }
        match &options.empty_values {
            Some(values) => values.iter().any(|empty| empty.equals(value)),
            None => is_missing(value),
        }
    }

    /// Explicitly configured display name, if any
    fn name(&self) -> Option<&str> {
        self.options()
            .placeholders
            .get(NAME_PLACEHOLDER)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Whether a message template was configured on this instance
    fn has_message(&self) -> bool {
        self.options().message.is_some()
    }

    /// Effective message template
    fn message(&self) -> &str {
        self.options().message.as_deref().unwrap_or(self.default_message())
    }

    /// Effective code
    fn code(&self) -> &str {
        self.options().code.as_deref().unwrap_or(self.default_code())
    }

    /// Run the check and build an error on failure
    ///
    /// Placeholders are resolved in this order, later sources winning:
    /// record values, `__name__`/`__value__` defaults, instance
    /// placeholders, `placeholders`, [`Rule::failure_placeholders`] (only
    /// where unset) and finally `__value__`.
    fn validate(
        &self,
        value: &Value,
        data: &DataSet<'_>,
        placeholders: Option<&Placeholders>,
    ) -> ValidationResult<()> {
        if self.check(value, data)? {
            return Ok(());
        }

        let mut resolved = data.placeholders();
        resolved.insert(NAME_PLACEHOLDER.to_string(), Value::from(""));
        resolved.insert(VALUE_PLACEHOLDER.to_string(), Value::Null);
        resolved.extend(self.options().placeholders.clone());
        if let Some(extra) = placeholders {
            resolved.extend(extra.clone());
        }
        for (key, extra) in self.failure_placeholders(value, data) {
            resolved.entry(key).or_insert(extra);
        }
        resolved.insert(VALUE_PLACEHOLDER.to_string(), self.clean_value(value));

        Err(self.create_error(resolved))
    }

    /// Build the failure for resolved placeholders
    fn create_error(&self, placeholders: Placeholders) -> ValidationError {
        let entry = ErrorEntry::new(self.message())
            .with_code(self.code())
            .with_placeholders(placeholders);
        ValidationError::Invalid(ErrorReport::entry(entry))
    }

    /// Set the message template
    fn with_message(mut self, message: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.options_mut().message = Some(message.into());
        self
    }

    /// Set the display name, which the driver will then leave alone
    fn with_name(self, name: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.with_placeholder(NAME_PLACEHOLDER, name.into())
    }

    /// Set the failure code
    fn with_code(mut self, code: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.options_mut().code = Some(code.into());
        self
    }

    /// Set an instance placeholder
    fn with_placeholder(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self
    where
        Self: Sized,
    {
        self.options_mut().placeholders.insert(key.into(), value.into());
        self
    }

    /// Pass vacuously on empty values
    fn ignore_empty(mut self, ignore: bool) -> Self
    where
        Self: Sized,
    {
        self.options_mut().ignore_empty = ignore;
        self
    }

    /// Replace the set of values treated as empty
    fn empty_values(mut self, values: Vec<Value>) -> Self
    where
        Self: Sized,
    {
        self.options_mut().empty_values = Some(values);
        self
    }
}

/// Text form of a value as seen by string-based rules
pub(crate) fn text_of(value: &Value) -> String {
    value.to_string()
}
