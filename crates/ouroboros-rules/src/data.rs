//! Uniform access to the record being validated
//!
//! A [`DataSet`] hides whether the record is a mapping or an
//! attribute-bearing object behind one `get`/`set` interface. The shape is
//! chosen once, when the data set is constructed.

use crate::errors::{ValidationError, ValidationResult};
use crate::types::{Placeholders, Value};

// ============================================================================
// Attributes Trait
// ============================================================================

/// Attribute access for object-like records
///
/// Implement this for domain types that should be validated without first
/// converting them to a [`Value::Object`].
pub trait Attributes {
    /// Read an attribute, `None` when the object has no such attribute
    fn get_attribute(&self, name: &str) -> Option<Value>;

    /// Write an attribute back
    ///
    /// Objects are read-only unless they override this.
    fn set_attribute(&mut self, name: &str, value: Value) -> ValidationResult<()> {
        let _ = value;
        Err(ValidationError::Configuration(format!(
            "attribute `{}` is read-only",
            name
        )))
    }

    /// All attribute values, exposed to message templates as placeholders
    fn attribute_values(&self) -> Vec<(String, Value)> {
        Vec::new()
    }
}

// ============================================================================
// DataSet
// ============================================================================

/// Get/set facade over the record under validation
pub enum DataSet<'a> {
    /// Key lookup over insertion-ordered pairs
    Mapping(&'a mut Vec<(String, Value)>),
    /// Attribute lookup through [`Attributes`]
    Attributes(&'a mut dyn Attributes),
    /// No record; every lookup yields the default
    Empty,
}

impl<'a> DataSet<'a> {
    /// Wrap mapping pairs
    pub fn mapping(pairs: &'a mut Vec<(String, Value)>) -> Self {
        Self::Mapping(pairs)
    }

    /// Wrap an attribute-bearing object
    pub fn attributes(object: &'a mut dyn Attributes) -> Self {
        Self::Attributes(object)
    }

    /// A data set with no record behind it
    pub fn empty() -> Self {
        Self::Empty
    }

    /// Borrow this data set again without copying the record
    pub fn reborrow(&mut self) -> DataSet<'_> {
        match self {
            Self::Mapping(pairs) => DataSet::Mapping(&mut **pairs),
            Self::Attributes(object) => DataSet::Attributes(&mut **object),
            Self::Empty => DataSet::Empty,
        }
    }

    /// Whether the record is a mapping
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// Look up a key, returning [`Value::Missing`] when it is absent
    pub fn get(&self, key: &str) -> Value {
        self.get_or(key, Value::Missing)
    }

    /// Look up a key, returning `default` unchanged when it is absent
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        let found = match self {
            Self::Mapping(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone()),
            Self::Attributes(object) => object.get_attribute(key),
            Self::Empty => None,
        };
        found.unwrap_or(default)
    }

    /// Whether the record has a value for `key`
    pub fn contains(&self, key: &str) -> bool {
        !self.get(key).is_missing()
    }

    /// Store a value under `key`
    pub fn set(&mut self, key: &str, value: Value) -> ValidationResult<()> {
        match self {
            Self::Mapping(pairs) => {
                match pairs.iter_mut().find(|(k, _)| k == key) {
                    Some((_, slot)) => *slot = value,
                    None => pairs.push((key.to_string(), value)),
                }
                Ok(())
            }
            Self::Attributes(object) => object.set_attribute(key, value),
            Self::Empty => Err(ValidationError::Configuration(format!(
                "cannot set `{}` on an empty data set",
                key
            ))),
        }
    }

    /// Record values as message placeholders
    pub fn placeholders(&self) -> Placeholders {
        match self {
            Self::Mapping(pairs) => pairs.iter().cloned().collect(),
            Self::Attributes(object) => object.attribute_values().into_iter().collect(),
            Self::Empty => Placeholders::new(),
        }
    }
}

impl std::fmt::Debug for DataSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mapping(pairs) => f.debug_tuple("Mapping").field(pairs).finish(),
            Self::Attributes(_) => f.write_str("Attributes(..)"),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

impl<'a> From<&'a mut Vec<(String, Value)>> for DataSet<'a> {
    fn from(pairs: &'a mut Vec<(String, Value)>) -> Self {
        Self::Mapping(pairs)
    }
}

impl<'a> From<&'a mut Value> for DataSet<'a> {
    fn from(value: &'a mut Value) -> Self {
        match value {
            Value::Object(pairs) => Self::Mapping(pairs),
            _ => Self::Empty,
        }
    }
}
