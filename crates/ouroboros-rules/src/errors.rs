//! Validation error types
//!
//! This module defines the error taxonomy of the engine and the
//! [`ErrorReport`] that aggregates rule failures, either as a flat list or
//! keyed by field.

use crate::text;
use crate::types::Placeholders;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Bucket used for errors that are not attributed to a field
pub const NON_FIELD_ERRORS: &str = "__all__";

// ============================================================================
// Validation Result
// ============================================================================

/// Validation result type
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Everything that can go wrong while validating
#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    /// One or more rules failed; the expected, recoverable outcome
    #[error("Validation failed: {0}")]
    Invalid(ErrorReport),

    /// A rule, field or report was declared incorrectly
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A rule could not compare or measure the value it was given
    #[error("Coercion error: {0}")]
    Coercion(String),
}

impl ValidationError {
    /// Returns true if this is a rule failure rather than a programmer error
    pub fn is_invalid(&self) -> bool {
        matches!(self, ValidationError::Invalid(_))
    }

    /// Borrow the report of a rule failure
    pub fn report(&self) -> Option<&ErrorReport> {
        match self {
            ValidationError::Invalid(report) => Some(report),
            _ => None,
        }
    }

    /// Take the report of a rule failure
    pub fn into_report(self) -> Option<ErrorReport> {
        match self {
            ValidationError::Invalid(report) => Some(report),
            _ => None,
        }
    }
}

impl From<ErrorReport> for ValidationError {
    fn from(report: ErrorReport) -> Self {
        ValidationError::Invalid(report)
    }
}

// ============================================================================
// Error Entry
// ============================================================================

/// A single failure: an unrendered message template and its placeholders
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorEntry {
    /// Message template with `{name}` placeholders
    pub message: String,

    /// Machine-readable failure kind
    pub code: Option<String>,

    /// Values substituted into the template when rendering
    pub placeholders: Placeholders,
}

impl ErrorEntry {
    /// Create an entry without code or placeholders
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Set the failure code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the placeholders
    pub fn with_placeholders(mut self, placeholders: Placeholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Render the message
    pub fn render(&self) -> String {
        text::render(&self.message, &self.placeholders)
    }
}

// ============================================================================
// Error Report
// ============================================================================

/// Normalized, mergeable collection of failures
///
/// A report is either a flat list of entries or a mapping from field name to
/// a list of entries. Nested reports are flattened when the report is built,
/// so a report never contains another report.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorReport {
    /// Entries without field attribution
    List(Vec<ErrorEntry>),
    /// Entries keyed by field, in insertion order
    Dict(Vec<(String, Vec<ErrorEntry>)>),
}

/// One item yielded when iterating a report
#[derive(Debug, Clone, PartialEq)]
pub enum ReportItem {
    /// A field and its rendered messages (dict-shaped reports)
    Field {
        /// Field name
        field: String,
        /// Rendered messages for the field
        messages: Vec<String>,
    },
    /// A rendered message (list-shaped reports)
    Message(String),
}

fn push_field(fields: &mut Vec<(String, Vec<ErrorEntry>)>, field: String, entries: Vec<ErrorEntry>) {
    match fields.iter_mut().find(|(name, _)| *name == field) {
        Some((_, existing)) => existing.extend(entries),
        None => fields.push((field, entries)),
    }
}

fn render_all(entries: &[ErrorEntry]) -> Vec<String> {
    entries.iter().map(ErrorEntry::render).collect()
}

impl ErrorReport {
    /// A report holding one plain message
    pub fn message(message: impl Into<String>) -> Self {
        Self::List(vec![ErrorEntry::new(message)])
    }

    /// A report holding one entry
    pub fn entry(entry: ErrorEntry) -> Self {
        Self::List(vec![entry])
    }

    /// Build a list-shaped report
    ///
    /// Each item is normalized first. Field-keyed items are spread into the
    /// list and lose their field attribution.
    pub fn list<T, I>(items: I) -> Self
    where
        T: Into<ErrorReport>,
        I: IntoIterator<Item = T>,
    {
        let entries = items.into_iter().flat_map(|item| item.into().into_entries()).collect();
        Self::List(entries)
    }

    /// Build a field-keyed report
    ///
    /// Each value is normalized to a list of entries. Repeated keys are
    /// concatenated. A field-keyed value is rejected: reports nest one level
    /// only.
    pub fn dict<K, T, I>(pairs: I) -> ValidationResult<Self>
    where
        K: Into<String>,
        T: Into<ErrorReport>,
        I: IntoIterator<Item = (K, T)>,
    {
        let mut fields = Vec::new();
        for (field, messages) in pairs {
            let field = field.into();
            match messages.into() {
                ErrorReport::List(entries) => push_field(&mut fields, field, entries),
                ErrorReport::Dict(_) => {
                    return Err(ValidationError::Configuration(format!(
                        "errors for `{}` must be a message or a list, not a field mapping",
                        field
                    )))
                }
            }
        }
        Ok(Self::Dict(fields))
    }

    /// Whether the report is keyed by field
    pub fn is_dict(&self) -> bool {
        matches!(self, Self::Dict(_))
    }

    /// Whether the report is a flat list
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Number of entries across all fields
    pub fn len(&self) -> usize {
        match self {
            Self::List(entries) => entries.len(),
            Self::Dict(fields) => fields.iter().map(|(_, entries)| entries.len()).sum(),
        }
    }

    /// Whether the report holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries, field order first and then entry order
    pub fn entries(&self) -> Vec<&ErrorEntry> {
        match self {
            Self::List(entries) => entries.iter().collect(),
            Self::Dict(fields) => fields.iter().flat_map(|(_, entries)| entries).collect(),
        }
    }

    /// Consume the report into its entries, dropping field attribution
    pub fn into_entries(self) -> Vec<ErrorEntry> {
        match self {
            Self::List(entries) => entries,
            Self::Dict(fields) => fields.into_iter().flat_map(|(_, entries)| entries).collect(),
        }
    }

    /// Flat list of rendered messages
    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(ErrorEntry::render).collect()
    }

    /// Alias of [`ErrorReport::messages`]
    pub fn to_list(&self) -> Vec<String> {
        self.messages()
    }

    /// Rendered messages per field
    ///
    /// A list-shaped report is exposed under [`NON_FIELD_ERRORS`].
    pub fn to_dict(&self) -> Vec<(String, Vec<String>)> {
        match self {
            Self::List(entries) => vec![(NON_FIELD_ERRORS.to_string(), render_all(entries))],
            Self::Dict(fields) => fields
                .iter()
                .map(|(field, entries)| (field.clone(), render_all(entries)))
                .collect(),
        }
    }

    /// Iterate fields with their messages, or plain messages for list shape
    pub fn iter(&self) -> impl Iterator<Item = ReportItem> + '_ {
        let items: Vec<ReportItem> = match self {
            Self::List(entries) => entries.iter().map(|e| ReportItem::Message(e.render())).collect(),
            Self::Dict(fields) => fields
                .iter()
                .map(|(field, entries)| ReportItem::Field {
                    field: field.clone(),
                    messages: render_all(entries),
                })
                .collect(),
        };
        items.into_iter()
    }

    /// Whether a field has errors (always false for list shape)
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Entries recorded for a field
    pub fn get(&self, field: &str) -> Option<&[ErrorEntry]> {
        match self {
            Self::List(_) => None,
            Self::Dict(fields) => fields
                .iter()
                .find(|(name, _)| name == field)
                .map(|(_, entries)| entries.as_slice()),
        }
    }

    /// Merge this report into a mapping owned by the caller
    ///
    /// Fields extend their lists; a list-shaped report lands in
    /// [`NON_FIELD_ERRORS`].
    pub fn update<'m>(
        &self,
        target: &'m mut HashMap<String, Vec<ErrorEntry>>,
    ) -> &'m mut HashMap<String, Vec<ErrorEntry>> {
        match self {
            Self::List(entries) => target
                .entry(NON_FIELD_ERRORS.to_string())
                .or_default()
                .extend(entries.iter().cloned()),
            Self::Dict(fields) => {
                for (field, entries) in fields {
                    target.entry(field.clone()).or_default().extend(entries.iter().cloned());
                }
            }
        }
        target
    }

    /// Merge another report into this one
    ///
    /// Same shapes concatenate (per field for dicts). A list merged into a
    /// dict goes to [`NON_FIELD_ERRORS`]; a dict merged into a list is
    /// spread.
    pub fn merge(&mut self, other: ErrorReport) {
        match (self, other) {
            (Self::Dict(fields), Self::Dict(others)) => {
                for (field, entries) in others {
                    push_field(fields, field, entries);
                }
            }
            (Self::Dict(fields), Self::List(entries)) => {
                push_field(fields, NON_FIELD_ERRORS.to_string(), entries)
            }
            (Self::List(entries), other) => entries.extend(other.into_entries()),
        }
    }

    /// Render every message into `template` via `{message}`, one per line
    ///
    /// # Example
    /// ```
    /// use ouroboros_rules::ErrorReport;
    ///
    /// let report = ErrorReport::list(["first", "second"]);
    /// assert_eq!(report.format("<li>{message}</li>"), "<li>first</li>\n<li>second</li>");
    /// ```
    pub fn format(&self, template: &str) -> String {
        self.messages()
            .into_iter()
            .map(|message| {
                let placeholders: Placeholders =
                    std::iter::once(("message".to_string(), message.into())).collect();
                text::render_template(template, &placeholders)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<&str> for ErrorReport {
    fn from(message: &str) -> Self {
        Self::message(message)
    }
}

impl From<String> for ErrorReport {
    fn from(message: String) -> Self {
        Self::message(message)
    }
}

impl From<ErrorEntry> for ErrorReport {
    fn from(entry: ErrorEntry) -> Self {
        Self::entry(entry)
    }
}

impl<T: Into<ErrorReport>> From<Vec<T>> for ErrorReport {
    fn from(items: Vec<T>) -> Self {
        Self::list(items)
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(entries) => write!(f, "{:?}", render_all(entries)),
            Self::Dict(fields) => {
                write!(f, "{{")?;
                for (i, (field, entries)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {:?}", field, render_all(entries))?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ErrorReport {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Self::List(entries) => {
                let mut seq = serializer.serialize_seq(Some(entries.len()))?;
                for entry in entries {
                    seq.serialize_element(&entry.render())?;
                }
                seq.end()
            }
            Self::Dict(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (field, entries) in fields {
                    map.serialize_entry(field, &render_all(entries))?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn sample() -> ErrorReport {
        ErrorReport::dict([
            ("a", ErrorReport::from("x")),
            ("b", ErrorReport::from(vec!["y", "z"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_message() {
        let report = ErrorReport::from("Error validating data");
        assert!(report.is_list());
        assert_eq!(report.messages(), vec!["Error validating data"]);
    }

    #[test]
    fn test_dict_normalization() {
        let report = sample();
        assert!(report.is_dict());
        assert_eq!(
            report.to_dict(),
            vec![
                ("a".to_string(), vec!["x".to_string()]),
                ("b".to_string(), vec!["y".to_string(), "z".to_string()]),
            ]
        );
        assert_eq!(report.messages(), vec!["x", "y", "z"]);
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn test_rewrap_is_idempotent() {
        let report = sample();
        assert_eq!(ErrorReport::from(report.clone()).to_dict(), report.to_dict());
    }

    #[test]
    fn test_nested_dict_is_rejected() {
        let result = ErrorReport::dict([("outer", sample())]);
        assert!(matches!(result, Err(ValidationError::Configuration(_))));
    }

    #[test]
    fn test_list_spreads_dict_items() {
        let report = ErrorReport::list([sample(), ErrorReport::from("w")]);
        assert!(report.is_list());
        assert_eq!(report.messages(), vec!["x", "y", "z", "w"]);
        assert!(!report.has("a"));
    }

    #[test]
    fn test_list_report_in_dict_bucket() {
        let report = ErrorReport::from(vec!["general"]);
        assert_eq!(
            report.to_dict(),
            vec![(NON_FIELD_ERRORS.to_string(), vec!["general".to_string()])]
        );
    }

    #[test]
    fn test_merge_dicts_concatenates() {
        let mut left = ErrorReport::dict([("a", vec!["a1", "a2"]), ("b", vec!["b1"])]).unwrap();
        let right = ErrorReport::dict([("c", vec!["c1"]), ("a", vec!["a3"])]).unwrap();
        left.merge(right);
        assert_eq!(
            left.to_dict(),
            vec![
                ("a".to_string(), vec!["a1".to_string(), "a2".to_string(), "a3".to_string()]),
                ("b".to_string(), vec!["b1".to_string()]),
                ("c".to_string(), vec!["c1".to_string()]),
            ]
        );
    }

    #[test]
    fn test_merge_lists_and_mixed_shapes() {
        let mut list = ErrorReport::from(vec!["one"]);
        list.merge(ErrorReport::from("two"));
        list.merge(sample());
        assert_eq!(list.messages(), vec!["one", "two", "x", "y", "z"]);

        let mut dict = sample();
        dict.merge(ErrorReport::from("general"));
        assert_eq!(dict.get(NON_FIELD_ERRORS).map(|e| e.len()), Some(1));
    }

    #[test]
    fn test_update_target_mapping() {
        let mut target: HashMap<String, Vec<ErrorEntry>> = HashMap::new();
        target.insert("a".into(), vec![ErrorEntry::new("existing")]);
        sample().update(&mut target);
        ErrorReport::from("loose").update(&mut target);

        assert_eq!(target["a"].len(), 2);
        assert_eq!(target["b"].len(), 2);
        assert_eq!(target[NON_FIELD_ERRORS][0].message, "loose");
    }

    #[test]
    fn test_iteration_shapes() {
        let items: Vec<ReportItem> = sample().iter().collect();
        assert_eq!(
            items[0],
            ReportItem::Field { field: "a".into(), messages: vec!["x".into()] }
        );

        let items: Vec<ReportItem> = ErrorReport::from(vec!["m"]).iter().collect();
        assert_eq!(items, vec![ReportItem::Message("m".into())]);
    }

    #[test]
    fn test_entry_rendering() {
        let entry = ErrorEntry::new("The `{__name__}` must be at most {limit}.")
            .with_code("max")
            .with_placeholders(
                [("__name__".to_string(), Value::from("Age")), ("limit".to_string(), Value::Int(3))]
                    .into_iter()
                    .collect(),
            );
        assert_eq!(entry.render(), "The `Age` must be at most 3.");
        assert_eq!(entry.code.as_deref(), Some("max"));
    }

    #[test]
    fn test_error_accessors() {
        let error = ValidationError::from(sample());
        assert!(error.is_invalid());
        assert_eq!(error.report().map(ErrorReport::len), Some(3));
        assert!(ValidationError::Coercion("x".into()).into_report().is_none());
        assert!(error.to_string().starts_with("Validation failed"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json, serde_json::json!({"a": ["x"], "b": ["y", "z"]}));
        let json = serde_json::to_value(ErrorReport::from("m")).unwrap();
        assert_eq!(json, serde_json::json!(["m"]));
    }
}
