//! Ouroboros Rules
//!
//! Declarative field validation for the Ouroboros framework.
//!
//! A caller declares [`Field`]s, each an attribute name with an ordered list
//! of [`rules`], and runs them against a record that is either a mapping or
//! an attribute-bearing object. Failures come back as one [`ErrorReport`]
//! keyed by field, with message templates rendered on demand.
//!
//! # Architecture
//!
//! ```text
//! Field[] ──► Validator ──► DataSet (mapping | attributes)
//!                 │
//!                 └─► Rule::validate ──► ErrorEntry ──► ErrorReport
//! ```
//!
//! # Features
//!
//! - **serde** (default): `Value` ⇄ `serde_json::Value` and `Serialize` for
//!   `ErrorReport`
//!
//! # Example
//!
//! ```rust
//! use ouroboros_rules::rules::{Max, Required, Same};
//! use ouroboros_rules::{Field, Validator, Value};
//!
//! let validator = Validator::new(vec![
//!     Field::new("age").rule(Required::new()).rule(Max::new(100)),
//!     Field::new("password").rule(Same::new("confirm_password")),
//! ]);
//!
//! let mut record = Value::object([
//!     ("age", Value::Int(101)),
//!     ("password", Value::from("abc")),
//!     ("confirm_password", Value::from("xyz")),
//! ]);
//!
//! let error = validator.validate(&mut record).unwrap_err();
//! let report = error.report().unwrap();
//! assert_eq!(
//!     report.messages(),
//!     vec![
//!         "The `Age` must be less than or equal to 100.",
//!         "The `Password` and `Confirm Password` fields must match.",
//!     ]
//! );
//! ```

// Public modules
pub mod config;
pub mod data;
pub mod errors;
pub mod fields;
pub mod formats;
pub mod rules;
pub mod text;
pub mod types;
pub mod validators;

// Re-export commonly used types
pub use config::ValidatorConfig;
pub use data::{Attributes, DataSet};
pub use errors::{
    ErrorEntry, ErrorReport, ReportItem, ValidationError, ValidationResult, NON_FIELD_ERRORS,
};
pub use fields::{Condition, Field, RuleRef, Trigger};
pub use rules::{Rule, RuleOptions};
pub use types::{Placeholders, Value};
pub use validators::{validate, validate_field, FieldOutcome, RunState, ValidationRun, Validator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
