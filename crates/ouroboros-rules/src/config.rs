//! Configuration options for a validation run

use crate::types::Value;

// ============================================================================
// Validator Config
// ============================================================================

/// Configuration options for the validator driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Stop after the first field that fails
    pub fail_fast: bool,

    /// Strip surrounding whitespace from string values before cleaning
    pub str_strip_whitespace: bool,

    /// Store cleaned values back into the record
    pub write_back: bool,

    /// Evaluate fields declared with `if_passes` / `if_fails`
    pub conditional_fields: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            str_strip_whitespace: false,
            write_back: false,
            conditional_fields: true,
        }
    }
}

impl ValidatorConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop at the first failing field
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Enable string whitespace stripping
    pub fn strip_whitespace(mut self, strip: bool) -> Self {
        self.str_strip_whitespace = strip;
        self
    }

    /// Write cleaned values back into the record
    pub fn write_back(mut self, write_back: bool) -> Self {
        self.write_back = write_back;
        self
    }

    /// Enable or disable conditional fields
    pub fn conditional_fields(mut self, enabled: bool) -> Self {
        self.conditional_fields = enabled;
        self
    }

    /// Process a raw value according to config
    pub fn process_value(&self, value: Value) -> Value {
        match value {
            Value::String(s) if self.str_strip_whitespace => Value::String(s.trim().to_string()),
            other => other,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
