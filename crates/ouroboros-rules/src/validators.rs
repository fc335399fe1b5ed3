//! Validation driver
//!
//! Runs a list of [`Field`] declarations against one record. Unconditional
//! fields run first, in declaration order; fields declared with `if_passes`
//! or `if_fails` run in a second pass, after the fields they are triggered
//! by, with wildcard-triggered fields last. Failures are collected into one field-keyed [`ErrorReport`].

use crate::config::ValidatorConfig;
use crate::data::DataSet;
use crate::errors::{ErrorReport, ValidationError, ValidationResult};
use crate::fields::{Condition, Field, Trigger};
use tracing::{debug, trace};

// ============================================================================
// Public API
// ============================================================================

/// Validate a record against field declarations
///
/// Returns `Ok(())` when every evaluated field passes, or
/// [`ValidationError::Invalid`] with a report keyed by attribute.
///
/// # Example
///
/// ```
/// use ouroboros_rules::rules::{Email, Required};
/// use ouroboros_rules::{validate, Field, Value};
///
/// let fields = vec![Field::new("email").rule(Required::new()).rule(Email::new())];
///
/// let mut record = Value::object([("email", "")]);
/// let error = validate(fields, &mut record).unwrap_err();
///
/// let report = error.report().unwrap();
/// assert_eq!(report.messages(), vec!["The `Email` field is required."]);
/// ```
pub fn validate<'a>(fields: Vec<Field>, data: impl Into<DataSet<'a>>) -> ValidationResult<()> {
    Validator::new(fields).validate(data)
}

/// Validate a single field, ignoring its condition
pub fn validate_field<'a>(field: &Field, data: impl Into<DataSet<'a>>) -> ValidationResult<()> {
    let validator = Validator::default();
    let mut data = data.into();
    match validator.evaluate(field, &mut data)? {
        None => Ok(()),
        Some(report) => {
            let entries = report.into_entries();
            Err(ErrorReport::Dict(vec![(field.attribute().to_string(), entries)]).into())
        }
    }
}

// ============================================================================
// Run State
// ============================================================================

/// Lifecycle of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Not started
    #[default]
    Pending,
    /// Iterating fields
    Running,
    /// All applicable fields evaluated
    Done,
}

/// What happened to a field during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    Passed,
    Failed,
    /// Conditional field whose trigger did not match
    Skipped,
}

/// Outcome of one validation run
#[derive(Debug, Clone, Default)]
pub struct ValidationRun {
    state: RunState,
    outcomes: Vec<(String, FieldOutcome)>,
    report: Option<ErrorReport>,
}

impl ValidationRun {
    /// A run that has not started
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Outcome recorded for an attribute, `None` if it was never reached
    pub fn outcome(&self, attribute: &str) -> Option<FieldOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, outcome)| *outcome)
    }

    /// Outcomes in evaluation order
    pub fn outcomes(&self) -> &[(String, FieldOutcome)] {
        &self.outcomes
    }

    /// The failure report, if any field failed
    pub fn report(&self) -> Option<&ErrorReport> {
        self.report.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.report.is_none()
    }

    /// `Ok(())` on success, the report as an error otherwise
    pub fn into_result(self) -> ValidationResult<()> {
        match self.report {
            None => Ok(()),
            Some(report) => Err(ValidationError::Invalid(report)),
        }
    }

    /// Record an outcome; a repeated attribute keeps any earlier failure
    fn record(&mut self, attribute: &str, outcome: FieldOutcome) {
        match self.outcomes.iter_mut().find(|(name, _)| name == attribute) {
            Some((_, existing)) if *existing == FieldOutcome::Failed => {}
            Some((_, existing)) => *existing = outcome,
            None => self.outcomes.push((attribute.to_string(), outcome)),
        }
    }

    fn add_failure(&mut self, attribute: &str, report: ErrorReport) {
        let failure = ErrorReport::Dict(vec![(attribute.to_string(), report.into_entries())]);
        self.report
            .get_or_insert_with(|| ErrorReport::Dict(Vec::new()))
            .merge(failure);
    }

    fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == FieldOutcome::Failed)
            .count()
    }

    /// Whether a conditional field should run given the outcomes so far
    fn matches(&self, attribute: &str, condition: &Condition) -> bool {
        let others = || {
            self.outcomes
                .iter()
                .filter(|(other, outcome)| other != attribute && *outcome != FieldOutcome::Skipped)
                .map(|(_, outcome)| *outcome)
        };

        match condition {
            Condition::Always => true,
            Condition::IfPasses(Trigger::All) => others().all(|o| o == FieldOutcome::Passed),
            Condition::IfFails(Trigger::All) => others().any(|o| o == FieldOutcome::Failed),
            Condition::IfPasses(Trigger::Fields(names)) => names
                .iter()
                .all(|name| self.outcome(name) == Some(FieldOutcome::Passed)),
            Condition::IfFails(Trigger::Fields(names)) => names
                .iter()
                .any(|name| self.outcome(name) == Some(FieldOutcome::Failed)),
        }
    }
}

// ============================================================================
// Validator
// ============================================================================

/// Field declarations plus the configuration to run them with
#[derive(Debug, Clone, Default)]
pub struct Validator {
    fields: Vec<Field>,
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            config: ValidatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a field declaration
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a record, returning only success or the failure report
    pub fn validate<'a>(&self, data: impl Into<DataSet<'a>>) -> ValidationResult<()> {
        self.run(data)?.into_result()
    }

    /// Validate a record and keep the per-field outcomes
    ///
    /// `Err` is only returned for configuration and coercion errors; rule
    /// failures are part of the returned run.
    pub fn run<'a>(&self, data: impl Into<DataSet<'a>>) -> ValidationResult<ValidationRun> {
        self.check_conditions()?;
        let conditional = self.conditional_order()?;

        let mut data = data.into();
        let mut run = ValidationRun::new();
        run.state = RunState::Running;
        debug!(fields = self.fields.len(), "Starting validation run");

        let mut stopped = false;
        for field in self.fields.iter().filter(|field| !field.is_conditional()) {
            if self.step(field, &mut data, &mut run)? {
                stopped = true;
                break;
            }
        }

        if !stopped {
            for field in conditional {
                let enabled = self.config.conditional_fields;
                if !enabled || !run.matches(field.attribute(), field.condition()) {
                    debug!(field = field.attribute(), "Skipping conditional field");
                    run.record(field.attribute(), FieldOutcome::Skipped);
                    continue;
                }
                if self.step(field, &mut data, &mut run)? {
                    break;
                }
            }
        }

        run.state = RunState::Done;
        debug!(
            fields = run.outcomes.len(),
            failures = run.failure_count(),
            "Validation run finished"
        );
        Ok(run)
    }

    /// Evaluate one field and record it; returns true when the run must stop
    fn step(
        &self,
        field: &Field,
        data: &mut DataSet<'_>,
        run: &mut ValidationRun,
    ) -> ValidationResult<bool> {
        match self.evaluate(field, data)? {
            None => {
                trace!(field = field.attribute(), "Field passed");
                run.record(field.attribute(), FieldOutcome::Passed);
                Ok(false)
            }
            Some(report) => {
                debug!(field = field.attribute(), errors = report.len(), "Field failed");
                run.record(field.attribute(), FieldOutcome::Failed);
                run.add_failure(field.attribute(), report);
                Ok(self.config.fail_fast)
            }
        }
    }

    /// Fetch, clean and check one field's value
    ///
    /// `Ok(Some(report))` is a rule failure; `Err` is reserved for errors
    /// that abort the run.
    fn evaluate(
        &self,
        field: &Field,
        data: &mut DataSet<'_>,
    ) -> ValidationResult<Option<ErrorReport>> {
        let raw = self.config.process_value(data.get(field.attribute()));
        let value = field.clean_value(raw, data);
        trace!(field = field.attribute(), value = %value, "Checking field");

        if self.config.write_back && !value.is_missing() {
            data.set(field.attribute(), value.clone())?;
        }

        match field.apply_rules(&value, data) {
            Ok(()) => Ok(None),
            Err(ValidationError::Invalid(report)) => Ok(Some(report)),
            Err(e) => Err(e),
        }
    }

    /// Conditional fields in evaluation order
    ///
    /// A field triggered by other conditional fields runs after them;
    /// otherwise declaration order is kept. Wildcard-triggered fields run
    /// last. Conditional fields triggering each other in a cycle are a
    /// configuration error.
    fn conditional_order(&self) -> ValidationResult<Vec<&Field>> {
        let (wildcard, mut pending): (Vec<&Field>, Vec<&Field>) = self
            .fields
            .iter()
            .filter(|field| field.is_conditional())
            .partition(|field| matches!(field.condition().trigger(), Some(Trigger::All)));

        let mut ordered = Vec::with_capacity(pending.len() + wildcard.len());
        while !pending.is_empty() {
            let ready = pending.iter().position(|field| match field.condition().trigger() {
                Some(Trigger::Fields(names)) => names
                    .iter()
                    .all(|name| !pending.iter().any(|other| other.attribute() == name)),
                _ => true,
            });
            match ready {
                Some(index) => ordered.push(pending.remove(index)),
                None => {
                    let cycle: Vec<&str> = pending.iter().map(|field| field.attribute()).collect();
                    return Err(ValidationError::Configuration(format!(
                        "conditional fields trigger each other in a cycle: {}",
                        cycle.join(", ")
                    )));
                }
            }
        }

        ordered.extend(wildcard);
        Ok(ordered)
    }

    /// Reject triggers that name unknown fields or the field itself
    fn check_conditions(&self) -> ValidationResult<()> {
        for field in &self.fields {
            let Some(Trigger::Fields(names)) = field.condition().trigger() else {
                continue;
            };
            for name in names {
                if name == field.attribute() {
                    return Err(ValidationError::Configuration(format!(
                        "field `{}` cannot depend on itself",
                        name
                    )));
                }
                if !self.fields.iter().any(|other| other.attribute() == name) {
                    return Err(ValidationError::Configuration(format!(
                        "field `{}` depends on unknown field `{}`",
                        field.attribute(),
                        name
                    )));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
