//! End-to-end validation tests

use ouroboros_rules::rules::*;
use ouroboros_rules::{
    validate, Attributes, DataSet, ErrorReport, Field, FieldOutcome, ValidationError,
    ValidationResult, Validator, ValidatorConfig, Value,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn report_of(result: ValidationResult<()>) -> ErrorReport {
    match result {
        Err(ValidationError::Invalid(report)) => report,
        other => panic!("expected a validation failure, got {:?}", other),
    }
}

fn dict(report: &ErrorReport) -> Vec<(String, Vec<String>)> {
    report.to_dict()
}

// ============================================================================
// Short-circuit and ignore-empty
// ============================================================================

#[test]
fn test_first_failing_rule_stops_the_field() {
    init_tracing();
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    let fields = vec![Field::new("name")
        .rule(Required::new())
        .rule(Passes::new(|_, _| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            true
        }))];

    let mut record = Value::object([("name", "")]);
    let report = report_of(validate(fields, &mut record));

    assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    assert_eq!(report.get("name").map(<[_]>::len), Some(1));
    assert_eq!(report.get("name").unwrap()[0].code.as_deref(), Some("required"));
}

#[test]
fn test_ignore_empty_passes_every_rule() {
    let data = DataSet::empty();
    let empty = Value::from("");
    let rules: Vec<Box<dyn Rule>> = vec![
        Box::new(Integer::new().ignore_empty(true)),
        Box::new(Max::new(100).ignore_empty(true)),
        Box::new(MinLen::new(3).ignore_empty(true)),
        Box::new(Email::new().ignore_empty(true)),
        Box::new(Url::new().ignore_empty(true)),
        Box::new(IPv4::new().ignore_empty(true)),
        Box::new(Regex::new("^x$").unwrap().ignore_empty(true)),
        Box::new(Same::new("other").ignore_empty(true)),
        Box::new(Equals::new(1).ignore_empty(true)),
        Box::new(Fails::new(|_, _| true).ignore_empty(true)),
    ];
    for rule in &rules {
        assert!(rule.check(&empty, &data).unwrap(), "{} did not ignore", rule.code());
        assert!(rule.check(&Value::Missing, &data).unwrap());
    }
}

// ============================================================================
// Placeholders
// ============================================================================

#[test]
fn test_failure_placeholders_are_complete() {
    let fields = vec![
        Field::new("age").rule(Max::new(100)),
        Field::new("nickname").rule(MinLen::new(3)),
    ];
    let mut record = Value::object([("age", Value::Int(150)), ("nickname", Value::from("ab"))]);
    let report = report_of(validate(fields, &mut record));

    let age = &report.get("age").unwrap()[0];
    assert_eq!(age.placeholders["__name__"], Value::from("Age"));
    assert_eq!(age.placeholders["__value__"], Value::Int(150));
    assert_eq!(age.placeholders["limit"], Value::Int(100));

    let nickname = &report.get("nickname").unwrap()[0];
    assert_eq!(nickname.placeholders["limit"], Value::Int(3));
    assert_eq!(nickname.render(), "The `Nickname` must be at least 3 character(s).");
}

#[test]
fn test_record_values_are_placeholders() {
    let fields = vec![Field::new("end")
        .rule(Min::new(0).with_message("End {end} must not precede start {start}."))];
    let mut record = Value::object([("start", 5), ("end", -1)]);
    let report = report_of(validate(fields, &mut record));
    assert_eq!(report.messages(), vec!["End -1 must not precede start 5."]);
}

// ============================================================================
// Error reports
// ============================================================================

#[test]
fn test_report_shape_normalization() {
    let report = ErrorReport::dict([
        ("a", ErrorReport::from("x")),
        ("b", ErrorReport::from(vec!["y", "z"])),
    ])
    .unwrap();

    let expected = vec![
        ("a".to_string(), vec!["x".to_string()]),
        ("b".to_string(), vec!["y".to_string(), "z".to_string()]),
    ];
    assert_eq!(dict(&report), expected);
    assert_eq!(dict(&ErrorReport::from(report.clone())), expected);
    assert_eq!(dict(&ErrorReport::list([report])), vec![(
        "__all__".to_string(),
        vec!["x".to_string(), "y".to_string(), "z".to_string()]
    )]);
}

#[test]
fn test_report_merge_concatenates() {
    let mut first = ErrorReport::dict([("a", vec!["1", "2"])]).unwrap();
    first.merge(ErrorReport::dict([("b", vec!["3"]), ("a", vec!["4"])]).unwrap());
    assert_eq!(
        first.get("a").unwrap().iter().map(|e| e.message.as_str()).collect::<Vec<_>>(),
        vec!["1", "2", "4"]
    );
    assert_eq!(first.messages(), vec!["1", "2", "4", "3"]);
}

#[test]
fn test_report_format() {
    let mut record = Value::object([("email", "nope"), ("age", "x")]);
    let fields = vec![
        Field::new("email").rule(Email::new()),
        Field::new("age").rule(Integer::new()),
    ];
    let report = report_of(validate(fields, &mut record));
    assert_eq!(
        report.format("* {message}"),
        "* The `Email` must be a valid email address.\n* The `Age` must be an integer."
    );
}

#[cfg(feature = "serde")]
#[test]
fn test_report_serializes_to_json() {
    let mut record = Value::from(serde_json::json!({"email": "", "age": 120}));
    let validator = Validator::new(vec![
        Field::new("email").rule(Required::new()),
        Field::new("age").rule(Max::new(99)),
    ]);
    let report = report_of(validator.validate(&mut record));
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        serde_json::json!({
            "email": ["The `Email` field is required."],
            "age": ["The `Age` must be less than or equal to 99."]
        })
    );
}

// ============================================================================
// Rule boundaries
// ============================================================================

#[test]
fn test_integer_boundary() {
    let data = DataSet::empty();
    let rule = Integer::new();
    assert!(!rule.check(&Value::Float(23.5), &data).unwrap());
    assert!(rule.check(&Value::from("20"), &data).unwrap());
    assert!(!rule.check(&Value::from("20.0"), &data).unwrap());
}

#[test]
fn test_required_versus_not_empty() {
    let data = DataSet::empty();
    let empty_list = Value::List(vec![]);
    assert!(Required::new().check(&empty_list, &data).unwrap());
    assert!(!NotEmpty::new().check(&empty_list, &data).unwrap());
}

#[test]
fn test_max_bounds() {
    let data = DataSet::empty();
    assert!(!Max::new(100).check(&Value::Int(101), &data).unwrap());
    assert!(Max::new(100).check(&Value::Int(100), &data).unwrap());
    assert!(Max::new(100).ignore_empty(true).check(&Value::from(""), &data).unwrap());
}

#[test]
fn test_url_schemes() {
    let data = DataSet::empty();
    assert!(Url::new().check(&Value::from("http://localhost:8080"), &data).unwrap());
    assert!(!Url::new()
        .schemes(["https"])
        .check(&Value::from("http://127.0.0.1"), &data)
        .unwrap());
}

// ============================================================================
// Driver scenarios
// ============================================================================

#[test]
fn test_required_email_short_circuits() {
    let fields = vec![Field::new("email").rule(Required::new()).rule(Email::new())];
    let mut record = Value::object([("email", "")]);
    let report = report_of(validate(fields, &mut record));
    assert_eq!(
        dict(&report),
        vec![("email".to_string(), vec!["The `Email` field is required.".to_string()])]
    );
}

#[test]
fn test_same_reports_other_field_name() {
    let fields = vec![Field::new("password").rule(Same::new("confirm_password"))];
    let mut record = Value::object([("password", "abc"), ("confirm_password", "xyz")]);
    let report = report_of(validate(fields, &mut record));

    let entry = &report.get("password").unwrap()[0];
    assert_eq!(entry.placeholders["other"], Value::from("Confirm Password"));
    assert_eq!(entry.render(), "The `Password` and `Confirm Password` fields must match.");
}

#[test]
fn test_valid_record_returns_ok() {
    let validator = Validator::new(vec![
        Field::new("email").rule(Required::new()).rule(Email::new()),
        Field::new("website").rule(Url::new().ignore_empty(true)),
        Field::new("age").rule(Integer::new()).rule(Min::new(18)),
        Field::new("slug").rule(Slug::new()),
    ]);
    let mut record = Value::object([
        ("email", Value::from("user@example.com")),
        ("website", Value::from("")),
        ("age", Value::Int(30)),
        ("slug", Value::from("hello-world")),
    ]);
    assert!(validator.validate(&mut record).is_ok());
}

#[test]
fn test_conditional_fields() {
    init_tracing();
    let validator = Validator::new(vec![
        Field::new("payment_method").rule(Required::new()),
        Field::new("card_number")
            .if_passes("payment_method")
            .rule(Required::new())
            .rule(Regex::new(r"^\d{16}$").unwrap()),
        Field::new("notice").if_fails("payment_method").rule(Required::new()),
    ]);

    let mut record = Value::object([("payment_method", "card"), ("card_number", "1234")]);
    let run = validator.run(&mut record).unwrap();
    assert_eq!(run.outcome("card_number"), Some(FieldOutcome::Failed));
    assert_eq!(run.outcome("notice"), Some(FieldOutcome::Skipped));
    assert_eq!(
        run.report().unwrap().messages(),
        vec!["The value `1234` in `Card Number` is invalid."]
    );

    let mut record = Value::object([("payment_method", "")]);
    let run = validator.run(&mut record).unwrap();
    assert_eq!(run.outcome("card_number"), Some(FieldOutcome::Skipped));
    assert_eq!(run.outcome("notice"), Some(FieldOutcome::Failed));
}

#[test]
fn test_clean_and_write_back() {
    let validator = Validator::new(vec![Field::new("username")
        .clean(|value, _| match value {
            Value::String(s) => Value::String(s.to_lowercase()),
            other => other,
        })
        .rule(Slug::new())])
    .with_config(ValidatorConfig::new().strip_whitespace(true).write_back(true));

    let mut record = Value::object([("username", "  John_Doe ")]);
    assert!(validator.validate(&mut record).is_ok());
    assert_eq!(record.get("username"), Some(&Value::from("john_doe")));
}

#[test]
fn test_write_back_skips_missing_values() {
    let validator = Validator::new(vec![Field::new("absent").rule(MaxLen::new(5).ignore_empty(true))])
        .with_config(ValidatorConfig::new().write_back(true));
    let mut record = Value::object([("present", 1)]);
    let _ = validator.validate(&mut record);
    assert_eq!(record.get("absent"), None);
}

#[test]
fn test_coercion_errors_propagate() {
    let fields = vec![
        Field::new("age").rule(Max::new(10)),
        Field::new("name").rule(Required::new()),
    ];
    let mut record = Value::object([("age", "ten"), ("name", "")]);
    assert!(matches!(validate(fields, &mut record), Err(ValidationError::Coercion(_))));
}

// ============================================================================
// Attribute-backed records
// ============================================================================

struct Signup {
    email: String,
    age: i64,
}

impl Attributes for Signup {
    fn get_attribute(&self, name: &str) -> Option<Value> {
        match name {
            "email" => Some(Value::from(&self.email)),
            "age" => Some(Value::Int(self.age)),
            _ => None,
        }
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> ValidationResult<()> {
        match (name, value) {
            ("email", Value::String(email)) => {
                self.email = email;
                Ok(())
            }
            (name, _) => Err(ValidationError::Configuration(format!("cannot set `{}`", name))),
        }
    }

    fn attribute_values(&self) -> Vec<(String, Value)> {
        vec![
            ("email".to_string(), Value::from(&self.email)),
            ("age".to_string(), Value::Int(self.age)),
        ]
    }
}

#[test]
fn test_attribute_records() {
    let validator = Validator::new(vec![
        Field::new("email").rule(Email::new()),
        Field::new("age").rule(Min::new(18).with_message("{email} is only {age}.")),
        Field::new("missing").rule(Required::new()),
    ]);
    let mut signup = Signup { email: "kid@example.com".into(), age: 12 };
    let report = report_of(validator.validate(DataSet::attributes(&mut signup)));

    assert_eq!(
        dict(&report),
        vec![
            ("age".to_string(), vec!["kid@example.com is only 12.".to_string()]),
            ("missing".to_string(), vec!["The `Missing` field is required.".to_string()]),
        ]
    );
}

#[test]
fn test_attribute_write_back() {
    let validator = Validator::new(vec![Field::new("email")
        .clean(|value, _| Value::from(value.to_string().to_lowercase()))
        .rule(Email::new())])
    .with_config(ValidatorConfig::new().write_back(true));

    let mut signup = Signup { email: "USER@Example.com".into(), age: 30 };
    assert!(validator.validate(DataSet::attributes(&mut signup)).is_ok());
    assert_eq!(signup.email, "user@example.com");
}

// ============================================================================
// Sharing
// ============================================================================

#[test]
fn test_shared_rule_across_threads() {
    let email: Arc<dyn Rule> = Arc::new(Email::new());
    let handles: Vec<_> = ["a@example.com", "nope", "b@example.org"]
        .into_iter()
        .map(|address| {
            let rule = Arc::clone(&email);
            std::thread::spawn(move || {
                let fields = vec![Field::new("email").shared_rule(rule)];
                let mut record = Value::object([("email", address)]);
                validate(fields, &mut record).is_ok()
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![true, false, true]);
}

#[test]
fn test_shared_rule_gets_each_field_name() {
    let required: Arc<dyn Rule> = Arc::new(Required::new());
    let fields = vec![
        Field::new("first_name").shared_rule(Arc::clone(&required)),
        Field::new("last_name").shared_rule(required),
    ];
    let mut record = Value::object([("first_name", ""), ("last_name", "")]);
    let report = report_of(validate(fields, &mut record));
    assert_eq!(
        report.messages(),
        vec!["The `First Name` field is required.", "The `Last Name` field is required."]
    );
}
