//! Basic Validation Example
//!
//! This example demonstrates declaring fields and rules with ouroboros-rules.
//!
//! Run with:
//! ```bash
//! cargo run -p ouroboros-rules --example basic_validation
//! ```

use ouroboros_rules::rules::{Email, Integer, Max, Min, MinLen, Regex, Required, Rule, Same, Url};
use ouroboros_rules::{DataSet, Field, ValidationResult, Validator, ValidatorConfig, Value};

fn main() {
    println!("Basic Validation Example");
    println!("========================\n");

    check_single_rules();
    validate_signup_form();
    validate_conditional_fields();
    clean_and_write_back();
}

fn result_str(result: &ValidationResult<bool>) -> &'static str {
    match result {
        Ok(true) => "✓ Valid",
        Ok(false) => "✗ Invalid",
        Err(_) => "✗ Error",
    }
}

fn check_single_rules() {
    println!("1. Single Rules");
    println!("---------------");

    let data = DataSet::empty();

    let integer = Integer::new();
    for raw in [Value::from("20"), Value::from("20.0"), Value::Int(7)] {
        println!("  Integer {}: {}", raw, result_str(&integer.check(&raw, &data)));
    }

    let max = Max::new(100);
    for age in [99, 100, 101] {
        println!("  Max(100) {}: {}", age, result_str(&max.check(&Value::Int(age), &data)));
    }

    let url = Url::new().schemes(["https"]);
    for address in ["https://example.com", "http://127.0.0.1"] {
        let value = Value::from(address);
        println!("  https-only '{}': {}", address, result_str(&url.check(&value, &data)));
    }
    println!();
}

fn validate_signup_form() {
    println!("2. Signup Form");
    println!("--------------");

    let validator = Validator::new(vec![
        Field::new("email").rule(Required::new()).rule(Email::new()),
        Field::new("username")
            .rule(Required::new())
            .rule(MinLen::new(3))
            .rule(Regex::new(r"^[a-z0-9_]+$").expect("valid pattern")),
        Field::new("age").rule(Integer::new()).rule(Min::new(18)).rule(Max::new(130)),
        Field::new("website").rule(Url::new().ignore_empty(true)),
        Field::new("password").rule(MinLen::new(8)).rule(Same::new("confirm_password")),
    ]);

    let mut valid = Value::object([
        ("email", Value::from("jane@example.com")),
        ("username", Value::from("jane_doe")),
        ("age", Value::Int(34)),
        ("website", Value::from("")),
        ("password", Value::from("correct horse")),
        ("confirm_password", Value::from("correct horse")),
    ]);
    println!("  Valid form: {:?}", validator.validate(&mut valid).is_ok());

    let mut invalid = Value::object([
        ("email", Value::from("")),
        ("username", Value::from("Jo")),
        ("age", Value::Int(12)),
        ("website", Value::from("not a url")),
        ("password", Value::from("correct horse")),
        ("confirm_password", Value::from("battery staple")),
    ]);
    if let Err(error) = validator.validate(&mut invalid) {
        if let Some(report) = error.report() {
            for (field, messages) in report.to_dict() {
                for message in messages {
                    println!("  {}: {}", field, message);
                }
            }
        }
    }
    println!();
}

fn validate_conditional_fields() {
    println!("3. Conditional Fields");
    println!("---------------------");

    let validator = Validator::new(vec![
        Field::new("country").rule(Required::new()),
        Field::new("postcode")
            .if_passes("country")
            .rule(Required::new())
            .rule(Regex::new(r"^\d{5}$").expect("valid pattern")),
    ]);

    for country in ["DE", ""] {
        let mut record = Value::object([("country", country), ("postcode", "12")]);
        match validator.run(&mut record) {
            Ok(run) => {
                for (field, outcome) in run.outcomes() {
                    println!("  country={:?} {}: {:?}", country, field, outcome);
                }
            }
            Err(error) => println!("  country={:?}: {}", country, error),
        }
    }
    println!();
}

fn clean_and_write_back() {
    println!("4. Cleaning and Write-back");
    println!("--------------------------");

    let validator = Validator::new(vec![Field::new("email")
        .clean(|value, _| Value::from(value.to_string().to_lowercase()))
        .rule(Email::new())])
    .with_config(ValidatorConfig::new().strip_whitespace(true).write_back(true));

    let mut record = Value::object([("email", "  Jane@Example.COM ")]);
    let result = validator.validate(&mut record);
    println!("  Valid: {:?}", result.is_ok());
    if let Some(email) = record.get("email") {
        println!("  Stored email: {}", email);
    }
    println!();
}
