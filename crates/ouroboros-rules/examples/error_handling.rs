//! Error Handling Example
//!
//! This example demonstrates working with error reports in ouroboros-rules.
//!
//! Run with:
//! ```bash
//! cargo run -p ouroboros-rules --example error_handling
//! ```

use ouroboros_rules::rules::{Max, Required, Rule};
use ouroboros_rules::{ErrorEntry, ErrorReport, Field, ReportItem, ValidationError, Validator, Value};

fn main() {
    println!("Error Handling Example");
    println!("======================\n");

    demonstrate_error_kinds();
    demonstrate_report_shapes();
    demonstrate_report_merging();
    demonstrate_custom_messages();

    println!("Summary:");
    println!("  - ValidationError::Invalid carries an ErrorReport");
    println!("  - Reports are either a flat list or keyed by field");
    println!("  - Messages are templates rendered with their placeholders");
}

fn describe(error: &ValidationError) {
    match error {
        ValidationError::Invalid(report) => {
            println!("  Invalid ({} error(s)):", report.len());
            for item in report.iter() {
                match item {
                    ReportItem::Field { field, messages } => {
                        println!("    {}: {}", field, messages.join(" "))
                    }
                    ReportItem::Message(message) => println!("    {}", message),
                }
            }
        }
        other => println!("  {}", other),
    }
}

fn demonstrate_error_kinds() {
    println!("1. Error Kinds");
    println!("--------------");

    // Rule failure
    let validator = Validator::new(vec![Field::new("age").rule(Max::new(100))]);
    let mut record = Value::object([("age", 150)]);
    if let Err(error) = validator.validate(&mut record) {
        describe(&error);
    }

    // Values that cannot be compared
    let mut record = Value::object([("age", "old")]);
    if let Err(error) = validator.validate(&mut record) {
        describe(&error);
    }

    // A trigger naming an unknown field
    let validator = Validator::new(vec![Field::new("age").if_passes("birthday").rule(Max::new(100))]);
    let mut record = Value::object([("age", 1)]);
    if let Err(error) = validator.validate(&mut record) {
        describe(&error);
    }
    println!();
}

fn demonstrate_report_shapes() {
    println!("2. Report Shapes");
    println!("----------------");

    let list = ErrorReport::list(["first problem", "second problem"]);
    println!("  List: {}", list);

    match ErrorReport::dict([("name", vec!["too short"]), ("email", vec!["missing"])]) {
        Ok(dict) => {
            println!("  Dict: {}", dict);
            println!("  As HTML:\n{}", dict.format("    <li>{message}</li>"));
        }
        Err(error) => println!("  {}", error),
    }

    if let Ok(inner) = ErrorReport::dict([("b", "x")]) {
        let nested = ErrorReport::dict([("a", inner)]);
        println!("  Nested dict rejected: {}", nested.is_err());
    }
    println!();
}

fn demonstrate_report_merging() {
    println!("3. Merging Reports");
    println!("------------------");

    let mut report = ErrorReport::from(ErrorEntry::new("shared failure"));
    report.merge(ErrorReport::message("another failure"));
    println!("  Merged list: {:?}", report.to_list());

    if let Ok(mut dict) = ErrorReport::dict([("email", "missing")]) {
        if let Ok(more) = ErrorReport::dict([("email", "invalid"), ("age", "too young")]) {
            dict.merge(more);
        }
        dict.merge(ErrorReport::message("form rejected"));
        for (field, messages) in dict.to_dict() {
            println!("  {}: {:?}", field, messages);
        }
    }
    println!();
}

fn demonstrate_custom_messages() {
    println!("4. Custom Messages");
    println!("------------------");

    let validator = Validator::new(vec![
        Field::new("title")
            .with_error_message("Please give the `{__name__}` a value.")
            .rule(Required::new()),
        Field::new("budget")
            .with_display_name("Project budget")
            .rule(Max::new(1000).with_message("{__name__} of {__value__} exceeds {limit}.")),
    ]);

    let mut record = Value::object([("title", Value::from("")), ("budget", Value::Int(5000))]);
    if let Err(error) = validator.validate(&mut record) {
        if let Some(report) = error.report() {
            for entry in report.entries() {
                println!("  [{}] {}", entry.code.as_deref().unwrap_or("-"), entry.render());
            }
        }
    }
    println!();
}
