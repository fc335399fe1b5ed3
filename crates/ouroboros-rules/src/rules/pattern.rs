//! Pattern-based rules
//!
//! A generic [`Regex`] rule, the fixed-pattern rules built on the
//! pre-compiled patterns in [`crate::formats`], and the URL, email and IP
//! address checks.

use super::{text_of, Rule, RuleOptions};
use crate::data::DataSet;
use crate::errors::{ValidationError, ValidationResult};
use crate::formats;
use crate::types::Value;
use regex::RegexBuilder;

// ============================================================================
// Regex
// ============================================================================

/// Compile flags for [`Regex::with_flags`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegexFlags {
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub ignore_whitespace: bool,
}

impl RegexFlags {
    /// No flags set
    pub fn new() -> Self {
        Self::default()
    }

    /// Match letters case-insensitively
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// `^` and `$` match at line boundaries
    pub fn multi_line(mut self, yes: bool) -> Self {
        self.multi_line = yes;
        self
    }

    /// `.` also matches `\n`
    pub fn dot_matches_new_line(mut self, yes: bool) -> Self {
        self.dot_matches_new_line = yes;
        self
    }

    /// Allow whitespace and `#` comments in the pattern
    pub fn ignore_whitespace(mut self, yes: bool) -> Self {
        self.ignore_whitespace = yes;
        self
    }

    fn compile(&self, pattern: &str) -> ValidationResult<regex::Regex> {
        RegexBuilder::new(pattern)
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace)
            .build()
            .map_err(|e| {
                ValidationError::Configuration(format!("invalid pattern `{}`: {}", pattern, e))
            })
    }
}

/// Passes when the value's text contains a match (or, inverted, does not)
///
/// The search is unanchored; anchor the pattern with `^`/`$` to match the
/// whole value.
#[derive(Debug, Clone)]
pub struct Regex {
    options: RuleOptions,
    regex: regex::Regex,
    inverse_match: bool,
}

impl Regex {
    /// Compile a pattern
    pub fn new(pattern: &str) -> ValidationResult<Self> {
        Self::with_flags(pattern, RegexFlags::default())
    }

    /// Compile a pattern with flags
    pub fn with_flags(pattern: &str, flags: RegexFlags) -> ValidationResult<Self> {
        Ok(Self::from_regex(flags.compile(pattern)?))
    }

    /// Use an already compiled pattern
    pub fn from_regex(regex: regex::Regex) -> Self {
        Self {
            options: RuleOptions::default(),
            regex,
            inverse_match: false,
        }
    }

    /// Fail on a match instead of on no match
    pub fn inverse_match(mut self, inverse: bool) -> Self {
        self.inverse_match = inverse;
        self
    }

    /// The compiled pattern
    pub fn as_regex(&self) -> &regex::Regex {
        &self.regex
    }
}

impl Rule for Regex {
    rule_options!();

    fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
        if self.should_ignore(value) {
            return Ok(true);
        }
        Ok(self.regex.is_match(&text_of(value)) != self.inverse_match)
    }

    fn default_message(&self) -> &'static str {
        "The value `{__value__}` in `{__name__}` is invalid."
    }
}

// ============================================================================
// Fixed-format rules
// ============================================================================

/// Declares a rule that checks the value's text with a format function
macro_rules! format_rule {
    ($(#[$meta:meta])* $name:ident, $check:path, $code:literal, $message:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            options: RuleOptions,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl Rule for $name {
            rule_options!();

            fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
                Ok(self.should_ignore(value) || $check(&text_of(value)))
            }

            fn default_message(&self) -> &'static str {
                $message
            }

            fn default_code(&self) -> &'static str {
                $code
            }
        }
    };
}

fn is_slug(text: &str) -> bool {
    formats::SLUG_REGEX.is_match(text)
}

fn is_phone_number(text: &str) -> bool {
    formats::PHONE_NUMBER_REGEX.is_match(text)
}

fn is_phone_number_e164(text: &str) -> bool {
    formats::PHONE_NUMBER_E164_REGEX.is_match(text)
}

format_rule!(
    /// Letters, numbers, underscores or hyphens only
    Slug,
    is_slug,
    "slug",
    "The `{__name__}` should only consist of letters, numbers, underscores or hyphens."
);

format_rule!(
    /// Dotted-quad IPv4 address
    IPv4,
    formats::is_valid_ipv4,
    "ipv4",
    "The `{__name__}` must be a valid IPv4 address."
);

format_rule!(
    /// IPv6 address
    IPv6,
    formats::is_valid_ipv6,
    "ipv6",
    "The `{__name__}` must be a valid IPv6 address."
);

format_rule!(
    /// IPv4 or IPv6 address
    IP,
    formats::is_valid_ip,
    "ip",
    "The `{__name__}` must be a valid IP address."
);

format_rule!(
    /// Loose phone number: optional `+` and country code `1`, 9 to 15 digits
    PhoneNumber,
    is_phone_number,
    "phone_number",
    "The '{__name__}' field must be a valid phone number in the format: '+xxxxxxxxxx'. Up to 15 digits allowed."
);

format_rule!(
    /// E.164 phone number: `+`, then up to 15 digits without a leading zero
    PhoneNumberE164,
    is_phone_number_e164,
    "phone_number",
    "The '{__name__}' field must be a valid phone number in the format: '+xxxxxxxxxx'. Up to 15 digits allowed."
);

// ============================================================================
// URL
// ============================================================================

/// Schemes accepted by [`Url`] unless configured otherwise
pub const DEFAULT_URL_SCHEMES: [&str; 4] = ["http", "https", "ftp", "ftps"];

/// Absolute URL with an allowed scheme
///
/// Internationalized host names are accepted through their IDNA form.
#[derive(Debug, Clone)]
pub struct Url {
    options: RuleOptions,
    schemes: Vec<String>,
}

impl Default for Url {
    fn default() -> Self {
        Self {
            options: RuleOptions::default(),
            schemes: DEFAULT_URL_SCHEMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Url {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the allowed schemes (compared case-insensitively)
    pub fn schemes<S: Into<String>>(mut self, schemes: impl IntoIterator<Item = S>) -> Self {
        self.schemes = schemes.into_iter().map(Into::into).collect();
        self
    }
}

impl Rule for Url {
    rule_options!();

    fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
        if self.should_ignore(value) {
            return Ok(true);
        }

        let text = text_of(value);
        let scheme = text.split("://").next().unwrap_or_default();
        if !self.schemes.iter().any(|allowed| allowed.eq_ignore_ascii_case(scheme)) {
            return Ok(false);
        }

        if formats::URL_REGEX.is_match(&text) {
            return Ok(true);
        }
        if text.is_empty() {
            return Ok(false);
        }

        Ok(formats::url_to_ascii(&text).is_some_and(|ascii| formats::URL_REGEX.is_match(&ascii)))
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` must be a valid URL."
    }

    fn default_code(&self) -> &'static str {
        "url"
    }
}

// ============================================================================
// Email
// ============================================================================

/// Email address
#[derive(Debug, Clone)]
pub struct Email {
    options: RuleOptions,
    whitelist: Vec<String>,
}

impl Default for Email {
    fn default() -> Self {
        Self {
            options: RuleOptions::default(),
            whitelist: formats::DEFAULT_EMAIL_WHITELIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Email {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the domains that skip domain validation
    pub fn whitelist<S: Into<String>>(mut self, domains: impl IntoIterator<Item = S>) -> Self {
        self.whitelist = domains.into_iter().map(Into::into).collect();
        self
    }
}

impl Rule for Email {
    rule_options!();

    fn check(&self, value: &Value, _data: &DataSet<'_>) -> ValidationResult<bool> {
        if self.should_ignore(value) {
            return Ok(true);
        }
        Ok(formats::validate_email(&text_of(value), &self.whitelist))
    }

    fn default_message(&self) -> &'static str {
        "The `{__name__}` must be a valid email address."
    }

    fn default_code(&self) -> &'static str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(rule: &impl Rule, value: impl Into<Value>) -> bool {
        rule.check(&value.into(), &DataSet::empty()).unwrap()
    }

    #[test]
    fn test_regex() {
        let pattern = r"^[a-zA-Z]+\d+$";
        assert!(check(&Regex::new(pattern).unwrap(), "abc123"));
        assert!(!check(&Regex::new(pattern).unwrap(), "abc"));
        assert!(check(&Regex::new(pattern).unwrap().ignore_empty(true), ""));
        assert!(!check(&Regex::new(pattern).unwrap().inverse_match(true), "abc123"));
        assert!(check(&Regex::new(pattern).unwrap().inverse_match(true), "abc"));
    }

    #[test]
    fn test_regex_search_is_unanchored() {
        let rule = Regex::new(r"\d").unwrap();
        assert!(check(&rule, "abc1def"));
        assert!(check(&rule, 42));
    }

    #[test]
    fn test_regex_flags_and_compiled() {
        let flags = RegexFlags::new().case_insensitive(true);
        assert!(check(&Regex::with_flags("^abc$", flags).unwrap(), "ABC"));
        assert!(!check(&Regex::new("^abc$").unwrap(), "ABC"));

        let compiled = regex::Regex::new("^x+$").unwrap();
        assert!(check(&Regex::from_regex(compiled), "xxx"));
    }

    #[test]
    fn test_invalid_pattern_is_configuration_error() {
        assert!(matches!(Regex::new("("), Err(ValidationError::Configuration(_))));
    }

    #[test]
    fn test_regex_default_message() {
        let error = Regex::new("^a$")
            .unwrap()
            .with_name("Code")
            .validate(&Value::from("b"), &DataSet::empty(), None)
            .unwrap_err();
        let report = error.into_report().unwrap();
        assert_eq!(report.messages(), vec!["The value `b` in `Code` is invalid."]);
        assert_eq!(report.entries()[0].code.as_deref(), Some("invalid"));
    }

    #[test]
    fn test_url() {
        assert!(!check(&Url::new(), "abc"));
        assert!(!check(&Url::new(), "127.0.0.1"));
        assert!(!check(&Url::new().schemes(["https"]), "http://127.0.0.1"));
        assert!(check(&Url::new(), "http://127.0.0.1"));
        assert!(check(&Url::new(), "http://localhost:8080"));
        assert!(check(&Url::new().ignore_empty(true), ""));
        assert!(!check(&Url::new(), ""));
        assert!(check(
            &Url::new(),
            "https://www.google.com/search?q=foo+bar&oq=foo+bar&sourceid=chrome&ie=UTF-8"
        ));
    }

    #[test]
    fn test_url_scheme_case_insensitive() {
        assert!(check(&Url::new(), "HTTP://example.com"));
        assert!(check(&Url::new().schemes(["HTTPS"]), "https://example.com"));
    }

    #[test]
    fn test_url_idna() {
        assert!(check(&Url::new(), "http://bücher.de/path"));
        assert!(!check(&Url::new(), "http://bü cher.de/path"));
    }

    #[test]
    fn test_email() {
        let rule = Email::new();
        assert!(check(&rule, "mail_25@example.com"));
        assert!(check(&rule, "mail-25@example.co.ke"));
        assert!(check(&rule, "mail.$$@localhost"));
        assert!(check(&rule, "123@127.0.0.1"));
        assert!(check(&Email::new().ignore_empty(true), ""));
        assert!(!check(&rule, ""));
        assert!(!check(&rule, "123@127.0.0"));
        assert!(!check(&rule, "327.0.0.1"));
        assert!(!check(&rule, "mail[25]@example.com"));
        assert!(!check(&rule, "mail(25)@example.com"));
        assert!(!check(&rule, "mail<div>25@example.com"));
    }

    #[test]
    fn test_email_whitelist() {
        assert!(!check(&Email::new().whitelist(["intranet"]), "root@localhost"));
        assert!(check(&Email::new().whitelist(["intranet"]), "root@intranet"));
    }

    #[test]
    fn test_ip_rules() {
        assert!(check(&IPv4::new(), "127.0.0.1"));
        assert!(check(&IPv4::new().ignore_empty(true), ""));
        assert!(!check(&IPv4::new(), "127.0.0"));
        assert!(!check(&IPv4::new(), "327.0.0.1"));

        assert!(check(&IPv6::new(), "fe80::bc57:92f9:8b9b:3c3c"));
        assert!(check(&IPv6::new().ignore_empty(true), Value::Null));
        assert!(!check(&IPv6::new(), "127.0.0.1"));
        assert!(!check(&IPv6::new(), "bc57:92f9:8b9b:3c3c"));

        assert!(check(&IP::new(), "127.0.0.1"));
        assert!(check(&IP::new(), "fe80::bc57:92f9:8b9b:3c3c"));
        assert!(!check(&IP::new(), "bc57:92f9:8b9b:3c3c"));
        assert!(!check(&IP::new(), "327.0.0.1"));
    }

    #[test]
    fn test_slug_and_phone_numbers() {
        assert!(check(&Slug::new(), "my-post_2"));
        assert!(!check(&Slug::new(), "my post"));
        assert!(check(&PhoneNumber::new(), "+254712345678"));
        assert!(check(&PhoneNumber::new(), "0712345678"));
        assert!(!check(&PhoneNumber::new(), "07123"));
        assert!(check(&PhoneNumberE164::new(), "+254712345678"));
        assert!(!check(&PhoneNumberE164::new(), "0712345678"));
        assert_eq!(PhoneNumber::new().code(), "phone_number");
    }
}
