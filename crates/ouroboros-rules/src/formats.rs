//! Format checkers for common string patterns
//!
//! This module provides the pre-compiled patterns behind the URL, email,
//! slug, phone number and IP address rules, plus IDNA conversion for
//! internationalized host names.

use once_cell::sync::Lazy;
use regex::Regex;
use std::net::Ipv6Addr;
use url::Host;

// ============================================================================
// Pre-compiled Regex Patterns
// ============================================================================

/// URL pattern; the scheme is validated separately against an allow-list
pub static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:[a-z0-9.\-]*)://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]+[A-Z0-9]\.?)|",
        r"localhost|",
        r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}|",
        r"\[?[A-F0-9]*:[A-F0-9:]+\]?)",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .unwrap()
});

/// Email user part: dot-atom or quoted string
static EMAIL_USER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)(^[-!#$%&'*+/=?^_`{}|~0-9A-Z]+(\.[-!#$%&'*+/=?^_`{}|~0-9A-Z]+)*$",
        r#"|^"([\x01-\x08\x0b\x0c\x0e-\x1f!#-\[\]-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*"$)"#,
    ))
    .unwrap()
});

/// Email domain part: dot separated labels
static EMAIL_DOMAIN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}|[A-Z0-9-]+[A-Z0-9])$")
        .unwrap()
});

/// Email domain literal: bracketed IPv4 or IPv6 address (SMTP 4.1.3)
static EMAIL_LITERAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\[([A-F0-9:.]+)\]$").unwrap());

/// Dotted-quad IPv4 address
pub static IPV4_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(25[0-5]|2[0-4][0-9]|[0-1]?[0-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|[0-1]?[0-9]?[0-9])){3}$")
        .unwrap()
});

/// Letters, numbers, underscores or hyphens
pub static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap());

/// Loose phone number: optional `+` and `1`, then 9 to 15 digits
pub static PHONE_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?1?\d{9,15}$").unwrap());

/// E.164 phone number
pub static PHONE_NUMBER_E164_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9]\d{8,14}$").unwrap());

/// Canonical decimal integer: no sign on zero, no `+`, no leading zeros
pub static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(0|-?[1-9][0-9]*)$").unwrap());

// ============================================================================
// IP Addresses
// ============================================================================

/// Validate a dotted-quad IPv4 address
///
/// # Example
/// ```
/// use ouroboros_rules::formats::is_valid_ipv4;
///
/// assert!(is_valid_ipv4("127.0.0.1"));
/// assert!(!is_valid_ipv4("327.0.0.1"));
/// ```
pub fn is_valid_ipv4(value: &str) -> bool {
    IPV4_REGEX.is_match(value)
}

/// Validate an IPv6 address
pub fn is_valid_ipv6(value: &str) -> bool {
    value.parse::<Ipv6Addr>().is_ok()
}

/// Validate an IPv4 or IPv6 address
pub fn is_valid_ip(value: &str) -> bool {
    is_valid_ipv4(value) || is_valid_ipv6(value)
}

// ============================================================================
// IDNA
// ============================================================================

/// Convert an internationalized domain to its ASCII (punycode) form
///
/// Returns `None` when the input is not a valid domain.
pub fn domain_to_ascii(domain: &str) -> Option<String> {
    match Host::parse(domain).ok()? {
        Host::Domain(ascii) => Some(ascii),
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(format!("[{}]", addr)),
    }
}

/// Convert the host of a URL netloc (`user@host:port`) to ASCII
fn netloc_to_ascii(netloc: &str) -> Option<String> {
    let (userinfo, hostport) = match netloc.rsplit_once('@') {
        Some((user, rest)) => (Some(user), rest),
        None => (None, netloc),
    };
    let (host, port) = match hostport.rsplit_once(':') {
        Some((host, port)) if !host.starts_with('[') && port.chars().all(|c| c.is_ascii_digit()) => {
            (host, Some(port))
        }
        _ => (hostport, None),
    };

    let mut ascii = String::new();
    if let Some(user) = userinfo {
        ascii.push_str(user);
        ascii.push('@');
    }
    ascii.push_str(&domain_to_ascii(host)?);
    if let Some(port) = port {
        ascii.push(':');
        ascii.push_str(port);
    }
    Some(ascii)
}

/// Rewrite a URL so that an internationalized netloc is in ASCII form
///
/// Returns `None` when the URL has no `://` separator, when the netloc is
/// already ASCII (nothing to rewrite), or when IDNA conversion fails.
pub fn url_to_ascii(url: &str) -> Option<String> {
    let (scheme, rest) = url.split_once("://")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (netloc, tail) = rest.split_at(end);
    if netloc.is_ascii() {
        return None;
    }
    Some(format!("{}://{}{}", scheme, netloc_to_ascii(netloc)?, tail))
}

// ============================================================================
// Email
// ============================================================================

/// Domains accepted by the email check without further validation
pub const DEFAULT_EMAIL_WHITELIST: [&str; 2] = ["localhost", "127.0.0.1"];

/// Validate the user part of an email address
pub fn is_valid_email_user(user: &str) -> bool {
    EMAIL_USER_REGEX.is_match(user)
}

/// Validate the domain part of an email address (labels or an IP literal)
pub fn is_valid_email_domain(domain: &str) -> bool {
    if EMAIL_DOMAIN_REGEX.is_match(domain) {
        return true;
    }
    EMAIL_LITERAL_REGEX
        .captures(domain)
        .and_then(|caps| caps.get(1))
        .is_some_and(|ip| is_valid_ip(ip.as_str()))
}

/// Validate an email address
///
/// Whitelisted domains bypass the domain check. Non-ASCII domains are
/// retried in their IDNA form.
///
/// # Example
/// ```
/// use ouroboros_rules::formats::validate_email;
///
/// assert!(validate_email("user@example.com", &["localhost"]));
/// assert!(validate_email("root@localhost", &["localhost"]));
/// assert!(!validate_email("invalid-email", &["localhost"]));
/// ```
pub fn validate_email<S: AsRef<str>>(value: &str, whitelist: &[S]) -> bool {
    let Some((user, domain)) = value.rsplit_once('@') else {
        return false;
    };

    if !is_valid_email_user(user) {
        return false;
    }

    if whitelist.iter().any(|allowed| allowed.as_ref() == domain) || is_valid_email_domain(domain) {
        return true;
    }

    if domain.is_ascii() {
        return false;
    }
    domain_to_ascii(domain).is_some_and(|ascii| is_valid_email_domain(&ascii))
}
