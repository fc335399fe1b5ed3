//! Message text helpers
//!
//! Display-name humanization and the deferred rendering of message
//! templates. Rendering is a pure function of a template and its
//! placeholders so it can run at the boundary (e.g. after localization).

use crate::types::Placeholders;

/// Delimiter pairs left behind when a quoted placeholder renders empty
const EMPTY_DELIMITERS: [&str; 3] = ["``", "\"\"", "''"];

/// Turn an attribute name into a display name
///
/// A trailing `_id` is dropped, underscores become spaces and every word is
/// title-cased: `confirm_password` becomes `Confirm Password`.
///
/// # Example
/// ```
/// use ouroboros_rules::text::humanize;
///
/// assert_eq!(humanize("confirm_password"), "Confirm Password");
/// assert_eq!(humanize("author_id"), "Author");
/// ```
pub fn humanize(attribute: &str) -> String {
    let trimmed = attribute.strip_suffix("_id").unwrap_or(attribute);
    trimmed
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Substitute `{name}` placeholders in a template
///
/// `{{` and `}}` produce literal braces. A format spec after `:` or a
/// conversion after `!` is accepted and ignored. Names without a value are
/// left in place verbatim.
pub fn render_template(template: &str, placeholders: &Placeholders) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        match tail.find('}') {
            Some(end) => {
                let token = &tail[1..end];
                let name = token.split([':', '!']).next().unwrap_or(token);
                match placeholders.get(name) {
                    Some(value) => out.push_str(&value.to_string()),
                    None => out.push_str(&tail[..=end]),
                }
                rest = &tail[end + 1..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render a template and strip the empty delimiter pairs it leaves behind
pub fn render(template: &str, placeholders: &Placeholders) -> String {
    let mut message = render_template(template, placeholders);
    for pair in EMPTY_DELIMITERS {
        message = message.replace(pair, "");
    }
    message
}
