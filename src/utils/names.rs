// Name rules for Go identifiers
//
// Every component that needs to decide visibility or derive a method/receiver
// name goes through this module. All functions are pure.

use crate::error::{GodError, Result};

/// Go keywords. A receiver alias must never be one of these.
const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

pub fn is_ascii(c: u8) -> bool {
    c & 0b1000_0000 == 0
}

/// Exported under Go's naming convention: first character is an upper-case ASCII letter.
pub fn is_public(name: &str) -> bool {
    name.as_bytes()
        .first()
        .is_some_and(|&c| is_ascii(c) && c.is_ascii_uppercase())
}

/// Names that can never be mapped to an accessor: empty, non-ASCII leading,
/// or the blank identifier.
pub fn should_ignore(name: &str) -> bool {
    match name.as_bytes().first() {
        None => true,
        Some(&c) => !is_ascii(c) || name == "_",
    }
}

/// Human-readable reason for [`should_ignore`], `None` if the name is usable.
pub fn ignore_reason(name: &str) -> Option<&'static str> {
    match name.as_bytes().first() {
        None => Some("name is empty"),
        Some(&c) if !is_ascii(c) => Some("name must start with an ASCII character"),
        Some(_) if name == "_" => Some("blank field cannot be accessed"),
        Some(_) => None,
    }
}

/// `name` -> `Name`. Rejects names that are already exported.
pub fn to_getter_name(name: &str) -> Result<String> {
    let first = match name.as_bytes().first() {
        None => return Err(GodError::invalid_name(name, "name cannot be empty")),
        Some(&c) => c,
    };
    if !is_ascii(first) {
        return Err(GodError::invalid_name(
            name,
            "name must start with an ASCII letter",
        ));
    }
    if first.is_ascii_uppercase() {
        return Err(GodError::invalid_name(
            name,
            "name must start with a lower-case ASCII letter",
        ));
    }

    let mut getter_name = String::with_capacity(name.len());
    getter_name.push(first.to_ascii_uppercase() as char);
    getter_name.push_str(&name[1..]);
    Ok(getter_name)
}

/// `name` -> `SetName`, with the same preconditions as [`to_getter_name`].
pub fn to_setter_name(name: &str) -> Result<String> {
    Ok(format!("Set{}", to_getter_name(name)?))
}

/// Receiver alias: the lower-cased capitals of `type_name` (`UserAccount` -> `ua`),
/// or the lower-cased first letter when there are none (`user` -> `u`).
pub fn short_receiver_name(type_name: &str) -> Result<String> {
    if type_name.is_empty() {
        return Err(GodError::invalid_name(type_name, "name cannot be empty"));
    }

    let initials: String = type_name
        .chars()
        .filter(|c| c.is_uppercase())
        .flat_map(char::to_lowercase)
        .collect();

    if !initials.is_empty() && !is_keyword(&initials) {
        return Ok(initials);
    }

    type_name
        .chars()
        .find(|c| c.is_alphabetic())
        .map(|c| c.to_lowercase().collect())
        .ok_or_else(|| {
            GodError::invalid_name(type_name, "cannot derive a receiver name from it")
        })
}

/// Parameter name used by generated setters.
pub fn setter_param_name(short_name: &str) -> &'static str {
    if short_name == "value" {
        "v"
    } else {
        "value"
    }
}

pub fn is_keyword(name: &str) -> bool {
    GO_KEYWORDS.contains(&name)
}
