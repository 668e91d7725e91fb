//! The `METHOD /path/[param]` endpoint pattern shared by headings and
//! payload block filenames.

use regex::Regex;
use std::sync::LazyLock;

pub const METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z0-9][a-z0-9._-]*|\[[A-Za-z][A-Za-z0-9_]*\])$")
        .expect("segment pattern is valid")
});

/// If `text` starts with an HTTP method (any case) followed by a path or
/// nothing, return the method token as written.
pub fn leading_method(text: &str) -> Option<&str> {
    let mut tokens = text.split_whitespace();
    let first = tokens.next()?;
    if !METHODS.iter().any(|m| m.eq_ignore_ascii_case(first)) {
        return None;
    }
    match tokens.next() {
        None => Some(first),
        Some(next) if next.starts_with('/') => Some(first),
        // "Get a booking" is prose, not an endpoint
        Some(_) => None,
    }
}

/// Check `METHOD /path/[param]`. Returns a reason on mismatch.
pub fn check_endpoint(text: &str) -> Result<(), String> {
    let text = text.trim();
    let mut parts = text.splitn(2, ' ');
    let method = parts.next().unwrap_or("");
    let path = parts.next().map(str::trim).unwrap_or("");

    if !METHODS.contains(&method) {
        if METHODS.iter().any(|m| m.eq_ignore_ascii_case(method)) {
            return Err(format!(
                "HTTP method '{}' must be uppercase ('{}')",
                method,
                method.to_ascii_uppercase()
            ));
        }
        return Err(format!(
            "'{}' is not an HTTP method (expected one of {})",
            method,
            METHODS.join(", ")
        ));
    }
    if path.is_empty() {
        return Err(format!("'{}' is not followed by a path", method));
    }
    if path.contains(char::is_whitespace) {
        return Err(format!("path '{}' must not contain whitespace", path));
    }
    if !path.starts_with('/') {
        return Err(format!("path '{}' must start with '/'", path));
    }
    if path.len() > 1 && path.ends_with('/') {
        return Err(format!("path '{}' must not end with '/'", path));
    }

    for segment in path[1..].split('/') {
        if segment.is_empty() {
            return Err(format!("path '{}' contains an empty segment", path));
        }
        if SEGMENT.is_match(segment) {
            continue;
        }
        if let Some(name) = segment
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .or_else(|| segment.strip_prefix(':'))
        {
            return Err(format!(
                "path parameter '{}' must be written as '[{}]'",
                segment, name
            ));
        }
        return Err(format!(
            "path segment '{}' must be lowercase kebab-case or a [param]",
            segment
        ));
    }

    Ok(())
}
