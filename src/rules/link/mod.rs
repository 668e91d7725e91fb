//! Rules for glossary cross-references

pub mod glossary_link_format;
pub mod glossary_missing_link;

pub use glossary_link_format::GlossaryLinkFormat;
pub use glossary_missing_link::GlossaryMissingLink;

use crate::parser::inline::InlineLink;
use regex::Regex;
use std::sync::LazyLock;

static GLOSSARY_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://[^/\s]+)?/versions/v[0-9]+/glossary$").expect("glossary path pattern is valid")
});

static KEBAB_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("kebab-case pattern is valid"));

/// Whether a link points into the glossary
pub(crate) fn is_glossary_link(link: &InlineLink) -> bool {
    link.path().to_ascii_lowercase().contains("glossary")
}

pub(crate) fn is_glossary_path(path: &str) -> bool {
    GLOSSARY_PATH.is_match(path)
}

pub(crate) fn is_kebab_case(anchor: &str) -> bool {
    KEBAB_CASE.is_match(anchor)
}

/// Convert `PassengerInfo`, `passenger_info` or `HTTPStatus` to kebab-case
pub(crate) fn to_kebab_case(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }
        if ch.is_uppercase() && i > 0 && !out.is_empty() && !out.ends_with('-') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            // "passengerInfo" -> boundary before I, "HTTPStatus" -> boundary before S
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push('-');
            }
        }
        out.extend(ch.to_lowercase());
    }

    out.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_kebab_case() {
        assert_eq!(to_kebab_case("PassengerInfo"), "passenger-info");
        assert_eq!(to_kebab_case("passengerInfo"), "passenger-info");
        assert_eq!(to_kebab_case("passenger_info"), "passenger-info");
        assert_eq!(to_kebab_case("Passenger Info"), "passenger-info");
        assert_eq!(to_kebab_case("HTTPStatus"), "http-status");
        assert_eq!(to_kebab_case("passenger-info"), "passenger-info");
        assert_eq!(to_kebab_case("Room2Rate"), "room2-rate");
    }

    #[test]
    fn test_is_kebab_case() {
        assert!(is_kebab_case("passenger-info"));
        assert!(is_kebab_case("v5"));
        assert!(!is_kebab_case("PassengerInfo"));
        assert!(!is_kebab_case("passenger_info"));
        assert!(!is_kebab_case("passenger--info"));
        assert!(!is_kebab_case(""));
    }

    #[test]
    fn test_is_glossary_path() {
        assert!(is_glossary_path("/versions/v5/glossary"));
        assert!(is_glossary_path("https://docs.example.com/versions/v12/glossary"));
        assert!(!is_glossary_path("/glossary"));
        assert!(!is_glossary_path("../glossary"));
        assert!(!is_glossary_path("/versions/v5/glossary/"));
        assert!(!is_glossary_path("/versions/latest/glossary"));
    }
}
