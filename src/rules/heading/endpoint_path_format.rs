use crate::docs::RuleDoc;
use crate::linter::{ConventionRule, Severity, Violation};
use crate::parser::ast::{Section, SectionKind};
use crate::rules::endpoint::{check_endpoint, leading_method};

/// Rule documentation
pub static DOC: RuleDoc = RuleDoc {
    name: "endpoint-path-format",
    category: "heading",
    description: "Checks that endpoint headings follow METHOD /path/[param]",
    severity: "error",
    why: r#"Endpoint headings are used as anchors and show up in the page outline
and in search. Every page writes them the same way: an uppercase HTTP
method, a single space, then a lowercase path where parameters are
written in square brackets."#,
    bad_example: r#"## get /versions/v5/bookings/{bookingId}"#,
    good_example: r#"## GET /versions/v5/bookings/[bookingId]"#,
    references: &[],
};

/// Check headings that describe an endpoint
pub struct EndpointPathFormat;

impl ConventionRule for EndpointPathFormat {
    fn name(&self) -> &'static str {
        "endpoint-path-format"
    }

    fn category(&self) -> &'static str {
        "heading"
    }

    fn description(&self) -> &'static str {
        "Checks that endpoint headings follow METHOD /path/[param]"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn applies_to(&self) -> &'static [SectionKind] {
        &[SectionKind::Heading]
    }

    fn check(&self, section: &Section) -> Vec<Violation> {
        let Section::Heading(heading) = section else {
            return Vec::new();
        };
        // `POST /bookings` is often wrapped in a code span
        let text = heading.text.replace('`', "");
        if leading_method(&text).is_none() {
            return Vec::new();
        }
        match check_endpoint(&text) {
            Ok(()) => Vec::new(),
            Err(reason) => vec![self.violation(
                &format!("endpoint heading '{}': {}", text.trim(), reason),
                heading.span,
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::check_rule;

    #[test]
    fn test_valid_heading() {
        assert!(check_rule(&EndpointPathFormat, "## POST /versions/v5/bookings\n").is_empty());
        assert!(check_rule(&EndpointPathFormat, "### `GET /versions/v5/bookings/[bookingId]`\n").is_empty());
    }

    #[test]
    fn test_curly_param() {
        let violations = check_rule(&EndpointPathFormat, "## GET /versions/v5/bookings/{bookingId}\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].start_line, 1);
        assert!(violations[0].message.contains("[bookingId]"));
    }

    #[test]
    fn test_lowercase_method() {
        assert_eq!(check_rule(&EndpointPathFormat, "## post /versions/v5/bookings\n").len(), 1);
    }

    #[test]
    fn test_prose_heading_ignored() {
        assert!(check_rule(&EndpointPathFormat, "## Get a booking\n").is_empty());
        assert!(check_rule(&EndpointPathFormat, "## Errors\n").is_empty());
    }
}
