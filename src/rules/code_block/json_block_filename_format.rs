use super::is_payload_language;
use crate::docs::RuleDoc;
use crate::linter::{ConventionRule, Severity, Violation};
use crate::parser::ast::{CodeBlock, Section, SectionKind, Span};
use crate::rules::endpoint::{check_endpoint, leading_method};
use regex::Regex;
use std::sync::LazyLock;

/// Rule documentation
pub static DOC: RuleDoc = RuleDoc {
    name: "json-block-filename-format",
    category: "code-block",
    description: "Checks the filename of payload blocks",
    severity: "warning",
    why: r#"The filename of a payload block is shown as its title. Payload
examples are titled with the endpoint they belong to, written the same way
as endpoint headings, so readers can match a payload to its operation.
Type templates use a plain file name such as `booking.ts`."#,
    bad_example: r#"```json copy filename="post /bookings/{id}"
{ "rateId": "r_123" }
```"#,
    good_example: r#"```json copy filename="POST /versions/v5/bookings/[bookingId]"
{ "rateId": "r_123" }
```"#,
    references: &[],
};

static FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._-]*\.[A-Za-z0-9]+$").expect("file name pattern is valid")
});

/// Check the filename attribute of payload blocks
pub struct JsonBlockFilenameFormat;

impl JsonBlockFilenameFormat {
    fn check_filename(filename: &str) -> Result<(), String> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err("filename is empty".to_string());
        }
        if leading_method(filename).is_some() {
            return check_endpoint(filename);
        }
        if FILE_NAME.is_match(filename) {
            return Ok(());
        }
        Err(format!(
            "'{}' is neither an endpoint (METHOD /path) nor a file name",
            filename
        ))
    }

    fn is_documented_payload(block: &CodeBlock) -> bool {
        is_payload_language(block) && (block.filename().is_some() || block.attribute("copy").is_some())
    }
}

impl ConventionRule for JsonBlockFilenameFormat {
    fn name(&self) -> &'static str {
        "json-block-filename-format"
    }

    fn category(&self) -> &'static str {
        "code-block"
    }

    fn description(&self) -> &'static str {
        "Checks the filename of payload blocks"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn applies_to(&self) -> &'static [SectionKind] {
        &[SectionKind::CodeBlock]
    }

    fn check(&self, section: &Section) -> Vec<Violation> {
        let Section::CodeBlock(block) = section else {
            return Vec::new();
        };
        if !Self::is_documented_payload(block) {
            return Vec::new();
        }

        let span = Span::line(block.span.start);
        match block.filename() {
            None => vec![self.violation(
                "payload code block has no filename (e.g. filename=\"POST /versions/v5/bookings\")",
                span,
            )],
            Some(filename) => match Self::check_filename(filename) {
                Ok(()) => Vec::new(),
                Err(reason) => vec![self.violation(&format!("invalid filename: {}", reason), span)],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::check_rule;

    #[test]
    fn test_endpoint_filename() {
        let source = "```json copy filename=\"POST /versions/v5/bookings\"\n{}\n```\n";
        assert!(check_rule(&JsonBlockFilenameFormat, source).is_empty());
    }

    #[test]
    fn test_plain_file_name() {
        let source = "```ts copy filename=\"booking-request.ts\"\ntype A = {}\n```\n";
        assert!(check_rule(&JsonBlockFilenameFormat, source).is_empty());
    }

    #[test]
    fn test_title_fallback() {
        let source = "```json copy title=\"GET /versions/v5/bookings/[bookingId]\"\n{}\n```\n";
        assert!(check_rule(&JsonBlockFilenameFormat, source).is_empty());
    }

    #[test]
    fn test_missing_filename() {
        let violations = check_rule(&JsonBlockFilenameFormat, "```json copy\n{}\n```\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert!(violations[0].message.contains("no filename"));
    }

    #[test]
    fn test_bad_endpoint_filename() {
        let source = "```json copy filename=\"post /bookings/{id}\"\n{}\n```\n";
        let violations = check_rule(&JsonBlockFilenameFormat, source);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("uppercase"));
    }

    #[test]
    fn test_prose_filename() {
        let source = "```json copy filename=\"Booking response\"\n{}\n```\n";
        assert_eq!(check_rule(&JsonBlockFilenameFormat, source).len(), 1);
    }

    #[test]
    fn test_plain_json_block_ignored() {
        assert!(check_rule(&JsonBlockFilenameFormat, "```json\n{}\n```\n").is_empty());
    }
}
