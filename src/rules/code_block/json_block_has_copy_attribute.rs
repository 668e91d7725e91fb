use super::is_payload_language;
use crate::docs::RuleDoc;
use crate::linter::{ConventionRule, Fix, Severity, Violation};
use crate::parser::ast::{Section, SectionKind, Span};

/// Rule documentation
pub static DOC: RuleDoc = RuleDoc {
    name: "json-block-has-copy-attribute",
    category: "code-block",
    description: "Requires payload blocks with a filename to carry the copy attribute",
    severity: "error",
    why: r#"Request and response payloads are meant to be pasted into a client.
The copy attribute renders the copy button; without it readers select the
text by hand and routinely miss a closing brace."#,
    bad_example: r#"```json filename="POST /versions/v5/bookings"
{ "rateId": "r_123" }
```"#,
    good_example: r#"```json filename="POST /versions/v5/bookings" copy
{ "rateId": "r_123" }
```"#,
    references: &[],
};

/// Check that payload blocks are copyable
pub struct JsonBlockHasCopyAttribute;

impl ConventionRule for JsonBlockHasCopyAttribute {
    fn name(&self) -> &'static str {
        "json-block-has-copy-attribute"
    }

    fn category(&self) -> &'static str {
        "code-block"
    }

    fn description(&self) -> &'static str {
        "Requires payload blocks with a filename to carry the copy attribute"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn applies_to(&self) -> &'static [SectionKind] {
        &[SectionKind::CodeBlock]
    }

    fn check(&self, section: &Section) -> Vec<Violation> {
        let Section::CodeBlock(block) = section else {
            return Vec::new();
        };
        if !is_payload_language(block) || block.filename().is_none() || block.has_copy() {
            return Vec::new();
        }

        let line = block.span.start;
        let mut violation = self.violation(
            "payload code block with a filename is missing the copy attribute",
            Span::line(line),
        );
        // copy="false" is an explicit opt-out written by hand; leave it alone
        if block.attribute("copy").is_none() {
            let fixed = format!("{} copy", block.fence_line.trim_end());
            violation = violation.with_fix(Fix::replace_line(line, &fixed));
        }
        vec![violation]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::check_rule;

    #[test]
    fn test_missing_copy() {
        let source = "```json filename=\"POST /versions/v5/bookings\"\n{}\n```\n";
        let violations = check_rule(&JsonBlockHasCopyAttribute, source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].start_line, 1);
        let fix = violations[0].fix.as_ref().unwrap();
        assert_eq!(
            fix.new_text,
            "```json filename=\"POST /versions/v5/bookings\" copy"
        );
    }

    #[test]
    fn test_copy_present() {
        let source = "```json filename=\"POST /versions/v5/bookings\" copy\n{}\n```\n";
        assert!(check_rule(&JsonBlockHasCopyAttribute, source).is_empty());
    }

    #[test]
    fn test_copy_false_has_no_fix() {
        let source = "```ts filename=\"types.ts\" copy=\"false\"\ntype A = {}\n```\n";
        let violations = check_rule(&JsonBlockHasCopyAttribute, source);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].fix.is_none());
    }

    #[test]
    fn test_without_filename_not_checked() {
        assert!(check_rule(&JsonBlockHasCopyAttribute, "```json\n{}\n```\n").is_empty());
    }

    #[test]
    fn test_other_language_not_checked() {
        let source = "```bash filename=\"run.sh\"\nls\n```\n";
        assert!(check_rule(&JsonBlockHasCopyAttribute, source).is_empty());
    }
}
