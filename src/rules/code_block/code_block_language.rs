use crate::docs::RuleDoc;
use crate::linter::{ConventionRule, Severity, Violation};
use crate::parser::ast::{Section, SectionKind, Span};

/// Rule documentation
pub static DOC: RuleDoc = RuleDoc {
    name: "code-block-language",
    category: "code-block",
    description: "Requires every fenced code block to declare a language tag",
    severity: "error",
    why: r#"The site highlights code and picks copy behavior from the language
tag. A fence without one renders as plain text, and readers cannot tell
whether a snippet is a JSON payload, a TypeScript type or a shell command."#,
    bad_example: r#"```
curl -X POST https://api.example.com/versions/v5/bookings
```"#,
    good_example: r#"```bash
curl -X POST https://api.example.com/versions/v5/bookings
```"#,
    references: &[],
};

/// Check that fenced code blocks declare a language
pub struct CodeBlockLanguage;

impl ConventionRule for CodeBlockLanguage {
    fn name(&self) -> &'static str {
        "code-block-language"
    }

    fn category(&self) -> &'static str {
        "code-block"
    }

    fn description(&self) -> &'static str {
        "Requires every fenced code block to declare a language tag"
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
        if block.language.is_some() {
            return Vec::new();
        }
        vec![self.violation(
            "code block has no language tag (e.g. ```json, ```ts, ```bash)",
            Span::line(block.span.start),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::check_rule;

    #[test]
    fn test_missing_language() {
        let violations = check_rule(&CodeBlockLanguage, "text\n\n```\nls -la\n```\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].start_line, 3);
        assert_eq!(violations[0].end_line, 3);
    }

    #[test]
    fn test_language_present() {
        assert!(check_rule(&CodeBlockLanguage, "```bash\nls -la\n```\n").is_empty());
        assert!(check_rule(&CodeBlockLanguage, "~~~ts\ntype A = {}\n~~~\n").is_empty());
    }

    #[test]
    fn test_attributes_without_language() {
        let violations = check_rule(&CodeBlockLanguage, "```filename=\"GET /x\" copy\n{}\n```\n");
        assert_eq!(violations.len(), 1);
    }
}
