use crate::docs::RuleDoc;
use crate::linter::{ConventionRule, Severity, Violation};
use crate::parser::ast::{Section, SectionKind};

/// Rule documentation
pub static DOC: RuleDoc = RuleDoc {
    name: "code-block-unclosed",
    category: "code-block",
    description: "Detects fenced code blocks that are never closed",
    severity: "error",
    why: r#"An unclosed fence swallows the rest of the page: every heading,
table and callout after it renders as code. The site build usually does
not complain, so the mistake ships unnoticed."#,
    bad_example: r#"```json copy
{ "rateId": "r_123" }

## Errors"#,
    good_example: r#"```json copy
{ "rateId": "r_123" }
```

## Errors"#,
    references: &[],
};

/// Check that every fence has a matching closing fence
pub struct CodeBlockUnclosed;

impl ConventionRule for CodeBlockUnclosed {
    fn name(&self) -> &'static str {
        "code-block-unclosed"
    }

    fn category(&self) -> &'static str {
        "code-block"
    }

    fn description(&self) -> &'static str {
        "Detects fenced code blocks that are never closed"
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
        if block.closed {
            return Vec::new();
        }
        let message = format!(
            "code block opened with {} is never closed; everything after it renders as code",
            block.fence
        );
        vec![self.violation(&message, block.span)]
    }
}
