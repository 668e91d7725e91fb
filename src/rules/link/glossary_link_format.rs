use super::{is_glossary_link, is_glossary_path, is_kebab_case, to_kebab_case};
use crate::docs::RuleDoc;
use crate::linter::{ConventionRule, Fix, Severity, Violation};
use crate::parser::ast::{Section, SectionKind, Span};
use crate::parser::inline::links;

/// Rule documentation
pub static DOC: RuleDoc = RuleDoc {
    name: "glossary-link-format",
    category: "link",
    description: "Checks the shape of links into the glossary",
    severity: "error",
    why: r#"Glossary entries are addressed by kebab-case anchors generated from
their headings. A link to `#PassengerInfo` scrolls nowhere, and links that
leave out the version prefix break when a new API version ships."#,
    bad_example: r#"Send a [PassengerInfo](/versions/v5/glossary#PassengerInfo) per guest.
See the [glossary](../glossary#rate)."#,
    good_example: r#"Send a [PassengerInfo](/versions/v5/glossary#passenger-info) per guest.
See the [glossary](/versions/v5/glossary#rate)."#,
    references: &[],
};

/// Check links that point into the glossary
pub struct GlossaryLinkFormat;

impl ConventionRule for GlossaryLinkFormat {
    fn name(&self) -> &'static str {
        "glossary-link-format"
    }

    fn category(&self) -> &'static str {
        "link"
    }

    fn description(&self) -> &'static str {
        "Checks the shape of links into the glossary"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn applies_to(&self) -> &'static [SectionKind] {
        &[
            SectionKind::Heading,
            SectionKind::Paragraph,
            SectionKind::Table,
            SectionKind::Callout,
        ]
    }

    fn check(&self, section: &Section) -> Vec<Violation> {
        let mut violations = Vec::new();

        for line in section.prose_lines() {
            for link in links(&line.text).into_iter().filter(is_glossary_link) {
                let span = Span::line(line.number);
                let path = link.path();
                if !is_glossary_path(path) {
                    violations.push(self.violation(
                        &format!(
                            "glossary link '{}' must point to /versions/vN/glossary#anchor",
                            link.target
                        ),
                        span,
                    ));
                    continue;
                }

                match link.anchor() {
                    None | Some("") => violations.push(self.violation(
                        &format!("glossary link '{}' has no #anchor", link.target),
                        span,
                    )),
                    Some(anchor) if !is_kebab_case(anchor) => {
                        let fixed_anchor = to_kebab_case(anchor);
                        let mut violation = self.violation(
                            &format!(
                                "glossary anchor '#{}' must be kebab-case ('#{}')",
                                anchor, fixed_anchor
                            ),
                            span,
                        );
                        if !fixed_anchor.is_empty() {
                            let fixed_target = format!("{}#{}", path, fixed_anchor);
                            violation = violation.with_fix(Fix::replace(
                                line.number,
                                &format!("]({}", link.target),
                                &format!("]({}", fixed_target),
                            ));
                        }
                        violations.push(violation);
                    }
                    Some(_) => {}
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_util::check_rule;

    #[test]
    fn test_kebab_anchor() {
        let source = "Send a [PassengerInfo](/versions/v5/glossary#passenger-info).\n";
        assert!(check_rule(&GlossaryLinkFormat, source).is_empty());
    }

    #[test]
    fn test_pascal_case_anchor() {
        let source = "Send a [PassengerInfo](/versions/v5/glossary#PassengerInfo).\n";
        let violations = check_rule(&GlossaryLinkFormat, source);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("#passenger-info"));
        let fix = violations[0].fix.as_ref().unwrap();
        assert_eq!(fix.old_text.as_deref(), Some("](/versions/v5/glossary#PassengerInfo"));
        assert_eq!(fix.new_text, "](/versions/v5/glossary#passenger-info");
    }

    #[test]
    fn test_wrong_path() {
        let violations = check_rule(&GlossaryLinkFormat, "See [Rate](../glossary#rate).\n");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].fix.is_none());
    }

    #[test]
    fn test_missing_anchor() {
        let violations = check_rule(&GlossaryLinkFormat, "See the [glossary](/versions/v5/glossary).\n");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("no #anchor"));
    }

    #[test]
    fn test_heading_link() {
        let source = "# Guests\n\n## The [PassengerInfo](/versions/v5/glossary#PassengerInfo) object\n";
        let violations = check_rule(&GlossaryLinkFormat, source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].start_line, 3);
        let fix = violations[0].fix.as_ref().unwrap();
        assert_eq!(fix.line, 3);
        assert_eq!(fix.new_text, "](/versions/v5/glossary#passenger-info");
    }

    #[test]
    fn test_table_and_callout_lines() {
        let source = "| Field | Type |\n|---|---|\n| guest | [Guest](/versions/v5/glossary#Guest) |\n\n> 💡 Use [Rate](/versions/v5/glossary#Rate).\n";
        let lines: Vec<usize> = check_rule(&GlossaryLinkFormat, source)
            .iter()
            .map(|v| v.start_line)
            .collect();
        assert_eq!(lines, vec![3, 5]);
    }

    #[test]
    fn test_other_links_ignored() {
        assert!(check_rule(&GlossaryLinkFormat, "See [Bookings](/versions/v5/bookings#Create).\n").is_empty());
    }
}
