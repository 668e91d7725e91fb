use super::is_error_table;
use crate::docs::RuleDoc;
use crate::linter::{ConventionRule, Severity, Violation};
use crate::parser::ast::{Section, SectionKind, Span};

/// Rule documentation
pub static DOC: RuleDoc = RuleDoc {
    name: "error-table-status-code-format",
    category: "table",
    description: "Requires error table status codes to be three-digit HTTP statuses",
    severity: "error",
    why: r#"Clients branch on the numeric status code. Writing `4xx`, `Bad Request`
or a code outside 100-599 in the Status Code column makes the table
useless for that purpose."#,
    bad_example: r#"| Status Code | Error | Reason |
|---|---|---|
| 4xx | [Validation Error] | Failed validation |"#,
    good_example: r#"| Status Code | Error | Reason |
|---|---|---|
| 400 | [Validation Error] | Failed validation |"#,
    references: &["https://www.rfc-editor.org/rfc/rfc9110#section-15"],
};

/// Check status codes in error tables
pub struct ErrorTableStatusCodeFormat;

impl ErrorTableStatusCodeFormat {
    /// Status cell without code span or emphasis markers
    fn strip_markers(cell: &str) -> &str {
        cell.trim_matches(|c| c == '`' || c == '*' || c == '_').trim()
    }

    fn is_valid_status(code: &str) -> bool {
        code.len() == 3
            && code.bytes().all(|b| b.is_ascii_digit())
            && code.parse::<u16>().is_ok_and(|n| (100..=599).contains(&n))
    }
}

impl ConventionRule for ErrorTableStatusCodeFormat {
    fn name(&self) -> &'static str {
        "error-table-status-code-format"
    }

    fn category(&self) -> &'static str {
        "table"
    }

    fn description(&self) -> &'static str {
        "Requires error table status codes to be three-digit HTTP statuses"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn applies_to(&self) -> &'static [SectionKind] {
        &[SectionKind::Table]
    }

    fn check(&self, section: &Section) -> Vec<Violation> {
        let Section::Table(table) = section else {
            return Vec::new();
        };
        if !is_error_table(table) {
            return Vec::new();
        }

        table
            .rows
            .iter()
            .filter_map(|row| {
                let cell = row.cell(0);
                // empty cells are reported by error-table-columns
                if cell.is_empty() {
                    return None;
                }
                let code = Self::strip_markers(cell);
                if Self::is_valid_status(code) {
                    return None;
                }
                Some(self.violation(
                    &format!("'{}' is not a three-digit HTTP status code (100-599)", cell),
                    Span::line(row.line),
                ))
            })
            .collect()
    }
}
