use super::is_error_table;
use crate::docs::RuleDoc;
use crate::linter::{ConventionRule, Severity, Violation};
use crate::parser::ast::{Section, SectionKind, Span};

/// Rule documentation
pub static DOC: RuleDoc = RuleDoc {
    name: "error-table-columns",
    category: "table",
    description: "Requires every error table row to fill Status Code, Error and Reason",
    severity: "error",
    why: r#"Error tables list what an endpoint can return. A row without a
status code, an error name or a reason leaves integrators guessing how to
handle the response. Reason Code is optional and may be left empty."#,
    bad_example: r#"| Status Code | Error | Reason |
|---|---|---|
| 409 | [Conflict] | |"#,
    good_example: r#"| Status Code | Error | Reason |
|---|---|---|
| 409 | [Conflict] | The rate was booked by someone else |"#,
    references: &[],
};

/// Check that error table rows are complete
pub struct ErrorTableColumns;

const COLUMN_NAMES: [&str; 3] = ["Status Code", "Error", "Reason"];

impl ConventionRule for ErrorTableColumns {
    fn name(&self) -> &'static str {
        "error-table-columns"
    }

    fn category(&self) -> &'static str {
        "table"
    }

    fn description(&self) -> &'static str {
        "Requires every error table row to fill Status Code, Error and Reason"
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

        let columns = table.header.cells.len();
        let mut violations = Vec::new();
        for row in &table.rows {
            let missing: Vec<&str> = COLUMN_NAMES
                .iter()
                .enumerate()
                .filter(|(i, _)| row.cell(*i).is_empty())
                .map(|(_, name)| *name)
                .collect();

            if !missing.is_empty() {
                violations.push(self.violation(
                    &format!("error table row is missing {}", missing.join(", ")),
                    Span::line(row.line),
                ));
            } else if row.cells.len() > columns {
                violations.push(self.violation(
                    &format!(
                        "error table row has {} cells but the header has {}",
                        row.cells.len(),
                        columns
                    ),
                    Span::line(row.line),
                ));
            }
        }
        violations
    }
}
