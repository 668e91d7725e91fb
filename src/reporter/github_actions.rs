use super::sorted;
use crate::linter::{Severity, Violation};
use std::path::Path;

pub(crate) fn report(violations: &[Violation], path: &Path) {
    for line in format(violations, path) {
        println!("{}", line);
    }
}

pub(crate) fn format(violations: &[Violation], path: &Path) -> Vec<String> {
    let file = escape_property(&path.display().to_string());

    sorted(violations)
        .iter()
        .map(|violation| {
            let level = match violation.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            let title = escape_property(&format!("{}/{}", violation.category, violation.rule));
            format!(
                "::{} file={},line={},endLine={},title={}::{}",
                level,
                file,
                violation.start_line,
                violation.end_line,
                title,
                escape_data(&violation.message)
            )
        })
        .collect()
}

/// Workflow command message escaping
fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Workflow command property escaping
fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Span;

    #[test]
    fn test_error_format() {
        let violations = vec![
            Violation::new(
                "error-table-status-code-format",
                "table",
                "'abc' is not a three-digit HTTP status code (100-599)",
                Severity::Error,
            )
            .with_line(12),
        ];
        let lines = format(&violations, Path::new("pages/bookings.mdx"));
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            "::error file=pages/bookings.mdx,line=12,endLine=12,title=table/error-table-status-code-format::'abc' is not a three-digit HTTP status code (100-599)"
        );
    }

    #[test]
    fn test_warning_span() {
        let violations = vec![
            Violation::new("callout-glyph-mismatch", "callout", "mismatch", Severity::Warning)
                .with_span(Span::new(4, 6)),
        ];
        let lines = format(&violations, Path::new("a.mdx"));
        assert_eq!(
            lines[0],
            "::warning file=a.mdx,line=4,endLine=6,title=callout/callout-glyph-mismatch::mismatch"
        );
    }

    #[test]
    fn test_message_escaping() {
        let violations = vec![Violation::new("r", "c", "100% broken\nreally", Severity::Error)];
        let lines = format(&violations, Path::new("a,b.md"));
        assert_eq!(
            lines[0],
            "::error file=a%2Cb.md,line=1,endLine=1,title=c/r::100%25 broken%0Areally"
        );
    }

    #[test]
    fn test_sorted_by_line() {
        let violations = vec![
            Violation::new("r1", "cat", "third", Severity::Error).with_line(10),
            Violation::new("r2", "cat", "first", Severity::Warning).with_line(1),
            Violation::new("r3", "cat", "second", Severity::Error).with_line(1),
        ];
        let lines = format(&violations, Path::new("a.md"));
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("::first"));
        assert!(lines[1].ends_with("::second"));
        assert!(lines[2].ends_with("::third"));
    }

    #[test]
    fn test_empty() {
        assert!(format(&[], Path::new("a.md")).is_empty());
    }
}
