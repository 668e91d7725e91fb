use super::{count_by_severity, sorted};
use crate::config::{Color, ColorConfig};
use crate::linter::{Severity, Violation};
use colored::{ColoredString, Colorize};
use std::path::Path;

pub(crate) fn report(violations: &[Violation], path: &Path, colors: &ColorConfig, ignored_count: usize) {
    for violation in sorted(violations) {
        println!("{}", format_line(&violation, path, colors));
    }

    if let Some(summary) = summary(violations, ignored_count) {
        println!();
        println!("{}", summary);
    }
}

/// `path:line` or `path:start-end` for multi-line violations
fn location(violation: &Violation, path: &Path) -> String {
    format!("{}:{}", path.display(), violation.span())
}

/// `Found N error(s), M warning(s), K ignored`, or None when there is nothing to say
fn summary(violations: &[Violation], ignored_count: usize) -> Option<String> {
    let (error_count, warning_count) = count_by_severity(violations);

    let mut parts = Vec::new();
    if error_count > 0 {
        parts.push(format!("{} error(s)", error_count));
    }
    if warning_count > 0 {
        parts.push(format!("{} warning(s)", warning_count));
    }
    if ignored_count > 0 {
        parts.push(format!("{} ignored", ignored_count));
    }

    if parts.is_empty() {
        None
    } else {
        Some(format!("Found {}", parts.join(", ")))
    }
}

/// `path:line: severity[category/rule]: message`
fn format_line(violation: &Violation, path: &Path, colors: &ColorConfig) -> String {
    let (severity_label, color) = match violation.severity {
        Severity::Error => ("error", colors.error),
        Severity::Warning => ("warning", colors.warning),
    };

    let severity_str = apply_color(
        &format!("{}[{}/{}]", severity_label, violation.category, violation.rule),
        color,
    )
    .bold();

    format!("{}: {}: {}", location(violation, path), severity_str, violation.message)
}

/// Apply a color to a string
fn apply_color(s: &str, color: Color) -> ColoredString {
    match color {
        Color::Black => s.black(),
        Color::Red => s.red(),
        Color::Green => s.green(),
        Color::Yellow => s.yellow(),
        Color::Blue => s.blue(),
        Color::Magenta => s.magenta(),
        Color::Cyan => s.cyan(),
        Color::White => s.white(),
        Color::BrightBlack => s.bright_black(),
        Color::BrightRed => s.bright_red(),
        Color::BrightGreen => s.bright_green(),
        Color::BrightYellow => s.bright_yellow(),
        Color::BrightBlue => s.bright_blue(),
        Color::BrightMagenta => s.bright_magenta(),
        Color::BrightCyan => s.bright_cyan(),
        Color::BrightWhite => s.bright_white(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Span;

    fn make_violation(rule: &str, category: &str, message: &str, severity: Severity, span: Span) -> Violation {
        Violation::new(rule, category, message, severity).with_span(span)
    }

    fn plain_line(violation: &Violation, path: &Path) -> String {
        colored::control::set_override(false);
        format_line(violation, path, &ColorConfig::default())
    }

    #[test]
    fn test_error_format_line() {
        let violation = make_violation(
            "json-block-has-copy-attribute",
            "code-block",
            "payload code block with a filename is missing the copy attribute",
            Severity::Error,
            Span::line(10),
        );
        let path = Path::new("pages/bookings.mdx");
        assert_eq!(
            plain_line(&violation, path),
            "pages/bookings.mdx:10: error[code-block/json-block-has-copy-attribute]: payload code block with a filename is missing the copy attribute"
        );
    }

    #[test]
    fn test_warning_multi_line() {
        let violation = make_violation(
            "callout-glyph-mismatch",
            "callout",
            "glyph mismatch",
            Severity::Warning,
            Span::new(3, 5),
        );
        let path = Path::new("bookings.mdx");
        assert_eq!(
            plain_line(&violation, path),
            "bookings.mdx:3-5: warning[callout/callout-glyph-mismatch]: glyph mismatch"
        );
    }

    #[test]
    fn test_summary() {
        let violations = vec![
            make_violation("a", "c", "m", Severity::Error, Span::line(1)),
            make_violation("b", "c", "m", Severity::Warning, Span::line(2)),
            make_violation("c", "c", "m", Severity::Warning, Span::line(3)),
        ];
        assert_eq!(
            summary(&violations, 1).as_deref(),
            Some("Found 1 error(s), 2 warning(s), 1 ignored")
        );
        assert_eq!(summary(&[], 0), None);
        assert_eq!(summary(&[], 2).as_deref(), Some("Found 2 ignored"));
    }
}
