//! Convention checker for markdown/MDX API documentation pages
//!
//! Pages are segmented into sections by [`parser`] and every section is run
//! through the catalog of [`linter::ConventionRule`]s that apply to its kind.
//!
//! ```
//! let violations = apidocs_lint::validate(
//!     "```json filename=\"POST /versions/v5/bookings\"\n{}\n```\n",
//! );
//! assert_eq!(violations.len(), 1);
//! assert_eq!(violations[0].rule, "json-block-has-copy-attribute");
//! ```

pub mod config;
pub mod docs;
pub mod ignore;
pub mod linter;
#[cfg(feature = "cli")]
pub mod reporter;
pub mod rules;

pub use apidocs_lint_parser as parser;

pub use config::{Color, ColorConfig, ColorMode, LintConfig, ValidationError};
pub use linter::{CatalogError, ConventionRule, FileReport, Fix, Linter, Severity, Violation};
pub use parser::parse_string;
#[cfg(feature = "cli")]
pub use reporter::{OutputFormat, Reporter};
pub use rules::RULE_CATEGORIES;

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static DEFAULT_LINTER: LazyLock<Linter> = LazyLock::new(Linter::with_default_rules);

/// Validate page text against the built-in catalog.
///
/// Violations are sorted by line, then rule name. Ignore comments are not
/// honored here; use [`Linter::lint_with_content`] for that.
pub fn validate(source: &str) -> Vec<Violation> {
    DEFAULT_LINTER.lint_source(source)
}

/// Validate raw page bytes. Input that is not UTF-8 yields a single
/// `unreadable-input` violation.
pub fn validate_bytes(bytes: &[u8]) -> Vec<Violation> {
    DEFAULT_LINTER.lint_bytes(bytes)
}

/// Apply fixes to content in memory.
/// Returns the new content and the number of fixes applied.
pub fn apply_fixes_to_content(content: &str, fixes: &[&Fix]) -> (String, usize) {
    // Each line keeps its own terminator so CRLF files stay CRLF
    let (mut lines, endings): (Vec<String>, Vec<&str>) = content
        .split_inclusive('\n')
        .map(|line| {
            let body = line
                .strip_suffix("\r\n")
                .or_else(|| line.strip_suffix('\n'))
                .unwrap_or(line);
            (body.to_string(), &line[body.len()..])
        })
        .unzip();

    // Apply bottom-up so earlier fixes never shift later ones
    let mut fixes: Vec<&Fix> = fixes.to_vec();
    fixes.sort_by(|a, b| b.line.cmp(&a.line));

    let mut fix_count = 0;

    for fix in fixes {
        if fix.line == 0 || fix.line > lines.len() {
            continue;
        }

        let line_idx = fix.line - 1;

        if let Some(old_text) = &fix.old_text {
            // Replace specific text on the line
            if lines[line_idx].contains(old_text.as_str()) {
                lines[line_idx] = lines[line_idx].replacen(old_text.as_str(), &fix.new_text, 1);
                fix_count += 1;
            }
        } else if lines[line_idx] != fix.new_text {
            // Replace the entire line
            lines[line_idx] = fix.new_text.clone();
            fix_count += 1;
        }
    }

    let fixed: String = lines
        .iter()
        .zip(endings)
        .map(|(line, ending)| format!("{}{}", line, ending))
        .collect();
    (fixed, fix_count)
}

/// Apply fixes to a file
/// Returns the number of fixes applied
pub fn apply_fixes(path: &Path, violations: &[Violation]) -> std::io::Result<usize> {
    let content = fs::read_to_string(path)?;
    let fixes: Vec<&Fix> = violations.iter().filter_map(|v| v.fix.as_ref()).collect();
    let (fixed, fix_count) = apply_fixes_to_content(&content, &fixes);

    if fix_count > 0 {
        fs::write(path, fixed)?;
    }

    Ok(fix_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sorted_and_repeatable() {
        let source = "> 💣 Optional step.\n\n```\nls\n```\n\n## get /bookings\n";
        let first = validate(source);
        assert_eq!(first, validate(source));
        let lines: Vec<usize> = first.iter().map(|v| v.start_line).collect();
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_validate_bytes_invalid_utf8() {
        let violations = validate_bytes(b"# Title\n\xff\xfe\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, linter::UNREADABLE_INPUT);
    }

    #[test]
    fn test_apply_fixes_to_content() {
        let content = "```json filename=\"POST /versions/v5/bookings\"\n{}\n```\n\nSee [PassengerInfo](/versions/v5/glossary#PassengerInfo).\n";
        let violations = validate(content);
        let fixes: Vec<&Fix> = violations.iter().filter_map(|v| v.fix.as_ref()).collect();
        assert_eq!(fixes.len(), 2);

        let (fixed, count) = apply_fixes_to_content(content, &fixes);
        assert_eq!(count, 2);
        assert!(fixed.starts_with("```json filename=\"POST /versions/v5/bookings\" copy\n"));
        assert!(fixed.contains("(/versions/v5/glossary#passenger-info)"));
        assert!(fixed.ends_with(".\n"));
        assert!(validate(&fixed).is_empty());
    }

    #[test]
    fn test_apply_fixes_keeps_crlf() {
        let content = "# Guests\r\n\r\nSee [PassengerInfo](/versions/v5/glossary#PassengerInfo).\r\nDone.";
        let violations = validate(content);
        let fixes: Vec<&Fix> = violations.iter().filter_map(|v| v.fix.as_ref()).collect();

        let (fixed, count) = apply_fixes_to_content(content, &fixes);
        assert_eq!(count, 1);
        assert_eq!(
            fixed,
            "# Guests\r\n\r\nSee [PassengerInfo](/versions/v5/glossary#passenger-info).\r\nDone."
        );
    }

    #[test]
    fn test_apply_fixes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.mdx");
        fs::write(&path, "```ts filename=\"booking.ts\"\ntype Booking = {}\n```\n").unwrap();

        let violations = validate(&fs::read_to_string(&path).unwrap());
        assert_eq!(apply_fixes(&path, &violations).unwrap(), 1);
        assert!(validate(&fs::read_to_string(&path).unwrap()).is_empty());
    }
}
