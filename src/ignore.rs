//! Ignore comment support for apidocs-lint
//!
//! This module provides support for inline disable comments that ignore
//! violations on specific lines.
//!
//! # Comment Format
//!
//! ```markdown
//! <!-- apidocs-lint:disable glossary-missing-link product name, not a type -->
//! Book rooms with the HotelBeds connector.
//! ```
//!
//! MDX pages may use the JSX comment form instead:
//!
//! ```mdx
//! {/* apidocs-lint:disable endpoint-path-format legacy path kept for reference */}
//! ## GET /v4/Bookings
//! ```
//!
//! - `disable`: Ignores the rule on the next line only
//! - `rule-name`: Required. The name of the rule to ignore
//! - `reason`: Required. A reason explaining why the rule is ignored
//!
//! Comments inside fenced code blocks are treated as code, not directives.

use std::collections::{HashMap, HashSet};

use crate::linter::{Severity, Violation};
use crate::parser::lexer::{LineKind, classify, is_closing_fence};

const DIRECTIVE: &str = "apidocs-lint:disable";

/// A warning generated from parsing ignore comments
#[derive(Debug, Clone)]
pub struct IgnoreWarning {
    /// Line number where the warning occurred
    pub line: usize,
    /// Warning message
    pub message: String,
}

/// Tracks ignored rules per line
#[derive(Debug, Default)]
pub struct IgnoreTracker {
    /// Map from target line to ignored rule names
    ignored_lines: HashMap<usize, HashSet<String>>,
    /// (target line, rule) -> line of the comment that declared it
    comment_lines: HashMap<(usize, String), usize>,
    /// (target line, rule) pairs that suppressed at least one violation
    used: HashSet<(usize, String)>,
}

impl IgnoreTracker {
    /// Create a new empty ignore tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a rule is ignored on a specific line
    pub fn is_ignored(&self, rule: &str, line: usize) -> bool {
        self.ignored_lines
            .get(&line)
            .map(|rules| rules.contains(rule))
            .unwrap_or(false)
    }

    /// Build an ignore tracker from content, returning any warnings
    pub fn from_content(content: &str) -> (Self, Vec<IgnoreWarning>) {
        Self::from_content_with_rules(content, None)
    }

    /// Build an ignore tracker, warning about rule names not in `valid_rules`
    pub fn from_content_with_rules(content: &str, valid_rules: Option<&[&str]>) -> (Self, Vec<IgnoreWarning>) {
        let mut tracker = Self::new();
        let mut warnings = Vec::new();
        let mut open_fence: Option<(char, usize)> = None;

        for (line_number, line) in content.lines().enumerate() {
            let line_number = line_number + 1; // Convert to 1-indexed

            if let Some((marker, len)) = open_fence {
                if is_closing_fence(line, marker, len) {
                    open_fence = None;
                }
                continue;
            }
            if let LineKind::Fence { marker, len, .. } = classify(line) {
                open_fence = Some((marker, len));
                continue;
            }

            match parse_disable_comment(line, line_number) {
                Some(Ok((rule_name, target_line))) => {
                    if let Some(valid) = valid_rules
                        && !valid.contains(&rule_name.as_str())
                    {
                        warnings.push(IgnoreWarning {
                            line: line_number,
                            message: format!("{} names unknown rule '{}'", DIRECTIVE, rule_name),
                        });
                        continue;
                    }
                    tracker.add(&rule_name, target_line, line_number);
                }
                Some(Err(warning)) => warnings.push(warning),
                None => {}
            }
        }

        (tracker, warnings)
    }

    fn add(&mut self, rule: &str, target_line: usize, comment_line: usize) {
        self.ignored_lines
            .entry(target_line)
            .or_default()
            .insert(rule.to_string());
        self.comment_lines
            .insert((target_line, rule.to_string()), comment_line);
    }

    /// Record that the ignore for `rule` on `line` suppressed a violation
    fn mark_used(&mut self, rule: &str, line: usize) {
        self.used.insert((line, rule.to_string()));
    }

    /// Warnings for ignore comments that suppressed nothing, in line order
    pub fn unused_warnings(&self) -> Vec<IgnoreWarning> {
        let mut warnings: Vec<IgnoreWarning> = self
            .comment_lines
            .iter()
            .filter(|(key, _)| !self.used.contains(*key))
            .map(|((_, rule), &comment_line)| IgnoreWarning {
                line: comment_line,
                message: format!("unused {} comment for '{}'", DIRECTIVE, rule),
            })
            .collect();
        warnings.sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.message.cmp(&b.message)));
        warnings
    }

    /// Add an ignore rule for a specific line
    #[cfg(test)]
    pub fn add_ignore(&mut self, rule: &str, line: usize) {
        self.add(rule, line, line.saturating_sub(1));
    }
}

/// Text of an HTML (`<!-- -->`) or MDX (`{/* */}`) comment spanning the line
fn comment_body(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if let Some(inner) = trimmed.strip_prefix("<!--") {
        return Some(inner.strip_suffix("-->").unwrap_or(inner).trim());
    }
    if let Some(inner) = trimmed.strip_prefix("{/*") {
        return Some(inner.strip_suffix("*/}").unwrap_or(inner).trim());
    }
    None
}

/// Parse a disable comment from a line
///
/// Returns:
/// - `None` if the line is not a disable comment
/// - `Some(Ok((rule_name, target_line)))` if valid
/// - `Some(Err(warning))` if the comment is malformed
fn parse_disable_comment(
    line: &str,
    line_number: usize,
) -> Option<Result<(String, usize), IgnoreWarning>> {
    let comment = comment_body(line)?;

    // Check for apidocs-lint:disable prefix
    let rest = comment.strip_prefix(DIRECTIVE)?;
    let rest = rest.trim();

    // Parse rule name and reason
    let parts: Vec<&str> = rest.splitn(2, |c: char| c.is_whitespace()).collect();

    // Check for missing rule name
    if parts.is_empty() || parts[0].is_empty() {
        return Some(Err(IgnoreWarning {
            line: line_number,
            message: format!("{} requires a rule name", DIRECTIVE),
        }));
    }

    let rule_name = parts[0].to_string();

    // Check for missing reason
    if parts.len() < 2 || parts[1].trim().is_empty() {
        return Some(Err(IgnoreWarning {
            line: line_number,
            message: format!("{} {} requires a reason", DIRECTIVE, rule_name),
        }));
    }

    // Return the rule name and the target line (next line)
    Some(Ok((rule_name, line_number + 1)))
}

/// Result of filtering violations with an ignore tracker
#[derive(Debug)]
pub struct FilterResult {
    /// Violations that were not ignored
    pub violations: Vec<Violation>,
    /// Number of violations that were ignored
    pub ignored_count: usize,
    /// Ignore comments that suppressed nothing
    pub unused_warnings: Vec<IgnoreWarning>,
}

/// Filter violations using an ignore tracker, returning remaining violations,
/// the ignored count and warnings for unused ignore comments
pub fn filter_violations(violations: Vec<Violation>, tracker: &mut IgnoreTracker) -> FilterResult {
    let mut remaining = Vec::new();
    let mut ignored_count = 0;

    for violation in violations {
        if tracker.is_ignored(&violation.rule, violation.start_line) {
            tracker.mark_used(&violation.rule, violation.start_line);
            ignored_count += 1;
            continue;
        }
        remaining.push(violation);
    }

    FilterResult {
        violations: remaining,
        ignored_count,
        unused_warnings: tracker.unused_warnings(),
    }
}

/// Convert ignore warnings to violations
pub fn warnings_to_violations(warnings: Vec<IgnoreWarning>) -> Vec<Violation> {
    warnings
        .into_iter()
        .map(|warning| {
            Violation::new("ignore-comment", "ignore", &warning.message, Severity::Warning)
                .with_line(warning.line)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_html_comment() {
        let result = parse_disable_comment(
            "<!-- apidocs-lint:disable glossary-missing-link product name -->",
            5,
        );
        assert!(result.is_some());
        let (rule, line) = result.unwrap().unwrap();
        assert_eq!(rule, "glossary-missing-link");
        assert_eq!(line, 6); // Next line
    }

    #[test]
    fn test_parse_mdx_comment() {
        let result = parse_disable_comment(
            "{/* apidocs-lint:disable endpoint-path-format legacy v4 path */}",
            2,
        );
        let (rule, line) = result.unwrap().unwrap();
        assert_eq!(rule, "endpoint-path-format");
        assert_eq!(line, 3);
    }

    #[test]
    fn test_parse_disable_comment_with_japanese_reason() {
        let result = parse_disable_comment(
            "<!-- apidocs-lint:disable callout-glyph-mismatch 意図的な表現 -->",
            5,
        );
        let (rule, line) = result.unwrap().unwrap();
        assert_eq!(rule, "callout-glyph-mismatch");
        assert_eq!(line, 6);
    }

    #[test]
    fn test_parse_missing_rule_name() {
        let result = parse_disable_comment("<!-- apidocs-lint:disable -->", 5);
        assert!(result.is_some());
        let warning = result.unwrap().unwrap_err();
        assert_eq!(warning.line, 5);
        assert!(warning
            .message
            .contains("apidocs-lint:disable requires a rule name"));
    }

    #[test]
    fn test_parse_missing_reason() {
        let result = parse_disable_comment("<!-- apidocs-lint:disable code-block-language -->", 5);
        let warning = result.unwrap().unwrap_err();
        assert_eq!(warning.line, 5);
        assert!(warning
            .message
            .contains("apidocs-lint:disable code-block-language requires a reason"));
    }

    #[test]
    fn test_parse_not_a_comment() {
        assert!(parse_disable_comment("apidocs-lint:disable x reason", 5).is_none());
        assert!(parse_disable_comment("<!-- a regular comment -->", 5).is_none());
    }

    #[test]
    fn test_ignore_tracker_is_ignored() {
        let mut tracker = IgnoreTracker::new();
        tracker.add_ignore("glossary-missing-link", 10);

        assert!(tracker.is_ignored("glossary-missing-link", 10));
        assert!(!tracker.is_ignored("glossary-missing-link", 11));
        assert!(!tracker.is_ignored("other-rule", 10));
    }

    #[test]
    fn test_only_affects_next_line() {
        let content = r#"
<!-- apidocs-lint:disable glossary-missing-link product name -->
Book rooms with the HotelBeds connector.
Book rooms with the HotelBeds connector.
"#;
        let (tracker, warnings) = IgnoreTracker::from_content(content);
        assert!(warnings.is_empty());
        assert!(tracker.is_ignored("glossary-missing-link", 3)); // Line after comment
        assert!(!tracker.is_ignored("glossary-missing-link", 4)); // Second occurrence
    }

    #[test]
    fn test_unknown_rule_warning() {
        let content = "<!-- apidocs-lint:disable no-such-rule because -->\ntext\n";
        let (tracker, warnings) =
            IgnoreTracker::from_content_with_rules(content, Some(&["code-block-language"][..]));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("unknown rule 'no-such-rule'"));
        assert!(!tracker.is_ignored("no-such-rule", 2));
    }

    #[test]
    fn test_comment_inside_code_block_ignored() {
        let content = "```md\n<!-- apidocs-lint:disable code-block-language -->\n```\n";
        let (tracker, warnings) = IgnoreTracker::from_content(content);
        assert!(warnings.is_empty());
        assert!(!tracker.is_ignored("code-block-language", 3));
    }

    #[test]
    fn test_filter_violations() {
        let mut tracker = IgnoreTracker::new();
        tracker.add_ignore("glossary-missing-link", 5);

        let violations = vec![
            Violation::new("glossary-missing-link", "link", "test", Severity::Warning).with_line(5),
            Violation::new("glossary-missing-link", "link", "test", Severity::Warning).with_line(6),
            Violation::new("other-rule", "link", "test", Severity::Warning).with_line(5),
        ];

        let result = filter_violations(violations, &mut tracker);
        assert_eq!(result.violations.len(), 2);
        assert_eq!(result.ignored_count, 1);
        assert!(result.unused_warnings.is_empty());
        assert!(result
            .violations
            .iter()
            .all(|v| !(v.rule == "glossary-missing-link" && v.start_line == 5)));
    }

    #[test]
    fn test_unused_ignore_reported() {
        let content = "<!-- apidocs-lint:disable code-block-language not needed -->\nplain text\n";
        let (mut tracker, warnings) = IgnoreTracker::from_content(content);
        assert!(warnings.is_empty());

        let result = filter_violations(Vec::new(), &mut tracker);
        assert_eq!(result.unused_warnings.len(), 1);
        assert_eq!(result.unused_warnings[0].line, 1);
        assert!(result.unused_warnings[0].message.contains("unused"));
    }

    #[test]
    fn test_warnings_to_violations() {
        let warnings = vec![IgnoreWarning {
            line: 5,
            message: "test warning".to_string(),
        }];

        let violations = warnings_to_violations(warnings);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "ignore-comment");
        assert_eq!(violations[0].category, "ignore");
        assert_eq!(violations[0].message, "test warning");
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(violations[0].start_line, 5);
    }
}
