use crate::config::LintConfig;
use crate::parser::ast::{Document, Section, SectionKind, Span};
use crate::parser::{parse_bytes, parse_string};
#[cfg(feature = "cli")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::time::Duration;
use thiserror::Error;

/// Rule name of the synthetic violation for input that cannot be decoded or read
pub const UNREADABLE_INPUT: &str = "unreadable-input";
/// Rule name of the synthetic violation for validations that exceed their time limit
pub const VALIDATION_TIMED_OUT: &str = "validation-timed-out";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// Represents a fix that can be applied to resolve a violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    /// Line number where the fix should be applied (1-indexed)
    pub line: usize,
    /// The original text to replace (if None, the entire line is replaced)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_text: Option<String>,
    /// The replacement text
    pub new_text: String,
}

impl Fix {
    /// Create a fix that replaces text on a specific line
    pub fn replace(line: usize, old_text: &str, new_text: &str) -> Self {
        Self {
            line,
            old_text: Some(old_text.to_string()),
            new_text: new_text.to_string(),
        }
    }

    /// Create a fix that replaces an entire line
    pub fn replace_line(line: usize, new_text: &str) -> Self {
        Self {
            line,
            old_text: None,
            new_text: new_text.to_string(),
        }
    }
}

/// A section that failed a convention rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub rule: String,
    pub category: String,
    pub severity: Severity,
    pub start_line: usize,
    pub end_line: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Violation {
    pub fn new(rule: &str, category: &str, message: &str, severity: Severity) -> Self {
        Self {
            rule: rule.to_string(),
            category: category.to_string(),
            severity,
            start_line: 1,
            end_line: 1,
            message: message.to_string(),
            fix: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.start_line = span.start;
        self.end_line = span.end;
        self
    }

    pub fn with_line(self, line: usize) -> Self {
        self.with_span(Span::line(line))
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn span(&self) -> Span {
        Span::new(self.start_line, self.end_line)
    }

    /// The single violation reported for input that cannot be decoded or read.
    pub fn unreadable_input(message: &str, line: usize) -> Self {
        Self::new(UNREADABLE_INPUT, "input", message, Severity::Error).with_line(line)
    }

    /// The single violation reported when validation exceeds its time limit.
    pub fn timed_out(timeout: Duration) -> Self {
        Self::new(
            VALIDATION_TIMED_OUT,
            "input",
            &format!("validation did not finish within {}ms", timeout.as_millis()),
            Severity::Error,
        )
    }
}

/// Sort violations by start line, then rule name. The sort is stable, so
/// violations that tie keep catalog order.
pub fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| {
        a.start_line
            .cmp(&b.start_line)
            .then_with(|| a.rule.cmp(&b.rule))
    });
}

/// A machine-checkable documentation convention.
///
/// Rules are pure functions of a single section: they see no other section,
/// keep no state between calls, and never perform I/O.
pub trait ConventionRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn category(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn severity(&self) -> Severity;

    /// Section kinds this rule inspects
    fn applies_to(&self) -> &'static [SectionKind];

    fn check(&self, section: &Section) -> Vec<Violation>;

    /// Build a violation of this rule covering `span`
    fn violation(&self, message: &str, span: Span) -> Violation {
        Violation::new(self.name(), self.category(), message, self.severity()).with_span(span)
    }
}

/// The rule catalog is inconsistent and cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("rule '{0}' is registered more than once")]
    DuplicateRule(String),
}

/// Result of validating a single file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub violations: Vec<Violation>,
    pub ignored_count: usize,
}

/// Holds the rule catalog and runs it against documents
pub struct Linter {
    rules: Vec<Box<dyn ConventionRule>>,
    severity_overrides: HashMap<String, Severity>,
}

impl Linter {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            severity_overrides: HashMap::new(),
        }
    }

    /// Linter with the built-in catalog and default settings.
    ///
    /// # Panics
    ///
    /// Panics if the built-in catalog registers a rule name twice, which is a
    /// programming error caught by the test suite.
    pub fn with_default_rules() -> Self {
        match Self::with_config(None) {
            Ok(linter) => linter,
            Err(e) => panic!("built-in rule catalog is invalid: {}", e),
        }
    }

    /// Build the catalog, honoring rule toggles and settings from `config`.
    pub fn with_config(config: Option<&LintConfig>) -> Result<Self, CatalogError> {
        use crate::rules::{
            CalloutGlyphMismatch, CalloutIconValid, CodeBlockLanguage, CodeBlockUnclosed,
            EndpointPathFormat, ErrorTableColumns, ErrorTableStatusCodeFormat, GlossaryLinkFormat,
            GlossaryMissingLink, GlyphTable, JsonBlockFilenameFormat, JsonBlockHasCopyAttribute,
        };

        let default_config = LintConfig::default();
        let config = config.unwrap_or(&default_config);
        let glyphs = GlyphTable::from_config(&config.callouts);

        let candidates: Vec<Box<dyn ConventionRule>> = vec![
            // Code blocks
            Box::new(CodeBlockLanguage),
            Box::new(CodeBlockUnclosed),
            Box::new(JsonBlockHasCopyAttribute),
            Box::new(JsonBlockFilenameFormat),
            // Headings
            Box::new(EndpointPathFormat),
            // Tables
            Box::new(ErrorTableColumns),
            Box::new(ErrorTableStatusCodeFormat),
            // Callouts
            Box::new(CalloutIconValid::new(glyphs.clone())),
            Box::new(CalloutGlyphMismatch::from_config(glyphs, &config.callouts)),
            // Links
            Box::new(GlossaryLinkFormat),
            Box::new(GlossaryMissingLink::from_config(&config.glossary)),
        ];

        let mut linter = Self::new();
        for rule in candidates {
            if config.is_rule_enabled(rule.name()) {
                linter.add_rule(rule)?;
            }
        }
        for (name, rule_config) in &config.rules {
            if let Some(severity) = rule_config.severity {
                linter.set_severity(name, severity);
            }
        }

        Ok(linter)
    }

    /// Register a rule. Rule names must be unique within a catalog.
    pub fn add_rule(&mut self, rule: Box<dyn ConventionRule>) -> Result<(), CatalogError> {
        if self.rules.iter().any(|r| r.name() == rule.name()) {
            return Err(CatalogError::DuplicateRule(rule.name().to_string()));
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Report violations of `rule` with `severity` instead of the rule's own.
    pub fn set_severity(&mut self, rule: &str, severity: Severity) {
        self.severity_overrides.insert(rule.to_string(), severity);
    }

    /// Get a reference to all rules
    pub fn rules(&self) -> &[Box<dyn ConventionRule>] {
        &self.rules
    }

    /// Run every applicable rule against every section.
    ///
    /// The result is sorted by line, then rule name.
    pub fn lint(&self, document: &Document) -> Vec<Violation> {
        let mut violations = Vec::new();

        for section in &document.sections {
            let kind = section.kind();
            for rule in self.rules.iter().filter(|r| r.applies_to().contains(&kind)) {
                let mut found = rule.check(section);
                if let Some(&severity) = self.severity_overrides.get(rule.name()) {
                    for v in &mut found {
                        v.severity = severity;
                    }
                }
                violations.extend(found);
            }
        }

        sort_violations(&mut violations);
        violations
    }

    /// Segment and lint source text.
    pub fn lint_source(&self, source: &str) -> Vec<Violation> {
        self.lint(&parse_string(source))
    }

    /// Lint raw bytes. Input that is not UTF-8 yields a single
    /// `unreadable-input` violation.
    pub fn lint_bytes(&self, bytes: &[u8]) -> Vec<Violation> {
        match parse_bytes(bytes) {
            Ok(document) => self.lint(&document),
            Err(e) => vec![Violation::unreadable_input(&e.to_string(), e.line().unwrap_or(1))],
        }
    }

    /// Lint a file on disk. A file that cannot be read yields a single
    /// `unreadable-input` violation.
    pub fn lint_file(&self, path: &Path) -> Vec<Violation> {
        match std::fs::read(path) {
            Ok(bytes) => self.lint_bytes(&bytes),
            Err(e) => vec![Violation::unreadable_input(
                &format!("Failed to read file: {}", e),
                1,
            )],
        }
    }

    /// Lint source text honoring ignore comments.
    ///
    /// Returns the remaining violations (including warnings about malformed
    /// or unused ignore comments) and the number of ignored violations.
    pub fn lint_with_content(&self, content: &str) -> (Vec<Violation>, usize) {
        use crate::ignore::{IgnoreTracker, filter_violations, warnings_to_violations};

        let mut valid_rules = crate::docs::all_rule_names();
        valid_rules.extend(self.rules.iter().map(|r| r.name()));
        let (mut tracker, warnings) =
            IgnoreTracker::from_content_with_rules(content, Some(valid_rules.as_slice()));
        let violations = self.lint_source(content);
        let result = filter_violations(violations, &mut tracker);

        let mut violations = result.violations;
        violations.extend(warnings_to_violations(warnings));
        violations.extend(warnings_to_violations(result.unused_warnings));
        sort_violations(&mut violations);
        (violations, result.ignored_count)
    }

    /// Lint undecoded input honoring ignore comments.
    ///
    /// Input that is not UTF-8 yields a single `unreadable-input` violation
    /// and nothing is ignored.
    pub fn lint_input(&self, bytes: &[u8]) -> (Vec<Violation>, usize) {
        match std::str::from_utf8(bytes) {
            Ok(content) => self.lint_with_content(content),
            Err(_) => (self.lint_bytes(bytes), 0),
        }
    }

    /// Read and lint a file honoring ignore comments.
    pub fn lint_path(&self, path: &Path) -> FileReport {
        let (violations, ignored_count) = match std::fs::read(path) {
            Ok(bytes) => self.lint_input(&bytes),
            Err(e) => (
                vec![Violation::unreadable_input(
                    &format!("Failed to read file: {}", e),
                    1,
                )],
                0,
            ),
        };

        tracing::debug!(
            path = %path.display(),
            violations = violations.len(),
            ignored = ignored_count,
            "validated file"
        );

        FileReport {
            path: path.to_path_buf(),
            violations,
            ignored_count,
        }
    }

    /// Like [`lint_path`](Self::lint_path), but gives up after `timeout`.
    ///
    /// On timeout the file's partial results are discarded and a single
    /// `validation-timed-out` violation is reported instead. The worker
    /// thread is detached and finishes on its own.
    pub fn lint_path_with_timeout(self: &Arc<Self>, path: &Path, timeout: Duration) -> FileReport {
        let (tx, rx) = mpsc::channel();
        let linter = Arc::clone(self);
        let worker_path = path.to_path_buf();

        std::thread::spawn(move || {
            // the receiver may already be gone after a timeout
            let _ = tx.send(linter.lint_path(&worker_path));
        });

        match rx.recv_timeout(timeout) {
            Ok(report) => report,
            Err(_) => {
                tracing::warn!(path = %path.display(), timeout_ms = timeout.as_millis() as u64, "validation timed out");
                FileReport {
                    path: path.to_path_buf(),
                    violations: vec![Violation::timed_out(timeout)],
                    ignored_count: 0,
                }
            }
        }
    }

    /// Lint many files. Each file is isolated: one unreadable file never
    /// affects the others.
    ///
    /// Uses parallel iteration when the cli feature is enabled (via rayon)
    #[cfg(feature = "cli")]
    pub fn lint_paths(self: &Arc<Self>, paths: &[PathBuf], timeout: Option<Duration>) -> Vec<FileReport> {
        paths
            .par_iter()
            .map(|path| match timeout {
                Some(t) => self.lint_path_with_timeout(path, t),
                None => self.lint_path(path),
            })
            .collect()
    }

    /// Lint many files (sequential version)
    #[cfg(not(feature = "cli"))]
    pub fn lint_paths(self: &Arc<Self>, paths: &[PathBuf], timeout: Option<Duration>) -> Vec<FileReport> {
        paths
            .iter()
            .map(|path| match timeout {
                Some(t) => self.lint_path_with_timeout(path, t),
                None => self.lint_path(path),
            })
            .collect()
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFails(&'static str);

    impl ConventionRule for AlwaysFails {
        fn name(&self) -> &'static str {
            self.0
        }
        fn category(&self) -> &'static str {
            "test"
        }
        fn description(&self) -> &'static str {
            "fails on every heading"
        }
        fn severity(&self) -> Severity {
            Severity::Warning
        }
        fn applies_to(&self) -> &'static [SectionKind] {
            &[SectionKind::Heading]
        }
        fn check(&self, section: &Section) -> Vec<Violation> {
            vec![self.violation("always", section.span())]
        }
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let mut linter = Linter::new();
        linter.add_rule(Box::new(AlwaysFails("dup"))).unwrap();
        let err = linter.add_rule(Box::new(AlwaysFails("dup"))).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateRule("dup".to_string()));
        assert_eq!(linter.rules().len(), 1);
    }

    #[test]
    fn test_default_catalog_is_valid() {
        let linter = Linter::with_config(None).unwrap();
        assert_eq!(linter.rules().len(), 11);
    }

    #[test]
    fn test_rule_only_sees_selected_kind() {
        let mut linter = Linter::new();
        linter.add_rule(Box::new(AlwaysFails("headings"))).unwrap();
        let violations = linter.lint_source("# One\n\ntext\n\n## Two\n");
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].start_line, 1);
        assert_eq!(violations[1].start_line, 5);
    }

    #[test]
    fn test_sorted_by_line_then_rule() {
        let mut linter = Linter::new();
        linter.add_rule(Box::new(AlwaysFails("zeta"))).unwrap();
        linter.add_rule(Box::new(AlwaysFails("alpha"))).unwrap();
        let violations = linter.lint_source("# One\n## Two\n");
        let order: Vec<_> = violations
            .iter()
            .map(|v| (v.start_line, v.rule.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "alpha"), (1, "zeta"), (2, "alpha"), (2, "zeta")]);
    }

    #[test]
    fn test_severity_override() {
        let mut linter = Linter::new();
        linter.add_rule(Box::new(AlwaysFails("soft"))).unwrap();
        linter.set_severity("soft", Severity::Error);
        let violations = linter.lint_source("# One\n");
        assert_eq!(violations[0].severity, Severity::Error);
    }

    #[test]
    fn test_unreadable_bytes() {
        let linter = Linter::with_default_rules();
        let violations = linter.lint_bytes(b"# Title\n\xc3\x28");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, UNREADABLE_INPUT);
        assert_eq!(violations[0].severity, Severity::Error);
        assert_eq!(violations[0].start_line, 2);
    }

    #[test]
    fn test_lint_input_decodes_or_reports() {
        let linter = Linter::with_default_rules();
        let (violations, ignored) = linter.lint_input(b"# Bookings\n\nCaf\xe9 rates\n");
        assert_eq!(ignored, 0);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, UNREADABLE_INPUT);
        assert_eq!(violations[0].start_line, 3);

        let (violations, _) = linter.lint_input("# Bookings\n".as_bytes());
        assert!(violations.is_empty());
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let linter = Linter::with_default_rules();
        let violations = linter.lint_file(Path::new("/nonexistent/page.mdx"));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, UNREADABLE_INPUT);
    }

    #[test]
    fn test_violation_serialization() {
        let v = Violation::new("r", "c", "m", Severity::Warning).with_span(Span::new(3, 5));
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["rule"], "r");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["startLine"], 3);
        assert_eq!(json["endLine"], 5);
        assert_eq!(json["message"], "m");
        assert!(json.get("fix").is_none());
    }

    #[test]
    fn test_generous_timeout_returns_result() {
        let linter = Arc::new(Linter::with_default_rules());
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "# Title\n").unwrap();
        let report = linter.lint_path_with_timeout(file.path(), Duration::from_secs(30));
        assert!(report.violations.is_empty());
    }
}
