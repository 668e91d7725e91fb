mod errorformat;
mod github_actions;
mod json;

use crate::config::ColorConfig;
use crate::linter::{Severity, Violation, sort_violations};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    ErrorFormat,
    Json,
    GithubActions,
}

pub struct Reporter {
    format: OutputFormat,
    colors: ColorConfig,
}

impl Reporter {
    pub fn with_colors(format: OutputFormat, colors: ColorConfig) -> Self {
        Self { format, colors }
    }

    pub fn report(&self, violations: &[Violation], path: &Path, ignored_count: usize) {
        match self.format {
            OutputFormat::ErrorFormat => {
                errorformat::report(violations, path, &self.colors, ignored_count)
            }
            OutputFormat::Json => json::report(violations, path, ignored_count),
            OutputFormat::GithubActions => github_actions::report(violations, path),
        }
    }
}

/// Violations in report order
fn sorted(violations: &[Violation]) -> Vec<Violation> {
    let mut sorted = violations.to_vec();
    sort_violations(&mut sorted);
    sorted
}

/// (errors, warnings) in `violations`
fn count_by_severity(violations: &[Violation]) -> (usize, usize) {
    let errors = violations
        .iter()
        .filter(|v| v.severity == Severity::Error)
        .count();
    (errors, violations.len() - errors)
}
