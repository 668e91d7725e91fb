use super::{count_by_severity, sorted};
use crate::linter::Violation;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct JsonReport {
    file: String,
    violations: Vec<Violation>,
    summary: Summary,
}

#[derive(Serialize)]
struct Summary {
    errors: usize,
    warnings: usize,
    ignored: usize,
}

pub(crate) fn report(violations: &[Violation], path: &Path, ignored_count: usize) {
    println!("{}", format(violations, path, ignored_count));
}

pub(crate) fn format(violations: &[Violation], path: &Path, ignored_count: usize) -> String {
    let (errors, warnings) = count_by_severity(violations);
    let report = JsonReport {
        file: path.display().to_string(),
        violations: sorted(violations),
        summary: Summary {
            errors,
            warnings,
            ignored: ignored_count,
        },
    };

    // plain data with string keys always serializes
    serde_json::to_string_pretty(&report).unwrap_or_default()
}
