use super::Cli;
use apidocs_lint::{
    ColorMode, FileReport, Fix, LintConfig, Linter, Reporter, Severity, Violation, apply_fixes,
    apply_fixes_to_content,
};
use clap::CommandFactory;
use colored::control;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Files under `dir` with one of `extensions`, sorted
fn expand_dir(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, glob::PatternError> {
    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();
    for ext in extensions {
        let pattern = format!("{}/**/*.{}", base, ext.trim_start_matches('.'));
        files.extend(glob::glob(&pattern)?.filter_map(Result::ok).filter(|p| p.is_file()));
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Whether the results should fail the run
fn has_issues(violations: &[Violation], no_fail_on_warnings: bool) -> bool {
    if no_fail_on_warnings {
        violations.iter().any(|v| v.severity == Severity::Error)
    } else {
        !violations.is_empty()
    }
}

/// What `--fix` writes back for stdin: the fixed text, or the input
/// unchanged when it could not be decoded
fn fixed_stdin(bytes: &[u8], violations: &[Violation]) -> Vec<u8> {
    match std::str::from_utf8(bytes) {
        Ok(content) => {
            let fixes: Vec<&Fix> = violations.iter().filter_map(|v| v.fix.as_ref()).collect();
            apply_fixes_to_content(content, &fixes).0.into_bytes()
        }
        Err(_) => bytes.to_vec(),
    }
}

fn load_config(cli: &Cli, search_dir: &Path) -> Result<Option<LintConfig>, ExitCode> {
    if let Some(config_path) = &cli.config {
        return match LintConfig::from_file(config_path) {
            Ok(cfg) => {
                tracing::info!(path = %config_path.display(), "using config");
                Ok(Some(cfg))
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                Err(ExitCode::from(2))
            }
        };
    }

    match LintConfig::find_and_load(search_dir) {
        Ok(config) => {
            if config.is_some() {
                tracing::info!(dir = %search_dir.display(), "found {}", apidocs_lint::config::CONFIG_FILE_NAME);
            }
            Ok(config)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(ExitCode::from(2))
        }
    }
}

pub fn run_lint(cli: Cli) -> ExitCode {
    // 1. Detect stdin mode and read content if applicable
    let stdin_mode = cli.files.len() == 1 && cli.files[0].as_os_str() == "-";
    let stdin_content = if stdin_mode {
        let mut content = Vec::new();
        if let Err(e) = std::io::stdin().read_to_end(&mut content) {
            eprintln!("Error reading from stdin: {}", e);
            return ExitCode::from(2);
        }
        Some(content)
    } else {
        None
    };

    if stdin_content.is_none() && cli.files.is_empty() {
        let _ = Cli::command().print_help();
        eprintln!();
        return ExitCode::from(2);
    }

    // 2. Load configuration, searching upward from the first input
    let search_dir = if stdin_content.is_some() {
        Path::new(".")
    } else if cli.files[0].is_dir() {
        cli.files[0].as_path()
    } else {
        cli.files[0].parent().unwrap_or(Path::new("."))
    };
    let lint_config = match load_config(&cli, search_dir) {
        Ok(config) => config,
        Err(code) => return code,
    };

    // 3. Configure color output (CLI flags take precedence over config)
    if cli.color {
        control::set_override(true);
    } else if cli.no_color {
        control::set_override(false);
    } else if let Some(ref config) = lint_config {
        match config.color_mode() {
            ColorMode::Always => control::set_override(true),
            ColorMode::Never => control::set_override(false),
            ColorMode::Auto => {}
        }
    }

    // 4. Create reporter with color configuration
    let color_config = lint_config
        .as_ref()
        .map(|c| c.color.clone())
        .unwrap_or_default();
    let reporter = Reporter::with_colors(cli.format.into(), color_config);

    // 5. Build the rule catalog
    let linter = match Linter::with_config(lint_config.as_ref()) {
        Ok(linter) => Arc::new(linter),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };
    tracing::debug!(rules = linter.rules().len(), "rule catalog ready");

    // 6. Branch: stdin mode vs file mode
    if let Some(ref content) = stdin_content {
        let stdin_path = Path::new("<stdin>");
        let (violations, ignored_count) = linter.lint_input(content);

        if cli.fix {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(&fixed_stdin(content, &violations)) {
                eprintln!("Error writing to stdout: {}", e);
                return ExitCode::from(2);
            }
        } else {
            reporter.report(&violations, stdin_path, ignored_count);
        }

        return if has_issues(&violations, cli.no_fail_on_warnings) {
            ExitCode::from(1)
        } else {
            ExitCode::SUCCESS
        };
    }

    // --- file mode ---
    let extensions = lint_config
        .as_ref()
        .map(|c| c.lint.extensions.clone())
        .unwrap_or_else(|| LintConfig::default().lint.extensions);

    let mut file_paths: Vec<PathBuf> = Vec::new();
    for file in &cli.files {
        if file.is_dir() {
            match expand_dir(file, &extensions) {
                Ok(found) => {
                    if found.is_empty() {
                        tracing::warn!(dir = %file.display(), "no documentation files found");
                    }
                    file_paths.extend(found);
                }
                Err(e) => {
                    eprintln!("Error: invalid path {}: {}", file.display(), e);
                    return ExitCode::from(2);
                }
            }
        } else {
            file_paths.push(file.clone());
        }
    }

    if file_paths.is_empty() {
        eprintln!("Error: no documentation files to check");
        return ExitCode::from(2);
    }

    let timeout = cli
        .timeout_ms
        .or_else(|| lint_config.as_ref().and_then(|c| c.lint.timeout_ms))
        .map(Duration::from_millis);

    tracing::info!(files = file_paths.len(), "linting");

    // Lint files (parallel when not fixing, sequential otherwise)
    let reports: Vec<FileReport> = if cli.fix {
        file_paths
            .iter()
            .map(|path| match timeout {
                Some(t) => linter.lint_path_with_timeout(path, t),
                None => linter.lint_path(path),
            })
            .collect()
    } else {
        linter.lint_paths(&file_paths, timeout)
    };

    // Process results sequentially (for consistent output ordering)
    let mut all_violations = Vec::new();
    for report in reports {
        if cli.fix {
            match apply_fixes(&report.path, &report.violations) {
                Ok(count) => {
                    if count > 0 {
                        eprintln!("Applied {} fix(es) to {}", count, report.path.display());
                    }
                }
                Err(e) => {
                    eprintln!("Error applying fixes to {}: {}", report.path.display(), e);
                }
            }
        } else {
            reporter.report(&report.violations, &report.path, report.ignored_count);
        }
        all_violations.extend(report.violations);
    }

    if has_issues(&all_violations, cli.no_fail_on_warnings) {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_expand_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("v5/bookings")).unwrap();
        fs::write(dir.path().join("index.md"), "# Index\n").unwrap();
        fs::write(dir.path().join("v5/bookings/create.mdx"), "# Create\n").unwrap();
        fs::write(dir.path().join("v5/notes.txt"), "notes\n").unwrap();

        let files = expand_dir(dir.path(), &["md".to_string(), "mdx".to_string()]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("index.md")));
        assert!(files.iter().any(|p| p.ends_with("v5/bookings/create.mdx")));
    }

    #[test]
    fn test_undecodable_stdin_is_a_violation() {
        let linter = Linter::with_default_rules();
        let bytes = b"# Bookings\n\nCaf\xe9 rates\n";
        let (violations, ignored) = linter.lint_input(bytes);

        assert_eq!(ignored, 0);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, apidocs_lint::linter::UNREADABLE_INPUT);
        assert_eq!(violations[0].start_line, 3);
        assert!(has_issues(&violations, true));
        assert_eq!(fixed_stdin(bytes, &violations), bytes.to_vec());
    }

    #[test]
    fn test_fixed_stdin() {
        let linter = Linter::with_default_rules();
        let bytes = "```ts filename=\"booking.ts\"\ntype Booking = {}\n```\n".as_bytes();
        let (violations, _) = linter.lint_input(bytes);
        let fixed = String::from_utf8(fixed_stdin(bytes, &violations)).unwrap();
        assert!(fixed.starts_with("```ts filename=\"booking.ts\" copy\n"));
    }

    #[test]
    fn test_has_issues() {
        let warning = vec![Violation::new("r", "c", "m", Severity::Warning)];
        assert!(has_issues(&warning, false));
        assert!(!has_issues(&warning, true));
        let error = vec![Violation::new("r", "c", "m", Severity::Error)];
        assert!(has_issues(&error, true));
        assert!(!has_issues(&[], false));
    }
}
