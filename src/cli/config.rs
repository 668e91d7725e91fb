use apidocs_lint::config::{CONFIG_FILE_NAME, DEFAULT_CONFIG_TEMPLATE};
use apidocs_lint::rules::GlyphTable;
use apidocs_lint::{LintConfig, Linter, ValidationError};
use clap::Subcommand;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate a default .apidocs-lint.toml configuration file
    Init {
        /// Output path for the configuration file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
    /// Check a configuration file for unknown keys, rules, colors and glyph categories
    Validate {
        /// File to check (default: the .apidocs-lint.toml governing the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run_config(command: &ConfigCommands) -> ExitCode {
    match command {
        ConfigCommands::Init { output, force } => run_init(output, *force),
        ConfigCommands::Validate { config } => run_validate(config.as_deref()),
    }
}

fn run_init(output: &Path, force: bool) -> ExitCode {
    if output.exists() && !force {
        eprintln!(
            "Error: {} already exists. Use --force to overwrite.",
            output.display()
        );
        return ExitCode::from(1);
    }

    // a config further up stops applying once this one exists
    let shadowed = output
        .parent()
        .map(|dir| if dir.as_os_str().is_empty() { Path::new(".") } else { dir })
        .and_then(|dir| dir.canonicalize().ok())
        .and_then(|dir| dir.parent().and_then(LintConfig::find_path));

    match fs::write(output, DEFAULT_CONFIG_TEMPLATE) {
        Ok(()) => {
            eprintln!("Created {}", output.display());
            if let Some(shadowed) = shadowed {
                eprintln!("Note: {} no longer applies below this directory", shadowed.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error writing {}: {}", output.display(), e);
            ExitCode::from(2)
        }
    }
}

/// The file `config validate` checks: the explicit one, or the one the
/// linter would pick up from `cwd`
fn resolve_config_path(explicit: Option<&Path>, cwd: &Path) -> Result<PathBuf, String> {
    match explicit {
        Some(path) if path.exists() => Ok(path.to_path_buf()),
        Some(path) => Err(format!("{} not found", path.display())),
        None => LintConfig::find_path(cwd).ok_or_else(|| {
            format!(
                "no {} found in {} or its parents",
                CONFIG_FILE_NAME,
                cwd.display()
            )
        }),
    }
}

/// Problems grouped under the table they belong to
fn render_problems(path: &Path, errors: &[ValidationError]) -> String {
    let mut by_section: BTreeMap<&str, Vec<&ValidationError>> = BTreeMap::new();
    for error in errors {
        by_section.entry(error.section()).or_default().push(error);
    }

    let mut out = format!("{}:\n", path.display());
    for (section, problems) in by_section {
        let _ = writeln!(out, "  [{}]", section);
        for problem in problems {
            let _ = writeln!(out, "    - {}", problem);
        }
    }
    let _ = write!(out, "\nFound {} error(s)", errors.len());
    out
}

/// One-line description of the catalog a valid file produces
fn describe_catalog(config: &LintConfig) -> String {
    let rules = match Linter::with_config(Some(config)) {
        Ok(linter) => linter.rules().len(),
        Err(e) => return e.to_string(),
    };
    let glyphs = GlyphTable::from_config(&config.callouts).glyphs().len();
    format!("{} rule(s) enabled, {} callout glyph(s)", rules, glyphs)
}

fn run_validate(explicit: Option<&Path>) -> ExitCode {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config_path = match resolve_config_path(explicit, &cwd) {
        Ok(path) => path,
        Err(message) => {
            eprintln!("Error: {}", message);
            return ExitCode::from(2);
        }
    };

    match LintConfig::validate_file(&config_path) {
        Ok(errors) if errors.is_empty() => match LintConfig::from_file(&config_path) {
            Ok(config) => {
                eprintln!("{}: OK ({})", config_path.display(), describe_catalog(&config));
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(2)
            }
        },
        Ok(errors) => {
            eprintln!("{}", render_problems(&config_path, &errors));
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
