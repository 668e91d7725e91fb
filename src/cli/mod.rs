pub mod config;
pub mod lint;
pub mod why;

use apidocs_lint::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Display order for log level option (placed at end of help text)
const LOG_LEVEL_DISPLAY_ORDER: usize = 100;

#[derive(Parser)]
#[command(name = "apidocs-lint")]
#[command(author, version, about = "Check markdown/MDX API documentation against its conventions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Documentation files or directories to check ("-" reads stdin)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    pub format: Format,

    /// Automatically fix problems
    #[arg(long)]
    pub fix: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Force colored output
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Do not exit with non-zero code on warnings (only fail on errors)
    #[arg(long)]
    pub no_fail_on_warnings: bool,

    /// Give up on a file after this many milliseconds and report it as timed out
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Log level (see https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
    /// [env: APIDOCS_LINT_LOG=] [default: warn]
    #[arg(
        long,
        env = "APIDOCS_LINT_LOG",
        default_value = "warn",
        global = true,
        hide_default_value = true,
        hide_env = true,
        display_order = LOG_LEVEL_DISPLAY_ORDER,
        verbatim_doc_comment
    )]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
    /// Show detailed documentation for a rule
    Why {
        /// Rule name (e.g., "json-block-has-copy-attribute")
        rule: Option<String>,

        /// List all available rules
        #[arg(short, long)]
        list: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
    GithubActions,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::ErrorFormat,
            Format::Json => OutputFormat::Json,
            Format::GithubActions => OutputFormat::GithubActions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "apidocs-lint",
            "-o",
            "github-actions",
            "--no-fail-on-warnings",
            "--timeout-ms",
            "500",
            "docs",
        ])
        .unwrap();
        assert!(matches!(cli.format, Format::GithubActions));
        assert!(cli.no_fail_on_warnings);
        assert_eq!(cli.timeout_ms, Some(500));
        assert_eq!(cli.files, vec![PathBuf::from("docs")]);
    }

    #[test]
    fn test_color_flags_conflict() {
        assert!(Cli::try_parse_from(["apidocs-lint", "--color", "--no-color", "a.md"]).is_err());
    }

    #[test]
    fn test_why_subcommand() {
        let cli = Cli::try_parse_from(["apidocs-lint", "why", "--list"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Why { list: true, .. })));
    }
}
