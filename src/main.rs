mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Log to stderr so reports on stdout stay machine-readable
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Some(command) = &cli.command {
        return match command {
            Commands::Config { command } => cli::config::run_config(command),
            Commands::Why { rule, list } => cli::why::run_why(rule.clone(), *list),
        };
    }

    cli::lint::run_lint(cli)
}
