use apidocs_lint::docs::{RuleDoc, all_rule_docs, get_rule_doc};
use colored::Colorize;
use std::collections::HashMap;
use std::process::ExitCode;

pub fn run_why(rule: Option<String>, list: bool) -> ExitCode {
    if list {
        eprintln!("{}", "Available rules:".bold());
        eprintln!();

        let mut by_category: HashMap<&str, Vec<&RuleDoc>> = HashMap::new();
        for doc in all_rule_docs() {
            by_category.entry(doc.category).or_default().push(*doc);
        }

        for category in apidocs_lint::RULE_CATEGORIES {
            if let Some(rules) = by_category.get(category) {
                eprintln!("  {} {}", "▸".cyan(), category.bold());
                for doc in rules {
                    eprintln!("    {} - {}", doc.name.yellow(), doc.description);
                }
                eprintln!();
            }
        }

        eprintln!(
            "Use {} to see detailed documentation.",
            "apidocs-lint why <rule-name>".cyan()
        );
        return ExitCode::SUCCESS;
    }

    let rule_name = match rule {
        Some(name) => name,
        None => {
            eprintln!("Usage: apidocs-lint why <rule-name>");
            eprintln!("       apidocs-lint why --list");
            eprintln!();
            eprintln!("Use {} to see all available rules.", "--list".cyan());
            return ExitCode::from(1);
        }
    };

    match get_rule_doc(&rule_name) {
        Some(doc) => {
            print_rule_doc(doc);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("{} Unknown rule: {}", "Error:".red().bold(), rule_name);
            eprintln!();
            eprintln!(
                "Use {} to see all available rules.",
                "apidocs-lint why --list".cyan()
            );
            ExitCode::from(1)
        }
    }
}

fn print_example(title: colored::ColoredString, example: &str) {
    eprintln!("{}", title);
    eprintln!("{}", "─".repeat(60).dimmed());
    for line in example.lines() {
        eprintln!("  {}", line);
    }
    eprintln!("{}", "─".repeat(60).dimmed());
}

fn print_rule_doc(doc: &RuleDoc) {
    eprintln!();
    eprintln!("{} {}", "Rule:".bold(), doc.name.yellow());
    eprintln!("{} {}", "Category:".bold(), doc.category);
    eprintln!("{} {}", "Severity:".bold(), doc.severity);
    eprintln!();
    eprintln!("{}", "Why:".bold());
    for line in doc.why.lines() {
        eprintln!("  {}", line);
    }
    if !doc.bad_example.is_empty() {
        eprintln!();
        print_example("Bad Example:".bold().red(), doc.bad_example);
    }
    if !doc.good_example.is_empty() {
        eprintln!();
        print_example("Good Example:".bold().green(), doc.good_example);
    }

    if !doc.references.is_empty() {
        eprintln!();
        eprintln!("{}", "References:".bold());
        for reference in doc.references {
            eprintln!("  • {}", reference.cyan());
        }
    }
    eprintln!();
}
