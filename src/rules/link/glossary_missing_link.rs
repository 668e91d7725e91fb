use super::{is_glossary_link, to_kebab_case};
use crate::config::GlossaryConfig;
use crate::docs::RuleDoc;
use crate::linter::{ConventionRule, Severity, Violation};
use crate::parser::ast::{Section, SectionKind, Span};
use crate::parser::inline::{links, plain_text};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Rule documentation
pub static DOC: RuleDoc = RuleDoc {
    name: "glossary-missing-link",
    category: "link",
    description: "Flags type names that are not linked to the glossary",
    severity: "warning",
    why: r#"Type names such as PassengerInfo or BookingRequest are defined once,
in the glossary. The first mention of a type in a paragraph, table or
callout links there so readers can look up its fields. Mentions inside
code spans and URLs are not counted."#,
    bad_example: r#"Send one PassengerInfo per guest."#,
    good_example: r#"Send one [PassengerInfo](/versions/v5/glossary#passenger-info) per guest."#,
    references: &[],
};

const DEFAULT_IGNORE_WORDS: &[&str] = &["JavaScript", "TypeScript", "GitHub", "OpenAPI", "LinkCard"];

static PASCAL_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z0-9]+(?:[A-Z][a-z0-9]+)+\b").expect("type name pattern is valid")
});

/// Flag type names mentioned without a glossary link
pub struct GlossaryMissingLink {
    /// Only these names when set, any PascalCase name otherwise
    known_types: Option<Regex>,
    ignore_words: HashSet<String>,
}

impl GlossaryMissingLink {
    pub fn from_config(config: &GlossaryConfig) -> Self {
        let names: Vec<String> = config
            .known_types
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(regex::escape)
            .collect();
        let known_types = if names.is_empty() {
            None
        } else {
            match Regex::new(&format!(r"\b(?:{})\b", names.join("|"))) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!("ignoring glossary known_types: {}", e);
                    None
                }
            }
        };

        let ignore_words = match &config.ignore_words {
            Some(words) => words.iter().cloned().collect(),
            None => DEFAULT_IGNORE_WORDS.iter().map(|w| w.to_string()).collect(),
        };

        Self {
            known_types,
            ignore_words,
        }
    }

    fn pattern(&self) -> &Regex {
        self.known_types.as_ref().unwrap_or(&PASCAL_CASE)
    }
}

impl Default for GlossaryMissingLink {
    fn default() -> Self {
        Self::from_config(&GlossaryConfig::default())
    }
}

impl ConventionRule for GlossaryMissingLink {
    fn name(&self) -> &'static str {
        "glossary-missing-link"
    }

    fn category(&self) -> &'static str {
        "link"
    }

    fn description(&self) -> &'static str {
        "Flags type names that are not linked to the glossary"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn applies_to(&self) -> &'static [SectionKind] {
        &[SectionKind::Paragraph, SectionKind::Table, SectionKind::Callout]
    }

    fn check(&self, section: &Section) -> Vec<Violation> {
        let lines = section.prose_lines();

        let linked: HashSet<String> = lines
            .iter()
            .flat_map(|line| links(&line.text))
            .filter(is_glossary_link)
            .map(|link| link.text.trim().trim_matches('`').to_string())
            .collect();

        let mut reported = HashSet::new();
        let mut violations = Vec::new();
        for line in &lines {
            let plain = plain_text(&line.text);
            for name in self.pattern().find_iter(&plain).map(|m| m.as_str()) {
                if linked.contains(name) || self.ignore_words.contains(name) || !reported.insert(name.to_string()) {
                    continue;
                }
                violations.push(self.violation(
                    &format!(
                        "type '{}' is not linked to the glossary ([{}](/versions/vN/glossary#{}))",
                        name,
                        name,
                        to_kebab_case(name)
                    ),
                    Span::line(line.number),
                ));
            }
        }
        violations
    }
}
