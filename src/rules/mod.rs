pub mod callout;
pub mod code_block;
mod endpoint;
pub mod heading;
pub mod input;
pub mod link;
pub mod table;

pub use callout::{CalloutCategory, CalloutGlyphMismatch, CalloutIconValid, GlyphTable};
pub use code_block::{CodeBlockLanguage, CodeBlockUnclosed, JsonBlockFilenameFormat, JsonBlockHasCopyAttribute};
pub use heading::EndpointPathFormat;
pub use link::{GlossaryLinkFormat, GlossaryMissingLink};
pub use table::{ErrorTableColumns, ErrorTableStatusCodeFormat};

/// Rule categories, in the order `why --list` prints them
pub const RULE_CATEGORIES: &[&str] = &["code-block", "heading", "table", "callout", "link", "input"];

#[cfg(test)]
pub(crate) mod test_util {
    use crate::linter::{ConventionRule, Violation};
    use crate::parser::parse_string;

    /// Run one rule over every section it applies to
    pub fn check_rule(rule: &dyn ConventionRule, source: &str) -> Vec<Violation> {
        parse_string(source)
            .sections
            .iter()
            .filter(|s| rule.applies_to().contains(&s.kind()))
            .flat_map(|s| rule.check(s))
            .collect()
    }
}
