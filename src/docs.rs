//! Rule documentation for apidocs-lint
//!
//! This module provides detailed documentation for each convention rule,
//! explaining why the convention exists and what a conforming page looks like.

/// Documentation for a convention rule
pub struct RuleDoc {
    /// Rule name (e.g., "json-block-has-copy-attribute")
    pub name: &'static str,
    /// Category (e.g., "code-block")
    pub category: &'static str,
    /// Short description
    pub description: &'static str,
    /// Severity level
    pub severity: &'static str,
    /// Why this rule exists
    pub why: &'static str,
    /// Example of non-conforming markdown
    pub bad_example: &'static str,
    /// Example of conforming markdown
    pub good_example: &'static str,
    /// References (URLs, documentation links)
    pub references: &'static [&'static str],
}

/// Get documentation for a rule by name
pub fn get_rule_doc(name: &str) -> Option<&'static RuleDoc> {
    all_rule_docs().iter().find(|doc| doc.name == name).copied()
}

/// Get all rule documentation
pub fn all_rule_docs() -> &'static [&'static RuleDoc] {
    use crate::rules::{
        callout::{callout_glyph_mismatch, callout_icon_valid},
        code_block::{code_block_language, code_block_unclosed, json_block_filename_format, json_block_has_copy_attribute},
        heading::endpoint_path_format,
        input,
        link::{glossary_link_format, glossary_missing_link},
        table::{error_table_columns, error_table_status_code_format},
    };

    static DOCS: &[&RuleDoc] = &[
        // Code blocks
        &code_block_language::DOC,
        &code_block_unclosed::DOC,
        &json_block_has_copy_attribute::DOC,
        &json_block_filename_format::DOC,
        // Headings
        &endpoint_path_format::DOC,
        // Tables
        &error_table_columns::DOC,
        &error_table_status_code_format::DOC,
        // Callouts
        &callout_icon_valid::DOC,
        &callout_glyph_mismatch::DOC,
        // Links
        &glossary_link_format::DOC,
        &glossary_missing_link::DOC,
        // Input
        &input::UNREADABLE_INPUT_DOC,
        &input::VALIDATION_TIMED_OUT_DOC,
    ];

    DOCS
}

/// Get all rule names
pub fn all_rule_names() -> Vec<&'static str> {
    all_rule_docs().iter().map(|doc| doc.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::Linter;
    use crate::rules::RULE_CATEGORIES;

    #[test]
    fn test_get_rule_doc() {
        let doc = get_rule_doc("json-block-has-copy-attribute");
        assert!(doc.is_some());
        let doc = doc.unwrap();
        assert_eq!(doc.name, "json-block-has-copy-attribute");
        assert_eq!(doc.category, "code-block");
    }

    #[test]
    fn test_get_rule_doc_not_found() {
        let doc = get_rule_doc("nonexistent-rule");
        assert!(doc.is_none());
    }

    #[test]
    fn test_all_rule_names() {
        let names = all_rule_names();
        assert!(names.contains(&"endpoint-path-format"));
        assert!(names.contains(&"callout-glyph-mismatch"));
        assert!(names.contains(&"unreadable-input"));
    }

    #[test]
    fn test_every_rule_is_documented() {
        let linter = Linter::with_default_rules();
        for rule in linter.rules() {
            let doc = get_rule_doc(rule.name()).unwrap_or_else(|| panic!("{} has no doc", rule.name()));
            assert_eq!(doc.category, rule.category());
            assert_eq!(doc.description, rule.description());
            assert_eq!(doc.severity, rule.severity().to_string().to_lowercase());
        }
    }

    #[test]
    fn test_categories_are_known() {
        for doc in all_rule_docs() {
            assert!(RULE_CATEGORIES.contains(&doc.category), "{}", doc.name);
        }
    }
}
