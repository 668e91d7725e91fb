//! Rules for fenced code blocks

pub mod code_block_language;
pub mod code_block_unclosed;
pub mod json_block_filename_format;
pub mod json_block_has_copy_attribute;

pub use code_block_language::CodeBlockLanguage;
pub use code_block_unclosed::CodeBlockUnclosed;
pub use json_block_filename_format::JsonBlockFilenameFormat;
pub use json_block_has_copy_attribute::JsonBlockHasCopyAttribute;

use crate::parser::ast::CodeBlock;

/// Languages whose blocks document request/response payloads or type templates
const PAYLOAD_LANGUAGES: &[&str] = &["json", "jsonc", "json5", "ts", "typescript"];

pub(crate) fn is_payload_language(block: &CodeBlock) -> bool {
    block
        .language_lower()
        .is_some_and(|lang| PAYLOAD_LANGUAGES.contains(&lang.as_str()))
}
