//! Rules for blockquote callouts
//!
//! A callout is a blockquote introduced by a glyph that tells the reader
//! what kind of note follows. The glyph table maps each glyph to a
//! [`CalloutCategory`]; comparisons ignore the U+FE0F variation selector,
//! so `⚠` and `⚠️` are the same glyph.

pub mod callout_glyph_mismatch;
pub mod callout_icon_valid;

pub use callout_glyph_mismatch::CalloutGlyphMismatch;
pub use callout_icon_valid::CalloutIconValid;

use crate::config::CalloutConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Semantic category of a callout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutCategory {
    /// Critical or breaking change
    Breaking,
    /// Informational tip
    Tip,
    /// Configuration note
    Config,
    /// Destructive action warning
    Destructive,
    /// Optional feature
    Optional,
}

impl CalloutCategory {
    pub const NAMES: &'static [&'static str] = &["breaking", "tip", "config", "destructive", "optional"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalloutCategory::Breaking => "breaking",
            CalloutCategory::Tip => "tip",
            CalloutCategory::Config => "config",
            CalloutCategory::Destructive => "destructive",
            CalloutCategory::Optional => "optional",
        }
    }

    /// Categories reserved for notes the reader must not skip
    pub fn is_severe(&self) -> bool {
        matches!(self, CalloutCategory::Breaking | CalloutCategory::Destructive)
    }
}

impl fmt::Display for CalloutCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip variation selectors
fn normalize(glyph: &str) -> String {
    glyph.chars().filter(|&c| c != VARIATION_SELECTOR).collect()
}

/// The glyph found at the start of a callout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadingGlyph<'a> {
    /// Glyph as written in the table
    pub glyph: &'a str,
    pub category: CalloutCategory,
    /// Byte length of the glyph in the callout text, selectors included
    pub len: usize,
}

/// Mapping from glyph to callout category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphTable {
    /// (glyph as configured, normalized glyph, category), longest first
    entries: Vec<(String, String, CalloutCategory)>,
}

impl GlyphTable {
    pub fn builtin() -> Self {
        Self::from_entries(vec![
            ("⚠️".to_string(), CalloutCategory::Breaking),
            ("💡".to_string(), CalloutCategory::Tip),
            ("⚙️".to_string(), CalloutCategory::Config),
            ("💣".to_string(), CalloutCategory::Destructive),
            ("🧩".to_string(), CalloutCategory::Optional),
        ])
    }

    /// Table from configuration, or the built-in table when none is set
    pub fn from_config(config: &CalloutConfig) -> Self {
        match &config.glyphs {
            Some(glyphs) if !glyphs.is_empty() => {
                Self::from_entries(glyphs.iter().map(|(g, c)| (g.clone(), *c)).collect())
            }
            _ => Self::builtin(),
        }
    }

    fn from_entries(entries: Vec<(String, CalloutCategory)>) -> Self {
        let mut entries: Vec<(String, String, CalloutCategory)> = entries
            .into_iter()
            .map(|(glyph, category)| {
                let normalized = normalize(glyph.trim());
                (glyph, normalized, category)
            })
            .filter(|(_, normalized, _)| !normalized.is_empty())
            .collect();
        entries.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        Self { entries }
    }

    /// Match a glyph at the start of `text`
    pub fn leading_glyph<'a>(&'a self, text: &str) -> Option<LeadingGlyph<'a>> {
        self.entries.iter().find_map(|(glyph, normalized, category)| {
            let len = Self::match_len(text, normalized)?;
            Some(LeadingGlyph {
                glyph,
                category: *category,
                len,
            })
        })
    }

    /// Byte length of `text`'s prefix equal to `normalized` once selectors
    /// are dropped, with trailing selectors consumed.
    fn match_len(text: &str, normalized: &str) -> Option<usize> {
        let mut expected = normalized.chars().peekable();
        let mut consumed = 0;
        for (idx, ch) in text.char_indices() {
            if ch == VARIATION_SELECTOR {
                consumed = idx + ch.len_utf8();
                continue;
            }
            match expected.next() {
                Some(e) if e == ch => consumed = idx + ch.len_utf8(),
                Some(_) => return None,
                None => return Some(consumed),
            }
        }
        match expected.peek() {
            None => Some(consumed),
            Some(_) => None,
        }
    }

    /// Glyphs configured for `category`
    pub fn glyphs_for(&self, category: CalloutCategory) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, _, c)| *c == category)
            .map(|(g, _, _)| g.as_str())
            .collect()
    }

    /// Every configured glyph, in table order
    pub fn glyphs(&self) -> Vec<&str> {
        self.entries.iter().map(|(g, _, _)| g.as_str()).collect()
    }
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Callout text with leading emphasis markers removed, e.g. `**⚠️ Note**`
pub(crate) fn callout_start(body: &str) -> &str {
    body.trim_start()
        .trim_start_matches(['*', '_'])
        .trim_start()
}
