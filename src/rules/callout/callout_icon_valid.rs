use super::{GlyphTable, callout_start};
use crate::docs::RuleDoc;
use crate::linter::{ConventionRule, Severity, Violation};
use crate::parser::ast::{Section, SectionKind};

/// Rule documentation
pub static DOC: RuleDoc = RuleDoc {
    name: "callout-icon-valid",
    category: "callout",
    description: "Requires callouts to begin with exactly one recognized glyph",
    severity: "error",
    why: r#"Callout glyphs carry meaning: ⚠️ breaking change, 💡 tip,
⚙️ configuration, 💣 destructive action, 🧩 optional feature. A quote
without a glyph, with an unknown icon or with several icons gives the
reader no way to tell how much attention the note deserves."#,
    bad_example: r#"> Remember to cache the rate before booking.

> 🔥💡 Rates expire after 15 minutes."#,
    good_example: r#"> 💡 Remember to cache the rate before booking.

> ⚠️ Rates expire after 15 minutes and cannot be booked once invalidated."#,
    references: &[],
};

/// Check the glyph that introduces a callout
pub struct CalloutIconValid {
    glyphs: GlyphTable,
}

impl CalloutIconValid {
    pub fn new(glyphs: GlyphTable) -> Self {
        Self { glyphs }
    }

    fn known_glyphs(&self) -> String {
        self.glyphs.glyphs().join(" ")
    }

    /// The emoji `text` starts with, if any.
    ///
    /// Typographic characters (curly quotes, arrows, ellipses) are text.
    fn leading_pictograph(text: &str) -> Option<char> {
        let mut chars = text.chars();
        let ch = chars.next()?;
        let code = ch as u32;
        let emoji = (0x1F000..=0x1FAFF).contains(&code)
            || (0x2600..=0x27BF).contains(&code)
            || chars.next() == Some('\u{FE0F}');
        emoji.then_some(ch)
    }
}

impl Default for CalloutIconValid {
    fn default() -> Self {
        Self::new(GlyphTable::builtin())
    }
}

impl ConventionRule for CalloutIconValid {
    fn name(&self) -> &'static str {
        "callout-icon-valid"
    }

    fn category(&self) -> &'static str {
        "callout"
    }

    fn description(&self) -> &'static str {
        "Requires callouts to begin with exactly one recognized glyph"
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn applies_to(&self) -> &'static [SectionKind] {
        &[SectionKind::Callout]
    }

    fn check(&self, section: &Section) -> Vec<Violation> {
        let Section::Callout(callout) = section else {
            return Vec::new();
        };
        let body = callout.body();
        let start = callout_start(&body);

        let message = match self.glyphs.leading_glyph(start) {
            Some(found) => {
                let rest = start[found.len..].trim_start();
                let second = match self.glyphs.leading_glyph(rest) {
                    Some(next) => Some(next.glyph.to_string()),
                    None => Self::leading_pictograph(rest).map(String::from),
                };
                match second {
                    Some(next) => {
                        format!("callout begins with more than one glyph ('{}' then '{}')", found.glyph, next)
                    }
                    None => return Vec::new(),
                }
            }
            None => match Self::leading_pictograph(start) {
                Some(first) => format!(
                    "unrecognized callout glyph '{}' (expected one of {})",
                    first,
                    self.known_glyphs()
                ),
                _ => format!(
                    "blockquote does not begin with a callout glyph (expected one of {})",
                    self.known_glyphs()
                ),
            },
        };
        vec![self.violation(&message, callout.span)]
    }
}
