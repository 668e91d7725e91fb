use super::{CalloutCategory, GlyphTable, callout_start};
use crate::config::CalloutConfig;
use crate::docs::RuleDoc;
use crate::linter::{ConventionRule, Severity, Violation};
use crate::parser::ast::{Section, SectionKind};
use regex::{Regex, RegexBuilder};

/// Rule documentation
pub static DOC: RuleDoc = RuleDoc {
    name: "callout-glyph-mismatch",
    category: "callout",
    description: "Checks that the callout glyph matches what the callout says",
    severity: "warning",
    why: r#"A 💣 on a friendly hint trains readers to ignore the destructive
glyph, and a 💡 on a note about cancelled bookings hides a breaking
change. Callouts that mention invalidation, cancellation, removal or
irreversible actions should use ⚠️ or 💣; callouts using those glyphs
should say what breaks."#,
    bad_example: r#"> 💣 You do not need to send all information at once.

> 💡 The rate is invalidated once the booking is cancelled."#,
    good_example: r#"> 💡 You do not need to send all information at once.

> ⚠️ The rate is invalidated once the booking is cancelled."#,
    references: &[],
};

const DEFAULT_SEVERE_KEYWORDS: &[&str] = &[
    "invalidated",
    "invalidate",
    "cancelled",
    "canceled",
    "breaking",
    "deprecated",
    "removed",
    "irreversible",
    "permanently",
    "cannot be undone",
    "delete",
    "deleted",
];

/// Check callout glyphs against keyword heuristics
pub struct CalloutGlyphMismatch {
    glyphs: GlyphTable,
    severe: Option<Regex>,
}

impl CalloutGlyphMismatch {
    pub fn new(glyphs: GlyphTable, severe_keywords: &[String]) -> Self {
        Self {
            glyphs,
            severe: keyword_pattern(severe_keywords),
        }
    }

    pub fn from_config(glyphs: GlyphTable, config: &CalloutConfig) -> Self {
        match &config.severe_keywords {
            Some(keywords) => Self::new(glyphs, keywords),
            None => Self::new(glyphs, &default_keywords()),
        }
    }

    fn severe_keyword<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.severe.as_ref()?.find(text).map(|m| m.as_str())
    }

    fn suggestion(&self, categories: &[CalloutCategory]) -> String {
        categories
            .iter()
            .flat_map(|c| {
                self.glyphs
                    .glyphs_for(*c)
                    .into_iter()
                    .map(move |g| format!("{} ({})", g, c))
            })
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

impl Default for CalloutGlyphMismatch {
    fn default() -> Self {
        Self::new(GlyphTable::builtin(), &default_keywords())
    }
}

fn default_keywords() -> Vec<String> {
    DEFAULT_SEVERE_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

/// Whole-word, case-insensitive alternation of `keywords`
fn keyword_pattern(keywords: &[String]) -> Option<Regex> {
    let alternatives: Vec<String> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| {
            k.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();
    if alternatives.is_empty() {
        return None;
    }

    let pattern = format!(r"\b(?:{})\b", alternatives.join("|"));
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::warn!("ignoring severe keyword list: {}", e);
            None
        }
    }
}

impl ConventionRule for CalloutGlyphMismatch {
    fn name(&self) -> &'static str {
        "callout-glyph-mismatch"
    }

    fn category(&self) -> &'static str {
        "callout"
    }

    fn description(&self) -> &'static str {
        "Checks that the callout glyph matches what the callout says"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn applies_to(&self) -> &'static [SectionKind] {
        &[SectionKind::Callout]
    }

    fn check(&self, section: &Section) -> Vec<Violation> {
        let Section::Callout(callout) = section else {
            return Vec::new();
        };
        let body = callout.body();
        // callout-icon-valid reports callouts without a known glyph
        let Some(found) = self.glyphs.leading_glyph(callout_start(&body)) else {
            return Vec::new();
        };

        let keyword = self.severe_keyword(&body);
        let message = match (found.category.is_severe(), keyword) {
            (false, Some(keyword)) => format!(
                "callout mentions '{}' but uses the {} glyph '{}'; use {}",
                keyword,
                found.category,
                found.glyph,
                self.suggestion(&[CalloutCategory::Breaking, CalloutCategory::Destructive])
            ),
            (true, None) => format!(
                "callout uses the {} glyph '{}' but describes nothing breaking or destructive; use {}",
                found.category,
                found.glyph,
                self.suggestion(&[CalloutCategory::Tip, CalloutCategory::Config, CalloutCategory::Optional])
            ),
            _ => return Vec::new(),
        };
        vec![self.violation(&message, callout.span)]
    }
}
