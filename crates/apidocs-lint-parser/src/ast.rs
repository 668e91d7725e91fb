//! Section types for documentation pages.
//!
//! A page is segmented into a flat, ordered list of [`Section`]s. Every
//! section covers a contiguous, inclusive range of 1-based lines and no two
//! sections overlap. Blank lines and YAML front matter belong to no section.
//!
//! # Structure
//!
//! ```text
//! Document
//!  └─ sections: Vec<Section>
//!       ├─ CodeBlock   (```lang filename="…" copy)
//!       ├─ Table       (header | separator | rows)
//!       ├─ Callout     (> 💡 …)
//!       ├─ Heading     (## …)
//!       ├─ Paragraph   (prose, list items)
//!       └─ Markup      (MDX import/export, JSX, HTML comments)
//! ```
//!
//! # Example
//!
//! ```
//! use apidocs_lint_parser::parse_string;
//! use apidocs_lint_parser::ast::SectionKind;
//!
//! let doc = parse_string("## Create booking\n\n> 💡 Dates are UTC.\n");
//! let kinds: Vec<_> = doc.sections.iter().map(|s| s.kind()).collect();
//! assert_eq!(kinds, vec![SectionKind::Heading, SectionKind::Callout]);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive range of 1-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// First line of the range.
    pub start: usize,
    /// Last line of the range (inclusive).
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A span covering a single line.
    pub fn line(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A single source line with its 1-based number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLine {
    pub number: usize,
    pub text: String,
}

/// A parsed documentation page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Sections in source order.
    pub sections: Vec<Section>,
    /// Number of lines in the source.
    pub line_count: usize,
}

impl Document {
    pub fn code_blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.sections.iter().filter_map(|s| match s {
            Section::CodeBlock(b) => Some(b),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.sections.iter().filter_map(|s| match s {
            Section::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn callouts(&self) -> impl Iterator<Item = &Callout> {
        self.sections.iter().filter_map(|s| match s {
            Section::Callout(c) => Some(c),
            _ => None,
        })
    }

    pub fn headings(&self) -> impl Iterator<Item = &Heading> {
        self.sections.iter().filter_map(|s| match s {
            Section::Heading(h) => Some(h),
            _ => None,
        })
    }
}

/// Discriminant of [`Section`], used by rules as their kind selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    CodeBlock,
    Table,
    Callout,
    Heading,
    Paragraph,
    Markup,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::CodeBlock => "code-block",
            SectionKind::Table => "table",
            SectionKind::Callout => "callout",
            SectionKind::Heading => "heading",
            SectionKind::Paragraph => "paragraph",
            SectionKind::Markup => "markup",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structurally distinguishable unit of a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Section {
    CodeBlock(CodeBlock),
    Table(Table),
    Callout(Callout),
    Heading(Heading),
    Paragraph(Paragraph),
    Markup(Markup),
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::CodeBlock(_) => SectionKind::CodeBlock,
            Section::Table(_) => SectionKind::Table,
            Section::Callout(_) => SectionKind::Callout,
            Section::Heading(_) => SectionKind::Heading,
            Section::Paragraph(_) => SectionKind::Paragraph,
            Section::Markup(_) => SectionKind::Markup,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Section::CodeBlock(b) => b.span,
            Section::Table(t) => t.span,
            Section::Callout(c) => c.span,
            Section::Heading(h) => h.span,
            Section::Paragraph(p) => p.span,
            Section::Markup(m) => m.span,
        }
    }

    /// Raw source text of the section, lines joined with `\n`.
    pub fn raw(&self) -> &str {
        match self {
            Section::CodeBlock(b) => &b.raw,
            Section::Table(t) => &t.raw,
            Section::Callout(c) => &c.raw,
            Section::Heading(h) => &h.raw,
            Section::Paragraph(p) => &p.raw,
            Section::Markup(m) => &m.raw,
        }
    }

    /// Lines carrying prose that may contain inline references.
    ///
    /// Code blocks and markup carry none. For callouts the `>` marker is
    /// stripped; for tables every row (header included) is returned raw.
    pub fn prose_lines(&self) -> Vec<SourceLine> {
        match self {
            Section::CodeBlock(_) | Section::Markup(_) => Vec::new(),
            Section::Table(t) => std::iter::once(&t.header)
                .chain(t.rows.iter())
                .map(|row| SourceLine {
                    number: row.line,
                    text: row.raw.clone(),
                })
                .collect(),
            Section::Callout(c) => c.lines.clone(),
            Section::Heading(h) => vec![SourceLine {
                number: h.span.start,
                text: h.text.clone(),
            }],
            Section::Paragraph(p) => p.lines.clone(),
        }
    }
}

/// A `key` or `key="value"` attribute from a fence info string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

/// A fenced code block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Fence marker as written (e.g. "```" or "~~~~").
    pub fence: String,
    /// Language tag, if the info string declares one.
    pub language: Option<String>,
    /// Attributes following the language tag.
    pub attributes: Vec<Attribute>,
    /// Body between the fences.
    pub code: String,
    /// Whether a closing fence was found.
    pub closed: bool,
    /// Text of the opening fence line.
    pub fence_line: String,
    pub raw: String,
    pub span: Span,
}

impl CodeBlock {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Value of the `filename` (or `title`) attribute.
    pub fn filename(&self) -> Option<&str> {
        self.attribute("filename")
            .or_else(|| self.attribute("title"))
            .and_then(|a| a.value.as_deref())
    }

    /// Whether the block carries the `copy` marker.
    pub fn has_copy(&self) -> bool {
        self.attribute("copy")
            .is_some_and(|a| a.value.as_deref().is_none_or(|v| v != "false"))
    }

    /// Language tag lowercased, for comparisons.
    pub fn language_lower(&self) -> Option<String> {
        self.language.as_ref().map(|l| l.to_ascii_lowercase())
    }
}

/// A row of a markdown table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Trimmed cell contents, without the delimiting pipes.
    pub cells: Vec<String>,
    pub line: usize,
    pub raw: String,
}

impl TableRow {
    /// Cell at `index`, or an empty string when the row is short.
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

/// A markdown table (header, separator, zero or more data rows).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub header: TableRow,
    /// Line number of the `|---|---|` separator row.
    pub separator_line: usize,
    pub rows: Vec<TableRow>,
    pub raw: String,
    pub span: Span,
}

/// A blockquote, expected to be a callout introduced by a glyph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Callout {
    /// Quote contents with the leading `>` (and one space) removed.
    pub lines: Vec<SourceLine>,
    pub raw: String,
    pub span: Span,
}

impl Callout {
    /// Quote contents joined with `\n`.
    pub fn body(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// An ATX heading (`#` through `######`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    /// Heading text without markers.
    pub text: String,
    pub raw: String,
    pub span: Span,
}

/// Consecutive prose lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    pub lines: Vec<SourceLine>,
    pub raw: String,
    pub span: Span,
}

/// MDX statements, JSX elements and HTML comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Markup {
    pub raw: String,
    pub span: Span,
}
