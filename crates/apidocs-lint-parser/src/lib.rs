//! Section parser for markdown/MDX API documentation pages
//!
//! This crate segments a page into a flat list of [`ast::Section`]s (fenced
//! code blocks, tables, blockquote callouts, headings, prose paragraphs and MDX
//! markup), each tagged with the inclusive line range it covers. It does not
//! build a full markdown tree; it recognizes exactly the constructs the
//! documentation conventions talk about.
//!
//! Segmentation never fails. Unclosed fences run to the end of the file and are
//! flagged with [`ast::CodeBlock::closed`] so that rules can report them.
//!
//! # Quick Start
//!
//! ```
//! use apidocs_lint_parser::parse_string;
//!
//! let doc = parse_string("```json filename=\"POST /versions/v5/bookings\" copy\n{}\n```\n");
//! let block = doc.code_blocks().next().unwrap();
//!
//! assert_eq!(block.language.as_deref(), Some("json"));
//! assert_eq!(block.filename(), Some("POST /versions/v5/bookings"));
//! assert!(block.has_copy());
//! assert_eq!((block.span.start, block.span.end), (1, 3));
//! ```
//!
//! # Modules
//!
//! - [`ast`]: [`ast::Document`], [`ast::Section`], [`ast::Span`]
//! - [`error`]: [`error::ParseError`]
//! - [`lexer`]: per-line classification
//! - [`inline`]: inline link and code span scanning

pub mod ast;
pub mod error;
pub mod inline;
pub mod lexer;

use ast::{
    Attribute, Callout, CodeBlock, Document, Heading, Markup, Paragraph, Section, SourceLine, Span,
    Table, TableRow,
};
use error::{ParseError, ParseResult};
use lexer::{LineKind, classify, is_closing_fence, is_table_separator, split_cells};
use std::fs;
use std::path::Path;

/// Parse a documentation page from disk
pub fn parse_file(path: &Path) -> ParseResult<Document> {
    let bytes = fs::read(path).map_err(|e| ParseError::IoError(e.to_string()))?;
    parse_bytes(&bytes)
}

/// Parse a documentation page from raw bytes, which must be UTF-8
pub fn parse_bytes(bytes: &[u8]) -> ParseResult<Document> {
    match std::str::from_utf8(bytes) {
        Ok(source) => Ok(parse_string(source)),
        Err(e) => {
            let offset = e.valid_up_to();
            let line = bytes[..offset].iter().filter(|&&b| b == b'\n').count() + 1;
            Err(ParseError::InvalidUtf8 { offset, line })
        }
    }
}

/// Parse a documentation page from a string
pub fn parse_string(source: &str) -> Document {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let lines: Vec<&str> = source.lines().collect();
    let mut parser = Parser::new(&lines);
    parser.parse()
}

struct Parser<'a> {
    lines: &'a [&'a str],
    /// 0-based index of the current line
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Self { lines, pos: 0 }
    }

    fn line_number(&self, index: usize) -> usize {
        index + 1
    }

    fn parse(&mut self) -> Document {
        let mut sections = Vec::new();
        self.skip_front_matter();

        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            let section = match classify(line) {
                LineKind::Blank => {
                    self.pos += 1;
                    continue;
                }
                LineKind::Fence { marker, len, info } => self.parse_code_block(marker, len, info),
                LineKind::Heading { level, text } => self.parse_heading(level, text),
                LineKind::Quote { .. } => self.parse_callout(),
                LineKind::Markup => self.parse_markup(),
                LineKind::TableRow | LineKind::Text if self.starts_table() => self.parse_table(),
                LineKind::TableRow | LineKind::Text => self.parse_paragraph(),
            };
            sections.push(section);
        }

        Document {
            sections,
            line_count: self.lines.len(),
        }
    }

    /// YAML front matter (`---` ... `---`) on the first line is not part of the page body.
    fn skip_front_matter(&mut self) {
        if self.lines.first().map(|l| l.trim_end()) != Some("---") {
            return;
        }
        if let Some(end) = self.lines[1..].iter().position(|l| l.trim_end() == "---") {
            self.pos = end + 2;
        }
    }

    fn starts_table(&self) -> bool {
        let header = self.lines[self.pos];
        header.contains('|')
            && self
                .lines
                .get(self.pos + 1)
                .is_some_and(|next| is_table_separator(next))
    }

    fn parse_code_block(&mut self, marker: char, len: usize, info: &str) -> Section {
        let start = self.pos;
        let fence_line = self.lines[start];
        let (language, attributes) = parse_info_string(info);
        self.pos += 1;

        let mut body = Vec::new();
        let mut closed = false;
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            self.pos += 1;
            if is_closing_fence(line, marker, len) {
                closed = true;
                break;
            }
            body.push(line);
        }

        let end = self.pos - 1;
        Section::CodeBlock(CodeBlock {
            fence: marker.to_string().repeat(len),
            language,
            attributes,
            code: body.join("\n"),
            closed,
            fence_line: fence_line.to_string(),
            raw: self.lines[start..=end].join("\n"),
            span: Span::new(self.line_number(start), self.line_number(end)),
        })
    }

    fn parse_heading(&mut self, level: u8, text: &str) -> Section {
        let line = self.pos;
        self.pos += 1;
        Section::Heading(Heading {
            level,
            text: text.to_string(),
            raw: self.lines[line].to_string(),
            span: Span::line(self.line_number(line)),
        })
    }

    fn parse_callout(&mut self) -> Section {
        let start = self.pos;
        let mut lines = Vec::new();
        while self.pos < self.lines.len() {
            match classify(self.lines[self.pos]) {
                LineKind::Quote { content } => {
                    lines.push(SourceLine {
                        number: self.line_number(self.pos),
                        text: content.to_string(),
                    });
                    self.pos += 1;
                }
                _ => break,
            }
        }
        let end = self.pos - 1;
        Section::Callout(Callout {
            lines,
            raw: self.lines[start..=end].join("\n"),
            span: Span::new(self.line_number(start), self.line_number(end)),
        })
    }

    fn parse_markup(&mut self) -> Section {
        let start = self.pos;
        while self.pos < self.lines.len() && classify(self.lines[self.pos]) == LineKind::Markup {
            self.pos += 1;
        }
        let end = self.pos - 1;
        Section::Markup(Markup {
            raw: self.lines[start..=end].join("\n"),
            span: Span::new(self.line_number(start), self.line_number(end)),
        })
    }

    fn parse_table(&mut self) -> Section {
        let start = self.pos;
        let header = self.row(start);
        let separator_line = self.line_number(start + 1);
        self.pos += 2;

        let mut rows = Vec::new();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            let continues = matches!(classify(line), LineKind::TableRow | LineKind::Text)
                && line.contains('|');
            if !continues {
                break;
            }
            rows.push(self.row(self.pos));
            self.pos += 1;
        }

        let end = self.pos - 1;
        Section::Table(Table {
            header,
            separator_line,
            rows,
            raw: self.lines[start..=end].join("\n"),
            span: Span::new(self.line_number(start), self.line_number(end)),
        })
    }

    fn row(&self, index: usize) -> TableRow {
        let raw = self.lines[index];
        TableRow {
            cells: split_cells(raw),
            line: self.line_number(index),
            raw: raw.to_string(),
        }
    }

    fn parse_paragraph(&mut self) -> Section {
        let start = self.pos;
        let mut lines = Vec::new();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            let is_prose = matches!(classify(line), LineKind::TableRow | LineKind::Text);
            if !is_prose || (self.pos > start && self.starts_table()) {
                break;
            }
            lines.push(SourceLine {
                number: self.line_number(self.pos),
                text: line.to_string(),
            });
            self.pos += 1;
        }
        let end = self.pos - 1;
        Section::Paragraph(Paragraph {
            lines,
            raw: self.lines[start..=end].join("\n"),
            span: Span::new(self.line_number(start), self.line_number(end)),
        })
    }
}

/// Split a fence info string into a language tag and attributes.
///
/// The language is the first token unless it is itself an attribute
/// (`filename=...`). Values may be double- or single-quoted.
pub fn parse_info_string(info: &str) -> (Option<String>, Vec<Attribute>) {
    let tokens = tokenize_info(info);
    let mut iter = tokens.into_iter().peekable();

    let has_language = iter.peek().is_some_and(|first| !first.contains('='));
    let language = if has_language { iter.next() } else { None };
    // "```json{1,3}" style line highlights are not part of the language
    let language = language.map(|l| match l.find('{') {
        Some(idx) if idx > 0 => l[..idx].to_string(),
        _ => l,
    });

    let attributes = iter
        .map(|token| match token.split_once('=') {
            Some((name, value)) => Attribute {
                name: name.to_string(),
                value: Some(unquote(value).to_string()),
            },
            None => Attribute {
                name: token,
                value: None,
            },
        })
        .collect();

    (language, attributes)
}

/// Whitespace-separated tokens, keeping quoted values intact.
fn tokenize_info(info: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in info.chars() {
        match quote {
            Some(q) => {
                current.push(ch);
                if ch == q {
                    quote = None;
                }
            }
            None if ch == '"' || ch == '\'' => {
                current.push(ch);
                quote = Some(ch);
            }
            None if ch.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(q) {
            return inner.strip_suffix(q).unwrap_or(inner);
        }
    }
    value
}
