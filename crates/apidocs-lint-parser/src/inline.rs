//! Inline scanning within a single line of prose.
//!
//! Only the constructs the rules need are recognized: inline links
//! `[text](target)`, images (skipped), and code spans.

use serde::{Deserialize, Serialize};

/// An inline link `[text](target)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineLink {
    /// Link text between the brackets.
    pub text: String,
    /// Link destination without an optional title.
    pub target: String,
    /// 1-based character column of the opening `[`.
    pub column: usize,
    /// Byte range of the whole link within the line.
    pub start: usize,
    pub end: usize,
}

impl InlineLink {
    /// Part of the target after `#`, if any.
    pub fn anchor(&self) -> Option<&str> {
        self.target.split_once('#').map(|(_, a)| a)
    }

    /// Part of the target before `#`.
    pub fn path(&self) -> &str {
        self.target
            .split_once('#')
            .map(|(p, _)| p)
            .unwrap_or(&self.target)
    }
}

/// Find all inline links on a line, outside code spans. Images are skipped.
pub fn links(line: &str) -> Vec<InlineLink> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut found = Vec::new();
    let mut i = 0;
    let mut in_code = false;

    while i < chars.len() {
        let (_, ch) = chars[i];
        if ch == '`' {
            in_code = !in_code;
            i += 1;
            continue;
        }
        if in_code || ch != '[' {
            i += 1;
            continue;
        }
        let is_image = i > 0 && chars[i - 1].1 == '!';
        match parse_link_at(line, &chars, i) {
            Some((link, next)) => {
                if !is_image {
                    found.push(link);
                }
                i = next;
            }
            None => i += 1,
        }
    }

    found
}

/// Parse `[text](target)` starting at `chars[open]` == '['.
/// Returns the link and the index just past the closing `)`.
fn parse_link_at(line: &str, chars: &[(usize, char)], open: usize) -> Option<(InlineLink, usize)> {
    let mut depth = 0usize;
    let mut close = None;
    for (j, &(_, c)) in chars.iter().enumerate().skip(open) {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(j);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close?;
    if chars.get(close + 1).map(|&(_, c)| c) != Some('(') {
        return None;
    }

    let mut depth = 0usize;
    let mut end = None;
    for (j, &(_, c)) in chars.iter().enumerate().skip(close + 1) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(j);
                    break;
                }
            }
            _ => {}
        }
    }
    let end = end?;

    let text = &line[chars[open].0 + 1..chars[close].0];
    let inner = line[chars[close + 1].0 + 1..chars[end].0].trim();
    let target = inner
        .split_once(char::is_whitespace)
        .map(|(t, _)| t)
        .unwrap_or(inner)
        .trim_start_matches('<')
        .trim_end_matches('>');

    let link = InlineLink {
        text: text.to_string(),
        target: target.to_string(),
        column: open + 1,
        start: chars[open].0,
        end: chars[end].0 + 1,
    };
    Some((link, end + 1))
}

/// Line with links, code spans and bare URLs blanked out.
///
/// Blanking keeps byte lengths, so offsets into the result match the input.
pub fn plain_text(line: &str) -> String {
    let mut out: Vec<u8> = line.as_bytes().to_vec();
    let mut blank = |start: usize, end: usize| {
        for b in &mut out[start..end] {
            *b = b' ';
        }
    };

    for link in links(line) {
        blank(link.start, link.end);
    }

    let mut code_start = None;
    for (idx, ch) in line.char_indices() {
        if ch == '`' {
            match code_start.take() {
                Some(start) => blank(start, idx + 1),
                None => code_start = Some(idx),
            }
        }
    }

    let mut offset = 0;
    for word in line.split(' ') {
        if word.starts_with("http://") || word.starts_with("https://") || word.starts_with('/') {
            blank(offset, offset + word.len());
        }
        offset += word.len() + 1;
    }

    // blanking replaced whole multi-byte characters, so the bytes stay valid UTF-8
    String::from_utf8(out).unwrap_or_default()
}
