//! Line classifier.
//!
//! Pages are segmented line by line. [`classify`] looks at a single line in
//! isolation; context-dependent decisions (is this `|` line followed by a
//! separator? are we inside a fence?) are made by the parser.

/// What a single line looks like on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only.
    Blank,
    /// Opening (or closing) code fence.
    Fence {
        marker: char,
        len: usize,
        info: &'a str,
    },
    /// ATX heading.
    Heading { level: u8, text: &'a str },
    /// Blockquote line; `content` has the `>` and one following space removed.
    Quote { content: &'a str },
    /// MDX import/export, JSX element or HTML comment.
    Markup,
    /// Contains an unescaped pipe and may start a table.
    TableRow,
    /// Anything else.
    Text,
}

/// Classify a line.
pub fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    if let Some((marker, len, info)) = fence(trimmed) {
        return LineKind::Fence { marker, len, info };
    }

    if let Some((level, text)) = heading(trimmed) {
        return LineKind::Heading { level, text };
    }

    if let Some(rest) = trimmed.strip_prefix('>') {
        let content = rest.strip_prefix(' ').unwrap_or(rest);
        return LineKind::Quote { content };
    }

    if is_markup(trimmed) {
        return LineKind::Markup;
    }

    if split_cells(trimmed).len() > 1 {
        return LineKind::TableRow;
    }

    LineKind::Text
}

/// Parse an opening fence: three or more backticks or tildes, then an info string.
fn fence(trimmed: &str) -> Option<(char, usize, &str)> {
    let marker = trimmed.chars().next()?;
    if marker != '`' && marker != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|&c| c == marker).count();
    if len < 3 {
        return None;
    }
    // marker chars are ASCII, so len is also the byte length
    let info = trimmed[len..].trim();
    if marker == '`' && info.contains('`') {
        return None;
    }
    Some((marker, len, info))
}

/// Whether `trimmed` closes a fence opened with `marker` repeated `len` times.
pub fn is_closing_fence(line: &str, marker: char, len: usize) -> bool {
    let trimmed = line.trim();
    let count = trimmed.chars().take_while(|&c| c == marker).count();
    count >= len && count == trimmed.chars().count()
}

fn heading(trimmed: &str) -> Option<(u8, &str)> {
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    let text = rest.trim();
    // optional closing sequence: "## Title ##"
    let text = match text.trim_end_matches('#') {
        stripped if stripped.len() < text.len() && stripped.ends_with(' ') => stripped.trim_end(),
        _ => text,
    };
    Some((level as u8, text))
}

fn is_markup(trimmed: &str) -> bool {
    if trimmed.starts_with("import ") || trimmed.starts_with("export ") {
        return true;
    }
    if trimmed.starts_with("{/*") {
        return true;
    }
    let mut chars = trimmed.chars();
    if chars.next() != Some('<') {
        return false;
    }
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!' || c == '>')
}

/// Whether a line is a table delimiter row (`| --- | :---: |`).
pub fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    if !trimmed.contains('|') || !trimmed.contains('-') {
        return false;
    }
    let cells = split_cells(trimmed);
    !cells.is_empty()
        && cells.iter().all(|cell| {
            let inner = cell.trim_start_matches(':').trim_end_matches(':');
            !inner.is_empty() && inner.chars().all(|c| c == '-')
        })
}

/// Split a table row into trimmed cells.
///
/// Leading and trailing pipes are optional. `\|` and pipes inside inline code
/// spans do not split cells.
pub fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_code = false;
    let mut escaped = false;
    let mut saw_pipe = false;

    for ch in trimmed.chars() {
        if escaped {
            if ch != '|' {
                current.push('\\');
            }
            current.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '`' => {
                in_code = !in_code;
                current.push(ch);
            }
            '|' if !in_code => {
                saw_pipe = true;
                cells.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    if escaped {
        current.push('\\');
    }
    cells.push(current);

    if !saw_pipe {
        return vec![trimmed.to_string()];
    }

    if trimmed.starts_with('|') {
        cells.remove(0);
    }
    if trimmed.ends_with('|') && !trimmed.ends_with("\\|") && !cells.is_empty() {
        cells.pop();
    }

    cells.into_iter().map(|c| c.trim().to_string()).collect()
}
