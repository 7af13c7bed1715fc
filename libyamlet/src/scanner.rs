//! Phase 1: Scanner
//!
//! The scanner turns source text into lines and classifies each line on
//! its own:
//! - Indentation counting (spaces only)
//! - Sequence marker detection (the "-" prefix)
//! - Key/value splitting on the first colon
//! - Blank line filtering

use std::io::BufRead;

use crate::error::Result;

/// The character that introduces a sequence item.
pub const MARKER: char = '-';

/// The character that separates a key from its value.
pub const SEPARATOR: char = ':';

/// A single non-blank source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Raw content, including indentation.
    pub text: String,
    /// Number of leading spaces.
    pub indent: usize,
    /// Zero-based line number for error reporting.
    pub number: usize,
}

impl Line {
    /// Create a line, computing its indentation.
    pub fn new(text: impl Into<String>, number: usize) -> Self {
        let text = text.into();
        let indent = indentation_of(&text);
        Self {
            text,
            indent,
            number,
        }
    }

    /// The content without surrounding spaces.
    pub fn trimmed(&self) -> &str {
        trim(&self.text)
    }
}

/// Count the number of leading spaces in a line.
/// A line of only spaces has indentation equal to its length.
pub fn indentation_of(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

/// Remove leading and trailing space characters (not other whitespace).
pub fn trim(s: &str) -> &str {
    s.trim_matches(' ')
}

/// Whether a line holds only spaces.
pub fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| b == b' ')
}

/// Whether the trimmed content starts with a sequence marker.
pub fn starts_with_marker(line: &str) -> bool {
    trim(line).starts_with(MARKER)
}

/// Whether a line is a sequence item carrying a bare string, like "- apple".
///
/// Scanning left to right, a marker seen before any other non-space
/// character makes the line an item. A line of only spaces or only
/// markers is not. A line with a key separator opens a mapping item
/// instead, so it is not scalar either; a colon inside a word, as in
/// "- 10:30" or "- http://x", does not count.
pub fn is_scalar_item(line: &str) -> bool {
    let mut marker = false;
    for c in line.chars() {
        match c {
            ' ' => continue,
            MARKER => marker = true,
            _ => return marker && !has_key_separator(line),
        }
    }
    false
}

/// Whether a line holds a colon that ends a key: one followed by a space
/// or by the end of the line.
pub fn has_key_separator(line: &str) -> bool {
    let line = line.trim_end_matches(' ');
    line.match_indices(SEPARATOR)
        .any(|(at, _)| matches!(line[at + 1..].chars().next(), None | Some(' ')))
}

/// Whether the first marker of an item line is followed by a space or ends
/// the line, as in "- a" or "-", rather than running into text like "-a".
pub fn is_detached_marker(line: &str) -> bool {
    match trim(line).strip_prefix(MARKER) {
        Some(rest) => rest.is_empty() || rest.starts_with(' '),
        None => false,
    }
}

/// The value of a scalar item: the trimmed text after the first marker.
pub fn scalar_item_value(line: &str) -> &str {
    let t = trim(line);
    trim(t.strip_prefix(MARKER).unwrap_or(t))
}

/// Split a line on its first colon into a trimmed key and value.
/// Without a colon the whole line is the key and the value is empty.
pub fn split_key_value(line: &str) -> (&str, &str) {
    match line.split_once(SEPARATOR) {
        Some((key, value)) => (trim(key), trim(value)),
        None => (trim(line), ""),
    }
}

/// Split source text into lines, dropping blank ones.
pub fn scan(source: &str) -> Vec<Line> {
    source
        .lines()
        .enumerate()
        .filter(|(_, text)| !is_blank(text))
        .map(|(number, text)| Line::new(text, number))
        .collect()
}

/// Read every line of a reader, dropping blank ones.
pub fn scan_reader<R: BufRead>(reader: R) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    for (number, text) in reader.lines().enumerate() {
        let text = text?;
        if !is_blank(&text) {
            lines.push(Line::new(text, number));
        }
    }
    Ok(lines)
}
