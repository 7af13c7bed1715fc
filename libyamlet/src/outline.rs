//! Phase 2: Outline
//!
//! The outline phase groups scanned lines into blocks by indentation:
//! - `span`: the run of deeper lines owned by a key or a sequence item
//! - `segment`: one sub-block per sequence item at a block's base indent
//!
//! Blocks are borrowed slices of the scanned lines; nothing is copied.

use crate::error::{ParseContext, ParseError, Result};
use crate::scanner::{is_scalar_item, starts_with_marker, Line};

/// Return the contiguous run of lines starting at `start` that are indented
/// strictly deeper than `owner_indent`.
pub fn span(block: &[Line], start: usize, owner_indent: usize) -> &[Line] {
    let start = start.min(block.len());
    let end = block[start..]
        .iter()
        .position(|line| line.indent <= owner_indent)
        .map_or(block.len(), |n| start + n);
    &block[start..end]
}

/// Whether a block holds a sequence: its first line is a sequence item.
pub fn is_sequence(block: &[Line]) -> bool {
    block
        .first()
        .is_some_and(|line| starts_with_marker(&line.text))
}

/// Check that a line sits an even number of spaces at or below `base`.
pub fn check_step(line: &Line, base: usize, ctx: &ParseContext) -> Result<()> {
    if line.indent < base || (line.indent - base) % 2 != 0 {
        return Err(indent_error(line, ctx));
    }
    Ok(())
}

/// Build the indentation error for a line.
pub fn indent_error(line: &Line, ctx: &ParseContext) -> ParseError {
    ParseError::StructuralIndentation(line.trimmed().to_string(), String::new()).with_location(
        ctx,
        line.number,
        line.indent,
    )
}

/// Split a sequence block into one sub-block per item.
///
/// A scalar item is a sub-block of its own line. Any other item owns the
/// deeper lines that follow it.
pub fn segment<'a>(block: &'a [Line], ctx: &ParseContext) -> Result<Vec<&'a [Line]>> {
    let mut items = Vec::new();
    let base = match block.first() {
        Some(first) => first.indent,
        None => return Ok(items),
    };

    let mut i = 0;
    while i < block.len() {
        let line = &block[i];
        check_step(line, base, ctx)?;

        // Deeper lines are only reachable here when nothing owns them
        if line.indent != base {
            return Err(indent_error(line, ctx));
        }

        if !starts_with_marker(&line.text) {
            return Err(
                ParseError::ExpectedSequenceItem(line.trimmed().to_string(), String::new())
                    .with_location(ctx, line.number, line.indent),
            );
        }

        if is_scalar_item(&line.text) {
            items.push(&block[i..i + 1]);
            i += 1;
            continue;
        }

        let body = span(block, i + 1, base);
        for nested in body {
            check_step(nested, base, ctx)?;
        }
        items.push(&block[i..i + 1 + body.len()]);
        i += 1 + body.len();
    }

    Ok(items)
}
