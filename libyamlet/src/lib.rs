//! yamlet parser implementation.
//!
//! yamlet reads a small, indentation-significant subset of YAML meant for
//! hand-written data files: mappings, sequences and untyped scalars, with
//! no flow collections, anchors, tags, comments or multi-line scalars.
//!
//! # Parsing Pipeline
//!
//! The parser operates in three phases:
//!
//! 1. **Scanner**: Splits source text into non-blank lines and classifies
//!    each one (indentation, sequence marker, key and value).
//!
//! 2. **Outline**: Groups lines into blocks: the span owned by a key and
//!    the items of a sequence.
//!
//! 3. **Value Parser**: Recursively builds mappings and sequences of
//!    scalar text.
//!
//! Parsed values are then materialized into typed instances by factories
//! implementing [`FromFields`].

mod error;
pub mod folder;
mod materialize;
mod outline;
mod parser;
mod scanner;
mod stream;
mod value;

use std::io::BufRead;

pub use error::{ParseContext, ParseError, Result};
pub use materialize::{materialize, Fields, FromFields, Materialized, ANONYMOUS};
pub use scanner::{indentation_of, is_scalar_item, split_key_value, trim};
pub use stream::{Documents, Stream};
pub use value::{Mapping, Value};

/// Parse a yamlet document from a string.
///
/// # Example
///
/// ```
/// use libyamlet::parse;
///
/// let value = parse("name: Ann\nage: 30").unwrap();
/// assert_eq!(value.get("age").and_then(|v| v.as_str()), Some("30"));
/// ```
pub fn parse(input: &str) -> Result<Value> {
    parse_with_filename(input, None)
}

/// Parse a yamlet document from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Value> {
    let ctx = ParseContext::new(filename);

    // Phase 1: Scan source into lines
    let lines = scanner::scan(input);

    // Phases 2 and 3: Outline and build the value
    parser::parse_document(&lines, &ctx)
}

/// Parse a yamlet document from a reader.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Value> {
    let lines = scanner::scan_reader(reader)?;
    parser::parse_document(&lines, &ParseContext::default())
}

/// Parse a single object from a string.
pub fn from_str<T: FromFields>(input: &str) -> Result<T> {
    let ctx = ParseContext::default().for_type(T::TYPE_NAME);
    let value = parser::parse_document(&scanner::scan(input), &ctx)?;
    materialize::instance(value, &ctx)
}

/// Parse a single object from a reader.
pub fn from_reader<T: FromFields, R: BufRead>(reader: R) -> Result<T> {
    let ctx = ParseContext::default().for_type(T::TYPE_NAME);
    let value = parser::parse_document(&scanner::scan_reader(reader)?, &ctx)?;
    materialize::instance(value, &ctx)
}

/// Parse a top-level sequence of objects from a string.
/// Empty input is an empty list.
pub fn list_from_str<T: FromFields>(input: &str) -> Result<Vec<T>> {
    let ctx = ParseContext::default().for_type(T::TYPE_NAME);
    let value = parser::parse_sequence(&scanner::scan(input), &ctx)?;
    materialize::instances(value, &ctx)
}

/// Parse a top-level sequence of objects from a reader.
pub fn list_from_reader<T: FromFields, R: BufRead>(reader: R) -> Result<Vec<T>> {
    let ctx = ParseContext::default().for_type(T::TYPE_NAME);
    let value = parser::parse_sequence(&scanner::scan_reader(reader)?, &ctx)?;
    materialize::instances(value, &ctx)
}

/// Lazily read the documents of a multi-document stream as generic values.
pub fn documents<R: BufRead>(reader: R) -> Documents<R> {
    Documents::new(reader)
}

/// Lazily read the documents of a multi-document stream as typed values.
pub fn stream<T: FromFields, R: BufRead>(reader: R) -> Stream<R, T> {
    Stream::new(reader)
}
