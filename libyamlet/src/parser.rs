//! Phase 3: Value Parser
//!
//! The value parser recursively builds values from outlined blocks:
//! - Mappings: one key per line at the block's base indent
//! - Sequences: one value per segmented item
//! - Documents: a lone scalar item, a sequence, or a mapping
//!
//! Builders take borrowed line slices and never look past their block.

use crate::error::{ParseContext, ParseError, Result};
use crate::outline::{check_step, indent_error, is_sequence, segment, span};
use crate::scanner::{
    is_blank, is_detached_marker, is_scalar_item, scalar_item_value, split_key_value,
    starts_with_marker, Line, MARKER,
};
use crate::value::{Mapping, Value};

/// Indentation step between a block and a block nested in it.
const STEP: usize = 2;

/// Build one document from its lines.
pub fn parse_document(block: &[Line], ctx: &ParseContext) -> Result<Value> {
    if let [line] = block {
        if is_scalar_item(&line.text) {
            return Ok(Value::Scalar(scalar_item_value(&line.text).to_string()));
        }
    }

    if is_sequence(block) {
        return parse_sequence(block, ctx);
    }

    parse_mapping(block, ctx).map(Value::Mapping)
}

/// Error for a document with no content.
pub fn empty_document(ctx: &ParseContext) -> ParseError {
    ParseError::EmptyObject(format!("{}{}", ctx.type_suffix(), ctx.file_suffix()))
}

/// Error for a key or item whose nested block is empty.
fn empty_object(line: &Line, ctx: &ParseContext) -> ParseError {
    ParseError::EmptyObject(String::new()).with_location(ctx, line.number, line.indent)
}

// ============================================================================
// Mapping Parsing
// ============================================================================

/// Build a mapping from a block whose lines share one base indent.
pub fn parse_mapping(block: &[Line], ctx: &ParseContext) -> Result<Mapping> {
    let base = match block.first() {
        Some(first) => first.indent,
        None => return Err(empty_document(ctx)),
    };

    let mut map = Mapping::new();
    let mut i = 0;

    while i < block.len() {
        let line = &block[i];
        if line.indent != base {
            return Err(indent_error(line, ctx));
        }

        if starts_with_marker(&line.text) && !is_scalar_item(&line.text) {
            return Err(unexpected_item(line, ctx));
        }

        let (key, value) = split_key_value(&line.text);
        if map.contains_key(key) {
            return Err(duplicate_key(key, line, ctx));
        }

        // Anonymous entry: "- value" among keys is stored under "", and a
        // later one replaces it
        if is_scalar_item(&line.text) {
            let value = Value::Scalar(scalar_item_value(&line.text).to_string());
            map.insert(String::new(), value);
            i += 1;
            continue;
        }

        if !value.is_empty() {
            map.insert(key.to_string(), Value::Scalar(value.to_string()));
            i += 1;
            continue;
        }

        let nested = span(block, i + 1, base);
        let first = nested.first().ok_or_else(|| empty_object(line, ctx))?;
        check_step(first, base + STEP, ctx)?;

        let value = if is_sequence(nested) {
            parse_sequence(nested, ctx)?
        } else {
            Value::Mapping(parse_mapping(nested, ctx)?)
        };
        map.insert(key.to_string(), value);
        i += 1 + nested.len();
    }

    Ok(map)
}

fn duplicate_key(key: &str, line: &Line, ctx: &ParseContext) -> ParseError {
    ParseError::DuplicateKey(key.to_string(), String::new()).with_location(
        ctx,
        line.number,
        line.indent,
    )
}

fn unexpected_item(line: &Line, ctx: &ParseContext) -> ParseError {
    ParseError::UnexpectedSequenceItem(line.trimmed().to_string(), String::new())
        .with_location(ctx, line.number, line.indent)
}

// ============================================================================
// Sequence Parsing
// ============================================================================

/// Build a sequence from a block of "-" items. An empty block is an empty
/// sequence.
pub fn parse_sequence(block: &[Line], ctx: &ParseContext) -> Result<Value> {
    let items = segment(block, ctx)?;
    let mut values = Vec::with_capacity(items.len());
    for item in items {
        values.push(parse_item(item, ctx)?);
    }
    Ok(Value::Sequence(values))
}

/// Build the value of one segmented item.
fn parse_item(item: &[Line], ctx: &ParseContext) -> Result<Value> {
    let head = &item[0];
    if is_scalar_item(&head.text) {
        return Ok(Value::Scalar(scalar_item_value(&head.text).to_string()));
    }
    if !is_detached_marker(&head.text) {
        return Err(unexpected_item(head, ctx));
    }

    // "- key: value" reads as "  key: value" two columns deeper
    let mut body = Vec::with_capacity(item.len());
    let unmarked = head.text.replacen(MARKER, " ", 1);
    if !is_blank(&unmarked) {
        body.push(Line::new(unmarked, head.number));
    }
    body.extend_from_slice(&item[1..]);

    if body.is_empty() {
        return Err(empty_object(head, ctx));
    }

    if is_sequence(&body) {
        parse_sequence(&body, ctx)
    } else {
        parse_mapping(&body, ctx).map(Value::Mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;

    fn doc(source: &str) -> Result<Value> {
        parse_document(&scan(source), &ParseContext::default())
    }

    fn dump(source: &str) -> String {
        format!("{:?}", doc(source).unwrap())
    }

    #[test]
    fn test_flat_mapping() {
        assert_eq!(dump("name: Ann\nage: 30"), r#"{"name": "Ann", "age": "30"}"#);
    }

    #[test]
    fn test_nested_mapping() {
        assert_eq!(
            dump("address:\n  city: Lisbon\n  zip: 1000"),
            r#"{"address": {"city": "Lisbon", "zip": "1000"}}"#
        );
    }

    #[test]
    fn test_sequence_of_mappings() {
        assert_eq!(
            dump("- name: Ann\n  age: 30\n- name: Bob\n  age: 25"),
            r#"[{"name": "Ann", "age": "30"}, {"name": "Bob", "age": "25"}]"#
        );
    }

    #[test]
    fn test_single_item_sequence_of_mapping() {
        assert_eq!(dump("- name: Ann\n  age: 30"), r#"[{"name": "Ann", "age": "30"}]"#);
    }

    #[test]
    fn test_mapping_with_sequence_value() {
        let value = doc("tags:\n  - red\n  - green\n  - blue\nsize: 3").unwrap();
        let tags = value.get("tags").and_then(Value::as_sequence).unwrap();
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[2], Value::from("blue"));
    }

    #[test]
    fn test_nested_sequences() {
        assert_eq!(
            dump("-\n  - a\n  - b\n-\n  - c"),
            r#"[["a", "b"], ["c"]]"#
        );
    }

    #[test]
    fn test_lone_scalar_item() {
        assert_eq!(doc("- apple").unwrap(), Value::from("apple"));
    }

    #[test]
    fn test_anonymous_scalar_in_mapping() {
        assert_eq!(dump("name: Ann\n- extra"), r#"{"name": "Ann", "": "extra"}"#);
    }

    #[test]
    fn test_last_anonymous_scalar_wins() {
        assert_eq!(
            dump("name: Ann\n- a\n- b"),
            r#"{"name": "Ann", "": "b"}"#
        );
        assert_eq!(
            dump("name: Ann\n- a\nage: 30\n- a"),
            r#"{"name": "Ann", "": "a", "age": "30"}"#
        );
    }

    #[test]
    fn test_items_with_inner_colons_stay_scalar() {
        assert_eq!(
            dump("times:\n  - 10:30\n  - http://x.org"),
            r#"{"times": ["10:30", "http://x.org"]}"#
        );
        assert_eq!(
            dump("name: Ann\n- 10:30"),
            r#"{"name": "Ann", "": "10:30"}"#
        );
    }

    #[test]
    fn test_mapping_item_ending_in_colon() {
        assert_eq!(
            dump("- address:\n    city: Lisbon"),
            r#"[{"address": {"city": "Lisbon"}}]"#
        );
    }

    #[test]
    fn test_marker_glued_to_key() {
        let ctx = ParseContext::new(Some("people.yaml"));
        let err = parse_document(&scan("-name: Ann\n  age: 30"), &ctx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected sequence item \"-name: Ann\" at 1:1 of <people.yaml>"
        );
    }

    #[test]
    fn test_duplicate_key() {
        let err = doc("name: Ann\nname: Bob").unwrap_err();
        assert_eq!(err.to_string(), "Duplicate key \"name\"");
    }

    #[test]
    fn test_duplicate_key_deep() {
        let source = "a:\n  b:\n    - x: 1\n      x: 2";
        assert!(matches!(doc(source), Err(ParseError::DuplicateKey(..))));
    }

    #[test]
    fn test_duplicate_nested_key_name() {
        assert!(matches!(
            doc("address:\n  city: Lisbon\naddress:\n  city: Porto"),
            Err(ParseError::DuplicateKey(..))
        ));
    }

    #[test]
    fn test_same_key_in_sibling_mappings() {
        assert!(doc("a:\n  x: 1\nb:\n  x: 2").is_ok());
    }

    #[test]
    fn test_sibling_indent_mismatch() {
        assert!(matches!(
            doc(" name: Ann\n  age: 30"),
            Err(ParseError::StructuralIndentation(..))
        ));
    }

    #[test]
    fn test_odd_nesting_step() {
        assert!(matches!(
            doc("address:\n   city: Lisbon"),
            Err(ParseError::StructuralIndentation(..))
        ));
    }

    #[test]
    fn test_dedent_inside_nested_block() {
        assert!(matches!(
            doc("a:\n    b: 1\n  c: 2"),
            Err(ParseError::StructuralIndentation(..))
        ));
    }

    #[test]
    fn test_key_without_value_or_block() {
        assert!(matches!(
            doc("address:\nname: Ann"),
            Err(ParseError::EmptyObject(_))
        ));
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(doc(""), Err(ParseError::EmptyObject(_))));
    }

    #[test]
    fn test_bare_item_without_body() {
        assert!(matches!(doc("- a\n-"), Err(ParseError::EmptyObject(_))));
    }

    #[test]
    fn test_item_among_keys() {
        assert!(matches!(
            doc("name: Ann\n- age: 30"),
            Err(ParseError::UnexpectedSequenceItem(..))
        ));
    }

    #[test]
    fn test_empty_sequence() {
        let ctx = ParseContext::default();
        assert_eq!(parse_sequence(&[], &ctx).unwrap(), Value::Sequence(vec![]));
    }

    #[test]
    fn test_error_location() {
        let ctx = ParseContext::new(Some("people.yaml"));
        let err = parse_document(&scan("name: Ann\n\n  age: 30"), &ctx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected indent \"age: 30\" at 3:3 of <people.yaml>"
        );
    }
}
