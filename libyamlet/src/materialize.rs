//! Materialization of parsed values into typed instances.
//!
//! Each target type supplies its own factory by implementing [`FromFields`].
//! The parser never inspects target types; it hands over a [`Fields`] view
//! of one mapping and the factory decides which fields it needs, which it
//! defaults, and how scalar text is coerced.

use std::fmt::Display;
use std::str::FromStr;

use num_bigint::BigInt;

use crate::error::{ParseContext, ParseError, Result};
use crate::value::{Mapping, Value};

/// Key under which an anonymous scalar is handed to a factory.
pub const ANONYMOUS: &str = "";

/// A type that can be built from the fields of a parsed mapping.
///
/// # Example
///
/// ```
/// use libyamlet::{from_str, Fields, FromFields, Result};
///
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl FromFields for Point {
///     const TYPE_NAME: &'static str = "Point";
///
///     fn from_fields(mut fields: Fields) -> Result<Self> {
///         Ok(Point {
///             x: fields.parse("x")?,
///             y: fields.parse_or("y", 0)?,
///         })
///     }
/// }
///
/// let p: Point = from_str("x: 3").unwrap();
/// assert_eq!((p.x, p.y), (3, 0));
/// ```
pub trait FromFields: Sized {
    /// Name used in diagnostics.
    const TYPE_NAME: &'static str;

    /// Build an instance, failing if mandatory fields are missing.
    fn from_fields(fields: Fields) -> Result<Self>;
}

/// The fields of one mapping, consumed by a factory.
///
/// Accessors remove the field they read, so [`Fields::finish`] can report
/// anything left over.
#[derive(Debug)]
pub struct Fields {
    type_name: &'static str,
    map: Mapping,
}

impl Fields {
    /// Wrap a mapping destined for the named type.
    pub fn new(type_name: &'static str, map: Mapping) -> Self {
        Self { type_name, map }
    }

    /// Name of the type being built.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether a field is present.
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Names of the fields not yet consumed, in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Remove and return a field in any shape.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.map.shift_remove(key)
    }

    fn error(&self, reason: impl Into<String>) -> ParseError {
        ParseError::malformed(self.type_name, reason)
    }

    /// A mandatory scalar field.
    pub fn required(&mut self, key: &str) -> Result<String> {
        self.optional(key)?
            .ok_or_else(|| self.error(format!("missing field `{}`", key)))
    }

    /// An optional scalar field.
    pub fn optional(&mut self, key: &str) -> Result<Option<String>> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::Scalar(s)) => Ok(Some(s)),
            Some(other) => Err(self.error(format!(
                "field `{}` must be a scalar, found a {}",
                key,
                other.kind()
            ))),
        }
    }

    /// The anonymous scalar of a "- value" entry.
    pub fn anonymous(&mut self) -> Result<String> {
        self.required(ANONYMOUS)
    }

    /// A mandatory field converted with [`FromStr`].
    pub fn parse<F>(&mut self, key: &str) -> Result<F>
    where
        F: FromStr,
        F::Err: Display,
    {
        let text = self.required(key)?;
        self.convert(key, &text)
    }

    /// An optional field converted with [`FromStr`], or `default` when absent.
    pub fn parse_or<F>(&mut self, key: &str, default: F) -> Result<F>
    where
        F: FromStr,
        F::Err: Display,
    {
        match self.optional(key)? {
            Some(text) => self.convert(key, &text),
            None => Ok(default),
        }
    }

    fn convert<F>(&self, key: &str, text: &str) -> Result<F>
    where
        F: FromStr,
        F::Err: Display,
    {
        text.parse()
            .map_err(|e| self.error(format!("field `{}` has invalid value \"{}\": {}", key, text, e)))
    }

    /// A mandatory integer field of any size.
    pub fn integer(&mut self, key: &str) -> Result<BigInt> {
        let text = self.required(key)?;
        let digits: String = text.chars().filter(|c| *c != '_').collect();
        self.convert(key, &digits)
    }

    /// A mandatory nested mapping built into another type.
    pub fn nested<U: FromFields>(&mut self, key: &str) -> Result<U> {
        self.nested_opt(key)?
            .ok_or_else(|| self.error(format!("missing field `{}`", key)))
    }

    /// An optional nested mapping built into another type.
    pub fn nested_opt<U: FromFields>(&mut self, key: &str) -> Result<Option<U>> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::Mapping(map)) => U::from_fields(Fields::new(U::TYPE_NAME, map)).map(Some),
            Some(other) => Err(self.error(format!(
                "field `{}` must be a mapping, found a {}",
                key,
                other.kind()
            ))),
        }
    }

    /// A sequence field whose items are built into another type.
    /// An absent field is an empty list.
    pub fn list<U: FromFields>(&mut self, key: &str) -> Result<Vec<U>> {
        match self.take(key) {
            None => Ok(Vec::new()),
            Some(value @ Value::Sequence(_)) => instances(value, &ParseContext::default()),
            Some(other) => Err(self.error(format!(
                "field `{}` must be a sequence, found a {}",
                key,
                other.kind()
            ))),
        }
    }

    /// Fail if any field was left unread.
    pub fn finish(self) -> Result<()> {
        match self.map.keys().next() {
            None => Ok(()),
            Some(key) => Err(self.error(format!("unknown field `{}`", key))),
        }
    }
}

/// A materialized document: one instance, or a list mirroring a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Materialized<T> {
    Instance(T),
    List(Vec<Materialized<T>>),
}

impl<T> Materialized<T> {
    /// Returns the instance if this is not a list.
    pub fn into_instance(self) -> Option<T> {
        match self {
            Materialized::Instance(t) => Some(t),
            Materialized::List(_) => None,
        }
    }

    /// Returns the items if this is a list.
    pub fn into_list(self) -> Option<Vec<Materialized<T>>> {
        match self {
            Materialized::Instance(_) => None,
            Materialized::List(items) => Some(items),
        }
    }
}

/// Build one instance from a mapping.
fn build<T: FromFields>(map: Mapping, ctx: &ParseContext) -> Result<T> {
    T::from_fields(Fields::new(T::TYPE_NAME, map)).map_err(|e| match e {
        ParseError::MalformedLine(type_name, reason) => {
            ParseError::MalformedLine(type_name, format!("{}{}", reason, ctx.file_suffix()))
        }
        other => other,
    })
}

/// Wrap an anonymous scalar as a one-field mapping.
fn anonymous_mapping(text: String) -> Mapping {
    let mut map = Mapping::new();
    map.insert(ANONYMOUS.to_string(), Value::Scalar(text));
    map
}

/// Convert a value through the factory of `T`.
///
/// Mappings become instances, sequences become lists of converted items,
/// and a bare scalar is handed over under the anonymous key.
pub fn materialize<T: FromFields>(value: Value, ctx: &ParseContext) -> Result<Materialized<T>> {
    match value {
        Value::Mapping(map) => build(map, ctx).map(Materialized::Instance),
        Value::Scalar(text) => build(anonymous_mapping(text), ctx).map(Materialized::Instance),
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| materialize(item, ctx))
            .collect::<Result<Vec<_>>>()
            .map(Materialized::List),
    }
}

/// Convert a value that must be a single instance.
pub fn instance<T: FromFields>(value: Value, ctx: &ParseContext) -> Result<T> {
    match value {
        Value::Sequence(_) => Err(ParseError::malformed(
            T::TYPE_NAME,
            format!("expected a mapping, found a sequence{}", ctx.file_suffix()),
        )),
        Value::Mapping(map) => build(map, ctx),
        Value::Scalar(text) => build(anonymous_mapping(text), ctx),
    }
}

/// Convert a value that must be a flat sequence of instances.
pub fn instances<T: FromFields>(value: Value, ctx: &ParseContext) -> Result<Vec<T>> {
    match value {
        Value::Sequence(items) => items.into_iter().map(|item| instance(item, ctx)).collect(),
        other => Err(ParseError::malformed(
            T::TYPE_NAME,
            format!("expected a sequence, found a {}{}", other.kind(), ctx.file_suffix()),
        )),
    }
}
