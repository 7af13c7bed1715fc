//! Error types for yamlet parsing.

use thiserror::Error;

/// Result type for yamlet parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying the filename and target type for error reporting.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
    pub type_name: Option<&'static str>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
            type_name: None,
        }
    }

    /// Attach the name of the type the parsed mapping will become.
    pub fn for_type(mut self, type_name: &'static str) -> Self {
        self.type_name = Some(type_name);
        self
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self, line: usize, col: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at {}:{} of <{}>", line + 1, col + 1, name),
            None => String::new(),
        }
    }

    /// Format a suffix naming the target type, if known.
    pub fn type_suffix(&self) -> String {
        match self.type_name {
            Some(name) => format!(" for {}", name),
            None => String::new(),
        }
    }

    /// Format a suffix naming the file without a position.
    pub fn file_suffix(&self) -> String {
        match &self.filename {
            Some(name) => format!(" in <{}>", name),
            None => String::new(),
        }
    }
}

/// Error type for yamlet parsing and materialization.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A line is not at the indentation its block expects, or a nesting
    /// step is not a multiple of two spaces.
    #[error("Unexpected indent \"{0}\"{1}")]
    StructuralIndentation(String, String),

    /// A key appears twice in one mapping.
    #[error("Duplicate key \"{0}\"{1}")]
    DuplicateKey(String, String),

    /// A mapping was requested from a block with no lines.
    #[error("Empty object{0}")]
    EmptyObject(String),

    /// A line at sequence level does not start with "-".
    #[error("Expected sequence item \"{0}\"{1}")]
    ExpectedSequenceItem(String, String),

    /// A sequence item appears among the keys of a mapping.
    #[error("Unexpected sequence item \"{0}\"{1}")]
    UnexpectedSequenceItem(String, String),

    /// The factory for a type could not build it from the parsed fields.
    #[error("Cannot build {0}: {1}")]
    MalformedLine(String, String),

    /// Reading the source failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Create an error with location information.
    pub fn with_location(self, ctx: &ParseContext, line: usize, col: usize) -> Self {
        let suffix = format!("{}{}", ctx.type_suffix(), ctx.loc_suffix(line, col));
        match self {
            ParseError::StructuralIndentation(text, _) => {
                ParseError::StructuralIndentation(text, suffix)
            }
            ParseError::DuplicateKey(key, _) => ParseError::DuplicateKey(key, suffix),
            ParseError::EmptyObject(_) => ParseError::EmptyObject(suffix),
            ParseError::ExpectedSequenceItem(text, _) => {
                ParseError::ExpectedSequenceItem(text, suffix)
            }
            ParseError::UnexpectedSequenceItem(text, _) => {
                ParseError::UnexpectedSequenceItem(text, suffix)
            }
            other => other,
        }
    }

    /// Create a builder failure for the named type.
    pub fn malformed(type_name: &str, reason: impl Into<String>) -> Self {
        ParseError::MalformedLine(type_name.to_string(), reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_requires_filename() {
        let ctx = ParseContext::new(None);
        let err = ParseError::DuplicateKey("name".into(), String::new()).with_location(&ctx, 1, 0);
        assert_eq!(err.to_string(), "Duplicate key \"name\"");
    }

    #[test]
    fn test_location_and_type() {
        let ctx = ParseContext::new(Some("people.yaml")).for_type("Person");
        let err = ParseError::DuplicateKey("name".into(), String::new()).with_location(&ctx, 1, 0);
        assert_eq!(
            err.to_string(),
            "Duplicate key \"name\" for Person at 2:1 of <people.yaml>"
        );
    }

    #[test]
    fn test_malformed_passes_through() {
        let ctx = ParseContext::new(Some("a.yaml"));
        let err = ParseError::malformed("Person", "missing field `name`").with_location(&ctx, 3, 3);
        assert_eq!(err.to_string(), "Cannot build Person: missing field `name`");
    }
}
