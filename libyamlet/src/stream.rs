//! Lazy reading of multi-document streams.
//!
//! Documents are separated by a bare "-" at column zero. A separator that
//! opens the stream is skipped. Each call to `next` reads only as far as
//! the end of the next document.

use std::io::{BufRead, Lines};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem;

use log::debug;

use crate::error::{ParseContext, ParseError, Result};
use crate::materialize::{materialize, FromFields, Materialized};
use crate::parser::parse_document;
use crate::scanner::{is_blank, Line, MARKER};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingFirstSeparator,
    Accumulating,
    Done,
}

/// Iterator over the documents of a stream, as generic values.
pub struct Documents<R> {
    lines: Lines<R>,
    number: usize,
    state: State,
    pending: Vec<Line>,
    ctx: ParseContext,
}

impl<R: BufRead> Documents<R> {
    /// Read documents from a reader.
    pub fn new(reader: R) -> Self {
        Self::with_context(reader, ParseContext::default())
    }

    /// Read documents from a reader, reporting errors with `ctx`.
    pub fn with_context(reader: R, ctx: ParseContext) -> Self {
        Self {
            lines: reader.lines(),
            number: 0,
            state: State::AwaitingFirstSeparator,
            pending: Vec::new(),
            ctx,
        }
    }

    /// The context errors are reported with.
    pub fn context(&self) -> &ParseContext {
        &self.ctx
    }

    /// Stop producing documents.
    pub(crate) fn halt(&mut self) {
        self.state = State::Done;
        self.pending.clear();
    }

    /// Read the next non-blank line.
    fn next_line(&mut self) -> Option<std::io::Result<Line>> {
        for text in self.lines.by_ref() {
            let number = self.number;
            self.number += 1;
            match text {
                Ok(text) if is_blank(&text) => continue,
                Ok(text) => return Some(Ok(Line::new(text, number))),
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }

    /// Build the accumulated lines into a document.
    fn emit(&mut self) -> Result<Value> {
        let block = mem::take(&mut self.pending);
        if let Some(first) = block.first() {
            debug!("document at line {} ({} lines)", first.number + 1, block.len());
        }
        let result = parse_document(&block, &self.ctx);
        if result.is_err() {
            self.halt();
        }
        result
    }
}

/// A bare "-" at column zero.
fn is_separator(line: &Line) -> bool {
    let mut chars = line.trimmed().chars();
    line.indent == 0 && chars.next() == Some(MARKER) && chars.next().is_none()
}

impl<R: BufRead> Iterator for Documents<R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.state == State::Done {
                return None;
            }

            let line = match self.next_line() {
                None => {
                    self.state = State::Done;
                    if self.pending.is_empty() {
                        return None;
                    }
                    return Some(self.emit());
                }
                Some(Err(e)) => {
                    self.halt();
                    return Some(Err(e.into()));
                }
                Some(Ok(line)) => line,
            };

            if !is_separator(&line) {
                self.state = State::Accumulating;
                self.pending.push(line);
                continue;
            }

            if self.state == State::AwaitingFirstSeparator {
                self.state = State::Accumulating;
                continue;
            }

            if self.pending.is_empty() {
                self.halt();
                return Some(Err(ParseError::EmptyObject(String::new()).with_location(
                    &self.ctx,
                    line.number,
                    line.indent,
                )));
            }

            return Some(self.emit());
        }
    }
}

impl<R: BufRead> FusedIterator for Documents<R> {}

/// Iterator over the documents of a stream, materialized as `T`.
pub struct Stream<R, T> {
    documents: Documents<R>,
    _target: PhantomData<fn() -> T>,
}

impl<R: BufRead, T: FromFields> Stream<R, T> {
    /// Read typed documents from a reader.
    pub fn new(reader: R) -> Self {
        let ctx = ParseContext::default().for_type(T::TYPE_NAME);
        Self::from_documents(Documents::with_context(reader, ctx))
    }

    /// Materialize the documents of an existing reader.
    pub fn from_documents(documents: Documents<R>) -> Self {
        Self {
            documents,
            _target: PhantomData,
        }
    }
}

impl<R: BufRead, T: FromFields> Iterator for Stream<R, T> {
    type Item = Result<Materialized<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = match self.documents.next()? {
            Ok(value) => value,
            Err(e) => return Some(Err(e)),
        };
        let result = materialize(value, self.documents.context());
        if result.is_err() {
            self.documents.halt();
        }
        Some(result)
    }
}

impl<R: BufRead, T: FromFields> FusedIterator for Stream<R, T> {}
