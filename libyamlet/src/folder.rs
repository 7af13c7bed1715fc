//! Reading every yamlet file in a folder.
//!
//! Files are picked by extension and visited in file-name order. Each file
//! holds one document, and is closed before the call that read it returns.

use std::fs::{self, File};
use std::io::BufReader;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::error::{ParseContext, Result};
use crate::materialize::{instance, FromFields};
use crate::parser::parse_document;
use crate::scanner::scan_reader;
use crate::value::Value;

/// Extension of the files read from a folder.
pub const EXTENSION: &str = "yaml";

/// List the yamlet files of a folder, sorted by file name.
pub fn list(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map(|e| e == EXTENSION).unwrap_or(false) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("found {} .{} files in {}", files.len(), EXTENSION, dir.display());
    Ok(files)
}

fn context_for(path: &Path) -> ParseContext {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    ParseContext::new(Some(&name))
}

fn read_document(path: &Path, ctx: &ParseContext) -> Result<Value> {
    trace!("parsing {}", path.display());
    let lines = scan_reader(BufReader::new(File::open(path)?))?;
    parse_document(&lines, ctx)
}

/// Parse one file into a generic value.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    read_document(path, &context_for(path))
}

/// Parse one file into an instance of `T`.
pub fn from_file<T: FromFields>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let ctx = context_for(path).for_type(T::TYPE_NAME);
    let value = read_document(path, &ctx)?;
    instance(value, &ctx)
}

/// Parse every file of a folder, in file-name order.
/// The first file that fails to parse fails the whole call.
pub fn from_folder<T: FromFields>(dir: impl AsRef<Path>) -> Result<Vec<T>> {
    list(dir)?.iter().map(|path| from_file(path)).collect()
}

/// Parse the files of a folder one at a time, in file-name order.
pub fn iter<T: FromFields>(dir: impl AsRef<Path>) -> Result<FolderIter<T>> {
    Ok(FolderIter {
        paths: list(dir)?.into_iter(),
        _target: PhantomData,
    })
}

/// Lazy iterator over the instances parsed from a folder.
///
/// After a file fails to parse the iterator yields nothing more.
pub struct FolderIter<T> {
    paths: std::vec::IntoIter<PathBuf>,
    _target: PhantomData<fn() -> T>,
}

impl<T> FolderIter<T> {
    /// Files not yet visited.
    pub fn remaining(&self) -> &[PathBuf] {
        self.paths.as_slice()
    }
}

impl<T: FromFields> Iterator for FolderIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        let result = from_file(&path);
        if result.is_err() {
            self.paths = Vec::new().into_iter();
        }
        Some(result)
    }
}
