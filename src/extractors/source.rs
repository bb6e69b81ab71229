//! Source text locator
//!
//! Tree-sitter hands us byte offsets. The scan context maps a file id to the
//! path it was parsed from, so a `(file, offset)` pair can be turned back into
//! the exact bytes the author wrote (type expressions, import blocks).

use crate::error::{GodError, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(usize);

/// A byte offset inside a file registered with a [`ScanContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub file: FileId,
    pub offset: usize,
}

/// Position index for one scan. Built while parsing, read afterwards, dropped
/// at the end of the run.
#[derive(Debug, Default)]
pub struct ScanContext {
    files: Vec<PathBuf>,
}

impl ScanContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file, returning its id. Registering the same path twice
    /// returns the existing id.
    pub fn add_file(&mut self, path: &Path) -> FileId {
        if let Some(index) = self.files.iter().position(|p| p == path) {
            return FileId(index);
        }
        self.files.push(path.to_path_buf());
        FileId(self.files.len() - 1)
    }

    pub fn path(&self, file: FileId) -> Option<&Path> {
        self.files.get(file.0).map(PathBuf::as_path)
    }

    pub fn position(&self, file: FileId, offset: usize) -> Position {
        Position { file, offset }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Read the source text in `[start, end)` straight from disk.
    pub fn text_between(&self, start: Position, end: Position) -> Result<String> {
        let path = self.path(start.file).ok_or_else(|| GodError::Range {
            path: PathBuf::from(format!("<unknown file #{}>", start.file.0)),
            start: start.offset,
            end: end.offset,
            reason: "file is not part of this scan".to_string(),
        })?;

        let range_error = |reason: &str| GodError::Range {
            path: path.to_path_buf(),
            start: start.offset,
            end: end.offset,
            reason: reason.to_string(),
        };

        if start.file != end.file {
            return Err(range_error("positions belong to different files"));
        }
        if end.offset < start.offset {
            return Err(range_error("end is before start"));
        }

        let io_error = |error: std::io::Error| GodError::Io {
            path: path.to_path_buf(),
            error,
        };

        let mut file = File::open(path).map_err(io_error)?;
        file.seek(SeekFrom::Start(start.offset as u64))
            .map_err(io_error)?;

        let mut text = vec![0u8; end.offset - start.offset];
        file.read_exact(&mut text).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                range_error("range extends past end of file")
            } else {
                io_error(e)
            }
        })?;

        String::from_utf8(text).map_err(|e| GodError::Io {
            path: path.to_path_buf(),
            error: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })
    }
}
