//! Parsing entry point for package files
//!
//! Reads a file, registers it with the scan context and parses it with the
//! Go grammar. The resulting [`ParsedFile`] is what the extractors walk.

use crate::error::{GodError, Result};
use crate::extractors::go::{FileScan, GoExtractor};
use crate::extractors::source::{FileId, ScanContext};
use crate::extractors::ClassifyPolicy;
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::Tree;

/// A Go source file parsed during one scan.
pub struct ParsedFile {
    pub path: PathBuf,
    pub file_id: FileId,
    pub content: String,
    pub tree: Tree,
}

/// Read and parse `path`, registering it in `ctx`.
pub fn parse_file(ctx: &mut ScanContext, path: &Path) -> Result<ParsedFile> {
    let content = fs::read_to_string(path).map_err(|error| GodError::Io {
        path: path.to_path_buf(),
        error,
    })?;

    let tree = crate::language::parse_go(&content, path)?;
    let file_id = ctx.add_file(path);

    tracing::debug!(
        "Parsed {} ({} bytes, {} top-level nodes)",
        path.display(),
        content.len(),
        tree.root_node().named_child_count()
    );

    Ok(ParsedFile {
        path: path.to_path_buf(),
        file_id,
        content,
        tree,
    })
}

/// Parse and extract one file in a single step.
pub fn scan_file(ctx: &mut ScanContext, path: &Path, policy: ClassifyPolicy) -> Result<FileScan> {
    let parsed = parse_file(ctx, path)?;
    GoExtractor::new(ctx, &parsed, policy)
        .extract()
        .map_err(|e| e.within(format!("file {}", path.display())))
}
