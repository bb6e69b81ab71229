//! Language Support - tree-sitter configuration for Go sources
//!
//! All tree-sitter language setup lives here so that the extractors and the
//! writer (which re-parses generated code) build their parsers the same way.

use crate::error::{GodError, Result};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Get the tree-sitter language for Go.
pub fn get_tree_sitter_language() -> tree_sitter::Language {
    tree_sitter_go::LANGUAGE.into()
}

/// Create a parser configured for Go.
pub fn new_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&get_tree_sitter_language())
        .map_err(|e| GodError::Config(format!("failed to set Go parser language: {}", e)))?;
    Ok(parser)
}

/// Parse Go source, rejecting trees that contain syntax errors.
///
/// `path` is only used to label errors.
pub fn parse_go(content: &str, path: &Path) -> Result<Tree> {
    let mut parser = new_parser()?;
    let tree = parser.parse(content, None).ok_or_else(|| GodError::Parse {
        file: path.to_path_buf(),
        line: 0,
        column: 0,
    })?;

    if let Some(bad) = first_error_node(tree.root_node()) {
        let point = bad.start_position();
        return Err(GodError::Parse {
            file: path.to_path_buf(),
            line: point.row + 1,
            column: point.column + 1,
        });
    }

    Ok(tree)
}

/// First `ERROR` or missing node in document order.
fn first_error_node(node: Node) -> Option<Node> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error_node(child) {
            return Some(found);
        }
    }
    Some(node)
}

/// Detect whether a path is a Go source file that belongs to the build
/// (test files are excluded, like `go build` does).
pub fn is_go_source_file(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    name.ends_with(".go") && !name.ends_with("_test.go") && !name.starts_with(['.', '_'])
}
