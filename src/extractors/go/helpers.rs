use crate::error::Result;
use regex::Regex;
use std::sync::LazyLock;
use tree_sitter::Node;

/// Header written at the top of every file this tool generates.
static GENERATED_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^// Code generated by god \w+, DO NOT EDIT\.$").unwrap());

/// Whether `content` is a file we generated ourselves.
pub(super) fn is_generated_by_us(content: &str) -> bool {
    GENERATED_HEADER.is_match(content)
}

/// Helper methods for node text extraction
impl super::GoExtractor<'_> {
    /// Get node text from the in-memory copy of the file (identifiers only)
    pub(super) fn get_node_text(&self, node: Node) -> String {
        let bytes = self.file.content.as_bytes();
        let (start, end) = (node.start_byte(), node.end_byte());
        if start <= end && end <= bytes.len() {
            String::from_utf8_lossy(&bytes[start..end]).to_string()
        } else {
            String::new()
        }
    }

    /// Verbatim source text of a node, read back through the scan context
    pub(super) fn source_text(&self, node: Node) -> Result<String> {
        let start = self.ctx.position(self.file.file_id, node.start_byte());
        let end = self.ctx.position(self.file.file_id, node.end_byte());
        self.ctx.text_between(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_generated_by_us() {
        assert!(is_generated_by_us(
            "// Code generated by god getter, DO NOT EDIT.\n\npackage demo\n"
        ));
        assert!(!is_generated_by_us(
            "// Code generated by protoc-gen-go. DO NOT EDIT.\npackage demo\n"
        ));
        assert!(!is_generated_by_us("package demo\n"));
    }
}
