use crate::error::Result;
use tree_sitter::Node;

/// Extraction of the package clause and import declarations
impl super::GoExtractor<'_> {
    pub(super) fn extract_package_name(&self, node: Node) -> Option<String> {
        let mut cursor = node.walk();
        let name = node
            .named_children(&mut cursor)
            .find(|child| child.kind() == "package_identifier")
            .map(|child| self.get_node_text(child));
        name
    }

    /// `//go:build linux && !arm` -> `linux && !arm`
    pub(super) fn extract_build_constraint(&self, node: Node) -> Option<String> {
        let text = self.get_node_text(node);
        let expr = text.strip_prefix("//go:build")?;
        if !expr.is_empty() && !expr.starts_with([' ', '\t']) {
            return None;
        }
        Some(expr.trim().to_string())
    }

    /// Every top-level import declaration, verbatim and in source order, one
    /// per line. Generated files paste this block as-is; unused imports are
    /// pruned by the writer.
    pub(super) fn extract_imports(&self, root: Node) -> Result<String> {
        let mut statements = String::with_capacity(128);

        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            if node.kind() != "import_declaration" {
                continue;
            }
            statements.push_str(&self.source_text(node)?);
            statements.push('\n');
        }

        Ok(statements)
    }
}
