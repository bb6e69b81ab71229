use crate::model::DeclaredMethods;
use tree_sitter::Node;

/// Method extraction for Go, used to spot accessors that already exist
impl super::GoExtractor<'_> {
    pub(super) fn extract_method(&self, node: Node, methods: &mut DeclaredMethods) {
        let name = match node.child_by_field_name("name") {
            Some(name) => self.get_node_text(name),
            None => return,
        };

        let receiver_type = node.child_by_field_name("receiver").and_then(|receiver| {
            let mut cursor = receiver.walk();
            let param = receiver
                .named_children(&mut cursor)
                .find(|c| c.kind() == "parameter_declaration")?;
            self.receiver_base_type(param.child_by_field_name("type")?)
        });

        if let Some(receiver_type) = receiver_type {
            methods.entry(receiver_type).or_default().insert(name);
        }
    }

    /// `T`, `*T`, `T[K]`, `*T[K]` and `(*T)` all resolve to `T`.
    fn receiver_base_type(&self, node: Node) -> Option<String> {
        match node.kind() {
            "type_identifier" => Some(self.get_node_text(node)),
            "generic_type" => node
                .child_by_field_name("type")
                .and_then(|t| self.receiver_base_type(t)),
            "pointer_type" | "parenthesized_type" => {
                let mut cursor = node.walk();
                let inner = node.named_children(&mut cursor).next();
                inner.and_then(|inner| self.receiver_base_type(inner))
            }
            _ => None,
        }
    }
}
