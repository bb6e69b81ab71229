use super::fields::{classify_field, ignored_field, FieldBucket, FieldTables};
use crate::error::{GodError, Result};
use crate::model::{Struct, Structs};
use crate::utils::names;
use tree_sitter::Node;

/// Struct type declaration extraction for Go
impl super::GoExtractor<'_> {
    /// `type A struct{..}` or a grouped `type ( .. )` declaration.
    pub(super) fn extract_type_declaration(
        &self,
        node: Node,
        imported_statements: &str,
        structs: &mut Structs,
    ) -> Result<()> {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            // type_alias (type A = B) never declares a new struct
            if child.kind() != "type_spec" {
                continue;
            }
            if let Some(s) = self.extract_struct(child, imported_statements)? {
                if structs.contains_key(&s.name) {
                    return Err(GodError::invalid_name(
                        &s.name,
                        "struct is declared more than once",
                    ));
                }
                structs.insert(s.name.clone(), s);
            }
        }
        Ok(())
    }

    fn extract_struct(&self, type_spec: Node, imported_statements: &str) -> Result<Option<Struct>> {
        let (name_node, type_node) = match (
            type_spec.child_by_field_name("name"),
            type_spec.child_by_field_name("type"),
        ) {
            (Some(name), Some(ty)) => (name, ty),
            _ => return Ok(None),
        };

        if type_node.kind() != "struct_type" {
            return Ok(None);
        }

        let name = self.get_node_text(name_node);
        if names::should_ignore(&name) {
            return Err(GodError::invalid_name(name, "struct name is invalid"));
        }

        let short_name = names::short_receiver_name(&name)
            .map_err(|e| e.within(format!("cannot get short name for {}", name)))?;

        let type_params = type_spec
            .child_by_field_name("type_parameters")
            .map(|list| self.extract_type_param_names(list))
            .unwrap_or_default();

        let fields = self
            .extract_fields(type_node)
            .map_err(|e| e.within(format!("struct {}", name)))?;

        tracing::debug!(
            "struct {}: {} public, {} private, {} ignored fields",
            name,
            fields.public.len(),
            fields.private.len(),
            fields.ignored.len()
        );

        Ok(Some(Struct {
            lower_name: name.to_lowercase(),
            name,
            short_name,
            type_params,
            is_present: true,
            public_fields: fields.public,
            private_fields: fields.private,
            ignore_fields: fields.ignored,
            imported_statements: imported_statements.to_string(),
            file: self.file.path.clone(),
        }))
    }

    /// `[K comparable, V any]` -> `["K", "V"]`
    fn extract_type_param_names(&self, list: Node) -> Vec<String> {
        let mut params = Vec::new();
        let mut cursor = list.walk();
        for decl in list.named_children(&mut cursor) {
            let mut decl_cursor = decl.walk();
            for name in decl.children_by_field_name("name", &mut decl_cursor) {
                params.push(self.get_node_text(name));
            }
        }
        params
    }

    fn extract_fields(&self, struct_type: Node) -> Result<FieldTables> {
        // struct_type
        //   field_declaration_list
        //     field_declaration
        //       field_identifier (name) - can have MULTIPLE on same line (X, Y float64)
        //       <type>
        //       [optional] tag
        let mut tables = FieldTables::default();
        let mut index = 0;

        let list = match struct_type
            .named_children(&mut struct_type.walk())
            .find(|c| c.kind() == "field_declaration_list")
        {
            Some(list) => list,
            None => return Ok(tables),
        };

        let mut cursor = list.walk();
        for decl in list.named_children(&mut cursor) {
            if decl.kind() != "field_declaration" {
                continue;
            }

            let mut name_cursor = decl.walk();
            let field_names: Vec<Node> = decl
                .children_by_field_name("name", &mut name_cursor)
                .collect();

            if field_names.is_empty() {
                tracing::debug!(
                    "skipping embedded field {}",
                    decl.child_by_field_name("type")
                        .map(|t| self.get_node_text(t))
                        .unwrap_or_default()
                );
                continue;
            }

            let type_node = match decl.child_by_field_name("type") {
                Some(t) => t,
                None => continue,
            };

            // Read lazily: a group made only of ignored names never touches the file
            let mut type_text: Option<String> = None;

            for name_node in field_names {
                let name = self.get_node_text(name_node);

                let (bucket, field) = match names::ignore_reason(&name) {
                    Some(reason) => (
                        FieldBucket::Ignored,
                        ignored_field(&name, index, reason),
                    ),
                    None => {
                        if type_text.is_none() {
                            type_text = Some(self.source_text(type_node)?);
                        }
                        let text = type_text.as_deref().unwrap_or_default();
                        classify_field(&name, text, index, self.policy)?
                    }
                };

                if bucket == FieldBucket::Ignored {
                    tracing::debug!(
                        "ignoring field {:?}: {}",
                        name,
                        field.ignore_reason.as_deref().unwrap_or_default()
                    );
                }

                // Several blank fields (`_ [4]byte`) are legal Go; keep the first
                if !tables.insert(bucket, field) && bucket != FieldBucket::Ignored {
                    return Err(GodError::invalid_name(name, "duplicate field"));
                }
                index += 1;
            }
        }

        Ok(tables)
    }
}
