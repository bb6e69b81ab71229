pub mod fields;
mod functions;
mod helpers;
mod specs;
mod types;

use crate::error::Result;
use crate::extractors::manager::ParsedFile;
use crate::extractors::source::ScanContext;
use crate::model::{DeclaredMethods, Structs};
use fields::ClassifyPolicy;

/// Everything one file contributes to a package scan.
#[derive(Debug, Default)]
pub struct FileScan {
    /// Name from the `package` clause
    pub package_name: Option<String>,
    pub structs: Structs,
    /// Methods declared in this file, by receiver type
    pub methods: DeclaredMethods,
    /// The file carries our own generated-code header
    pub generated: bool,
    /// Expression of the `//go:build` line above the package clause
    pub build_constraint: Option<String>,
}

/// Go struct extractor that handles:
/// - Struct type declarations (grouped, generic)
/// - Field declarations with several names per line (X, Y float64)
/// - Import declarations, copied verbatim
/// - Method declarations, to detect accessors that already exist
pub struct GoExtractor<'a> {
    ctx: &'a ScanContext,
    file: &'a ParsedFile,
    policy: ClassifyPolicy,
}

impl<'a> GoExtractor<'a> {
    pub fn new(ctx: &'a ScanContext, file: &'a ParsedFile, policy: ClassifyPolicy) -> Self {
        Self { ctx, file, policy }
    }

    pub fn extract(&self) -> Result<FileScan> {
        let root = self.file.tree.root_node();
        let mut scan = FileScan {
            generated: helpers::is_generated_by_us(&self.file.content),
            ..Default::default()
        };

        let imported_statements = self.extract_imports(root)?;

        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "comment" if scan.package_name.is_none() && scan.build_constraint.is_none() => {
                    scan.build_constraint = self.extract_build_constraint(node)
                }
                "package_clause" => scan.package_name = self.extract_package_name(node),
                "type_declaration" => {
                    self.extract_type_declaration(node, &imported_statements, &mut scan.structs)?
                }
                "method_declaration" if !scan.generated => {
                    self.extract_method(node, &mut scan.methods)
                }
                _ => {}
            }
        }

        tracing::debug!(
            "Extracted {} structs and {} method receivers from {}",
            scan.structs.len(),
            scan.methods.len(),
            self.file.path.display()
        );

        Ok(scan)
    }
}
