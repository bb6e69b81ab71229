//! Writer for generated Go code
//!
//! Generated files start out with the declaring file's whole import block.
//! Before saving, imports the generated code does not reference are dropped
//! (Go refuses to compile unused imports) and whitespace is tidied. Blank
//! imports are always kept; dot imports are kept while the code names a type
//! that is neither qualified, predeclared, nor bound by the receiver.

use crate::error::{GodError, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tree_sitter::Node;

static MAJOR_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^v[0-9]+$").unwrap());
static GOPKG_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.v[0-9]+$").unwrap());

const PREDECLARED_TYPES: &[&str] = &[
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32", "float64",
    "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16", "uint32",
    "uint64", "uintptr",
];

/// Persists generated code.
pub trait CodeWriter {
    fn save(&self, path: &Path, code: &[u8]) -> Result<()>;
}

/// Formats and writes Go files to disk.
#[derive(Debug, Default, Clone)]
pub struct GoFileWriter;

impl CodeWriter for GoFileWriter {
    fn save(&self, path: &Path, code: &[u8]) -> Result<()> {
        let save_error = |reason: String| GodError::Save {
            path: path.to_path_buf(),
            reason,
        };

        let code = std::str::from_utf8(code)
            .map_err(|e| save_error(format!("generated code is not UTF-8: {}", e)))?;
        let formatted = format_go_code(code, path)
            .map_err(|e| save_error(format!("cannot format generated code: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| save_error(e.to_string()))?;
        }
        fs::write(path, &formatted).map_err(|e| save_error(e.to_string()))?;

        tracing::debug!("Save {}:\n{}", path.display(), formatted);
        Ok(())
    }
}

/// Prune unused imports and tidy whitespace. `path` only labels errors.
pub fn format_go_code(code: &str, path: &Path) -> Result<String> {
    let tree = crate::language::parse_go(code, path)?;
    let root = tree.root_node();

    let mut package_end = None;
    let mut imports_range: Option<(usize, usize)> = None;
    let mut specs = Vec::new();

    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        match node.kind() {
            "package_clause" => package_end = Some(node.end_byte()),
            "import_declaration" => {
                let start = imports_range.map_or(node.start_byte(), |(s, _)| s);
                imports_range = Some((start, node.end_byte()));
                collect_import_specs(node, &mut specs);
            }
            _ => {}
        }
    }

    let (package_end, (_, imports_end)) = match (package_end, imports_range) {
        (Some(p), Some(range)) => (p, range),
        _ => return Ok(tidy(code)),
    };

    let mut used = BTreeSet::new();
    collect_referenced_packages(root, code, &mut used);
    let keep_dot_imports = uses_unqualified_types(root, code);

    let mut kept: Vec<String> = Vec::new();
    for spec in specs {
        let name = match spec.child_by_field_name("name") {
            Some(alias) => text(alias, code).to_string(),
            None => match spec.child_by_field_name("path") {
                Some(p) => import_package_name(text(p, code)),
                None => continue,
            },
        };
        let keep = match name.as_str() {
            "_" => true,
            "." => keep_dot_imports,
            _ => used.contains(&name),
        };
        if !keep {
            continue;
        }
        let spec_text = text(spec, code).to_string();
        if !kept.contains(&spec_text) {
            kept.push(spec_text);
        }
    }

    let mut out = String::with_capacity(code.len());
    out.push_str(&code[..package_end]);
    out.push_str("\n\n");
    match kept.len() {
        0 => {}
        1 => {
            out.push_str("import ");
            out.push_str(&kept[0]);
            out.push('\n');
        }
        _ => {
            out.push_str("import (\n");
            for spec in &kept {
                out.push('\t');
                out.push_str(spec);
                out.push('\n');
            }
            out.push_str(")\n");
        }
    }
    out.push_str(&code[imports_end..]);

    Ok(tidy(&out))
}

fn text<'a>(node: Node, code: &'a str) -> &'a str {
    &code[node.start_byte()..node.end_byte()]
}

fn collect_import_specs<'t>(node: Node<'t>, specs: &mut Vec<Node<'t>>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => specs.push(child),
            "import_spec_list" => collect_import_specs(child, specs),
            _ => {}
        }
    }
}

/// Package names used as `pkg.Name` (types) or `pkg.Value` (expressions)
/// outside the package clause and import block.
fn collect_referenced_packages(node: Node, code: &str, used: &mut BTreeSet<String>) {
    match node.kind() {
        "package_clause" | "import_declaration" => return,
        "package_identifier" => {
            used.insert(text(node, code).to_string());
        }
        "selector_expression" => {
            if let Some(operand) = node
                .child_by_field_name("operand")
                .filter(|o| o.kind() == "identifier")
            {
                used.insert(text(operand, code).to_string());
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_referenced_packages(child, code, used);
    }
}

/// Whether a method names a type that could only come from a dot import.
/// Types declared in the same package also count, so this may keep a dot
/// import that turns out unused, never drop one that is needed.
fn uses_unqualified_types(root: Node, code: &str) -> bool {
    let mut cursor = root.walk();
    let found = root.named_children(&mut cursor)
        .filter(|node| node.kind() == "method_declaration")
        .any(|method| {
            let mut local = BTreeSet::new();
            if let Some(receiver) = method.child_by_field_name("receiver") {
                collect_type_names(receiver, code, &mut local);
            }
            let mut named = BTreeSet::new();
            for field in ["parameters", "result", "body"] {
                if let Some(part) = method.child_by_field_name(field) {
                    collect_type_names(part, code, &mut named);
                }
            }
            named
                .iter()
                .any(|name| !local.contains(name) && !PREDECLARED_TYPES.contains(&name.as_str()))
        });
    found
}

/// Unqualified type names (`Duration`, not `time.Duration`) under `node`.
fn collect_type_names(node: Node, code: &str, names: &mut BTreeSet<String>) {
    match node.kind() {
        "qualified_type" => return,
        "type_identifier" => {
            names.insert(text(node, code).to_string());
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_type_names(child, code, names);
    }
}

/// Default package name for an import path: `github.com/a/go-yaml/v2` -> `yaml`,
/// `gopkg.in/yaml.v3` -> `yaml`.
pub fn import_package_name(path_literal: &str) -> String {
    let path = path_literal.trim_matches(['"', '`']);
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let mut last = segments.pop().unwrap_or(path);
    if MAJOR_VERSION_RE.is_match(last) {
        if let Some(previous) = segments.pop() {
            last = previous;
        }
    }

    let trimmed = GOPKG_VERSION_RE.replace(last, "");
    let last: &str = trimmed.as_ref();
    let last = last.strip_prefix("go-").unwrap_or(last);
    let last = last.strip_suffix("-go").unwrap_or(last);

    last.split(['.', '-']).next().unwrap_or(last).to_string()
}

/// Trim trailing whitespace, collapse runs of blank lines, end with one newline.
fn tidy(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut previous_blank = true;

    for line in code.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            if previous_blank {
                continue;
            }
            previous_blank = true;
        } else {
            previous_blank = false;
        }
        out.push_str(line);
        out.push('\n');
    }

    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const GENERATED: &str = "// Code generated by god getter, DO NOT EDIT.\n\npackage demo\n\n\
import (\n\t\"sync\"\n\t\"time\"\n\n\tdecimal \"github.com/shopspring/decimal\"\n)\n\
import \"net/url\"\n\n\n\
func (u *User) CreatedAt() time.Time {\n\treturn u.createdAt\n}   \n\n\n\n\
func (u *User) Balance() decimal.Decimal {\n\treturn u.balance\n}\n\n";

    #[test]
    fn test_unused_imports_are_pruned() {
        let formatted = format_go_code(GENERATED, Path::new("user_getter.go")).unwrap();

        assert!(formatted.contains(
            "import (\n\t\"time\"\n\tdecimal \"github.com/shopspring/decimal\"\n)\n"
        ));
        assert!(!formatted.contains("sync"));
        assert!(!formatted.contains("net/url"));
    }

    #[test]
    fn test_whitespace_is_tidied() {
        let formatted = format_go_code(GENERATED, Path::new("user_getter.go")).unwrap();

        assert!(!formatted.contains("\n\n\n"), "no double blank lines");
        assert!(!formatted.contains("}   \n"), "no trailing whitespace");
        assert!(formatted.ends_with("}\n"));
        assert!(formatted.starts_with("// Code generated by god getter, DO NOT EDIT.\n\npackage demo\n\nimport ("));
    }

    #[test]
    fn test_single_import_uses_short_form() {
        let code = "package demo\n\nimport (\n\t\"time\"\n\t\"fmt\"\n)\n\nfunc (a *A) T() time.Duration {\n\treturn a.t\n}\n";
        let formatted = format_go_code(code, Path::new("a.go")).unwrap();
        assert_eq!(
            formatted,
            "package demo\n\nimport \"time\"\n\nfunc (a *A) T() time.Duration {\n\treturn a.t\n}\n"
        );
    }

    #[test]
    fn test_all_imports_unused() {
        let code = "package demo\n\nimport \"time\"\n\nfunc (a *A) N() int {\n\treturn a.n\n}\n";
        let formatted = format_go_code(code, Path::new("a.go")).unwrap();
        assert_eq!(formatted, "package demo\n\nfunc (a *A) N() int {\n\treturn a.n\n}\n");
    }

    #[test]
    fn test_blank_import_kept_and_unused_dot_import_dropped() {
        let code = "package demo\n\nimport (\n\t_ \"embed\"\n\t. \"strings\"\n)\n\nfunc (a *A) N() int {\n\treturn a.n\n}\n";
        let formatted = format_go_code(code, Path::new("a.go")).unwrap();
        assert!(formatted.contains("import _ \"embed\"\n"), "got:\n{}", formatted);
        assert!(!formatted.contains("strings"));
    }

    #[test]
    fn test_dot_import_kept_for_unqualified_type() {
        let code = "package demo\n\nimport . \"time\"\n\nfunc (a *A) D() Duration {\n\treturn a.d\n}\n";
        let formatted = format_go_code(code, Path::new("a.go")).unwrap();
        assert!(formatted.contains("import . \"time\"\n"), "got:\n{}", formatted);
    }

    #[test]
    fn test_receiver_type_params_do_not_keep_dot_imports() {
        let code = "package demo\n\nimport . \"time\"\n\nfunc (p *Pair[K, V]) Key() K {\n\treturn p.key\n}\n";
        let formatted = format_go_code(code, Path::new("a.go")).unwrap();
        assert!(!formatted.contains("time"), "got:\n{}", formatted);
    }

    #[test]
    fn test_package_used_in_array_length_is_kept() {
        let code = "package demo\n\nimport \"crypto/sha256\"\n\nfunc (a *A) Sum() [sha256.Size]byte {\n\treturn a.sum\n}\n";
        let formatted = format_go_code(code, Path::new("a.go")).unwrap();
        assert!(formatted.contains("import \"crypto/sha256\""));
    }

    #[test]
    fn test_import_package_name() {
        assert_eq!(import_package_name("\"time\""), "time");
        assert_eq!(import_package_name("\"net/url\""), "url");
        assert_eq!(import_package_name("\"github.com/go-redis/redis/v8\""), "redis");
        assert_eq!(import_package_name("\"gopkg.in/yaml.v3\""), "yaml");
        assert_eq!(import_package_name("\"github.com/mattn/go-isatty\""), "isatty");
        assert_eq!(import_package_name("`github.com/x/sqlite-go`"), "sqlite");
    }

    #[test]
    fn test_save_writes_formatted_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gen").join("user_getter.go");

        GoFileWriter.save(&path, GENERATED.as_bytes()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("func (u *User) Balance() decimal.Decimal"));
        assert!(!written.contains("\"sync\""));
    }

    #[test]
    fn test_save_rejects_invalid_code() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.go");

        let err = GoFileWriter
            .save(&path, b"package demo\n\nfunc (u *User) Name( {\n")
            .unwrap_err();
        assert!(matches!(err, GodError::Save { .. }), "got {:?}", err);
        assert!(!path.exists(), "nothing is written for unparseable code");
    }
}
