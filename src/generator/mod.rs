//! Accessor code generation
//!
//! Renders one file per struct and accessor kind. Output is valid but
//! unformatted Go; the writer prunes unused imports and tidies whitespace.

mod filename;
mod getter;
mod setter;

pub use filename::FilenameTemplate;

use crate::error::{GodError, Result};
use crate::model::{Struct, Structs};
use serde::Serialize;
use std::fmt;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessorKind {
    Getter,
    Setter,
}

impl AccessorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessorKind::Getter => "getter",
            AccessorKind::Setter => "setter",
        }
    }
}

impl fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered source for one struct.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub struct_name: String,
    pub kind: AccessorKind,
    pub code: String,
}

/// Render the accessors of `kind` for one struct.
pub fn render(s: &Struct, kind: AccessorKind, package: &str) -> Result<String> {
    if package.is_empty() {
        return Err(GodError::Config(
            "missing package name (gopackage config)".to_string(),
        ));
    }

    let mut code = String::with_capacity(1024);
    write_preamble(&mut code, s, kind, package)?;
    match kind {
        AccessorKind::Getter => getter::write_getters(&mut code, s)?,
        AccessorKind::Setter => setter::write_setters(&mut code, s)?,
    }
    Ok(code)
}

/// Render every struct; all-or-nothing, so a failure leaves nothing to save.
pub fn render_all(structs: &Structs, kind: AccessorKind, package: &str) -> Result<Vec<GeneratedFile>> {
    structs
        .values()
        .map(|s| {
            let code = render(s, kind, package).map_err(|e| {
                e.within(format!("cannot generate {} for struct {}", kind, s.name))
            })?;
            Ok(GeneratedFile {
                struct_name: s.name.clone(),
                kind,
                code,
            })
        })
        .collect()
}

fn write_preamble(out: &mut String, s: &Struct, kind: AccessorKind, package: &str) -> Result<()> {
    writeln!(out, "// Code generated by god {}, DO NOT EDIT.", kind).map_err(fmt_error)?;
    writeln!(out).map_err(fmt_error)?;
    writeln!(out, "package {}", package).map_err(fmt_error)?;
    writeln!(out).map_err(fmt_error)?;
    if !s.imported_statements.is_empty() {
        writeln!(out, "{}", s.imported_statements).map_err(fmt_error)?;
    }
    Ok(())
}

pub(crate) fn fmt_error(e: fmt::Error) -> GodError {
    GodError::Config(format!("failed to render code: {}", e))
}
