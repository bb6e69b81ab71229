// Package file discovery
//
// A Go package is every buildable `.go` file directly inside one directory.
// Test files and files starting with `.` or `_` are not part of the build.

use crate::error::{GodError, Result};
use crate::language::is_go_source_file;
use std::path::{Path, PathBuf};

/// Buildable Go files in `package_dir`, sorted by path.
pub fn package_go_files(package_dir: &Path) -> Result<Vec<PathBuf>> {
    if !package_dir.is_dir() {
        return Err(GodError::Config(format!(
            "package directory {} does not exist",
            package_dir.display()
        )));
    }

    let pattern = Path::new(&glob::Pattern::escape(&package_dir.to_string_lossy())).join("*.go");
    let entries = glob::glob(&pattern.to_string_lossy()).map_err(|e| {
        GodError::Config(format!(
            "invalid package directory {}: {}",
            package_dir.display(),
            e
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| GodError::Io {
            path: e.path().to_path_buf(),
            error: e.into_error(),
        })?;
        if path.is_file() && is_go_source_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    tracing::debug!(
        "Found {} Go files in package {}",
        files.len(),
        package_dir.display()
    );
    Ok(files)
}

/// Resolve `target_file` (a bare file name as `$GOFILE` gives it, or a path
/// relative to the package directory) to the matching package file.
pub fn find_package_file(
    package_files: &[PathBuf],
    package_dir: &Path,
    target_file: &Path,
) -> Result<PathBuf> {
    let candidate = if target_file.is_absolute() {
        target_file.to_path_buf()
    } else {
        package_dir.join(target_file)
    };
    let wanted = canonical_or_original(&candidate);

    package_files
        .iter()
        .find(|file| canonical_or_original(file) == wanted)
        .cloned()
        .ok_or_else(|| GodError::FileNotFound {
            file: target_file.to_path_buf(),
            package_dir: package_dir.to_path_buf(),
        })
}

/// Canonicalize to resolve symlinks (macOS /var vs /private/var); fall back
/// to the original path when it does not exist.
fn canonical_or_original(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
