//! Package resolver
//!
//! Decides which structs an invocation works on. Without explicit names the
//! structs come from the target file only; with names, every file of the
//! package is searched and each requested struct must be found exactly once,
//! or the whole resolution fails. Either way, methods are collected from the
//! whole package so hand-written accessors are never redeclared.
//!
//! A file belongs to the package when it builds for the current target
//! (file name suffix and `//go:build` line) and declares the configured
//! package. The target file always belongs.

use crate::error::{GodError, Result};
use crate::extractors::{scan_file, ClassifyPolicy, FileScan, ScanContext};
use crate::model::{DeclaredMethods, Struct, Structs};
use crate::utils::build::BuildContext;
use crate::utils::paths::{find_package_file, package_go_files};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Inputs for one resolution.
#[derive(Debug, Clone)]
pub struct ResolveRequest<'a> {
    pub package_dir: &'a Path,
    pub target_file: &'a Path,
    /// Structs requested by name; empty means every struct of the target file
    pub explicit_names: &'a [String],
    /// Expected `package` clause of package members
    pub package_name: Option<&'a str>,
    pub policy: ClassifyPolicy,
    pub build: BuildContext,
}

/// Resolve the struct table for `request`.
pub fn resolve(ctx: &mut ScanContext, request: &ResolveRequest) -> Result<Structs> {
    let package_files = package_go_files(request.package_dir)?;
    let target = find_package_file(&package_files, request.package_dir, request.target_file)?;

    let mut methods = DeclaredMethods::new();

    let target_scan = scan_file(ctx, &target, request.policy)?;
    check_target_package(&target, &target_scan, request);
    merge_methods(&mut methods, &target_scan);

    let mut structs = if request.explicit_names.is_empty() {
        debug!("Resolving every struct of {}", target.display());
        collect_sibling_methods(ctx, &package_files, &target, request, &mut methods);
        target_scan.structs
    } else {
        resolve_named(ctx, &package_files, &target, target_scan.structs, request, &mut methods)?
    };

    for s in structs.values_mut() {
        s.mark_existing_accessors(&methods);
    }

    debug!(
        "Resolved {} structs: {:?}",
        structs.len(),
        structs.keys().collect::<Vec<_>>()
    );
    Ok(structs)
}

fn resolve_named(
    ctx: &mut ScanContext,
    package_files: &[PathBuf],
    target: &Path,
    target_structs: Structs,
    request: &ResolveRequest,
    methods: &mut DeclaredMethods,
) -> Result<Structs> {
    debug!(
        "Resolving {:?} across {} package files",
        request.explicit_names,
        package_files.len()
    );

    // Placeholders record what was asked for; is_present flips when found
    let mut structs: Structs = request
        .explicit_names
        .iter()
        .map(|name| {
            (
                name.clone(),
                Struct {
                    name: name.clone(),
                    ..Default::default()
                },
            )
        })
        .collect();

    place_found(&mut structs, target_structs)?;

    for file in package_files {
        if file.as_path() == target || !request.build.matches_file_name(file) {
            continue;
        }
        let scan = scan_file(ctx, file, request.policy)?;
        if !is_package_member(file, &scan, request) {
            continue;
        }
        merge_methods(methods, &scan);
        place_found(&mut structs, scan.structs)?;
    }

    if let Some(missing) = structs.values().find(|s| !s.is_present) {
        return Err(GodError::MissingStruct(missing.name.clone()));
    }

    Ok(structs)
}

/// Move requested structs from `found` into their placeholders.
fn place_found(structs: &mut Structs, found: Structs) -> Result<()> {
    for (name, s) in found {
        let Some(slot) = structs.get_mut(&name) else {
            continue;
        };
        if slot.is_present {
            return Err(GodError::invalid_name(
                name,
                format!(
                    "struct is declared in both {} and {}",
                    slot.file.display(),
                    s.file.display()
                ),
            ));
        }
        *slot = s;
    }
    Ok(())
}

/// Whole-file mode only needs methods from the other files. A sibling that
/// does not parse is skipped with a warning instead of failing the run.
fn collect_sibling_methods(
    ctx: &mut ScanContext,
    package_files: &[PathBuf],
    target: &Path,
    request: &ResolveRequest,
    methods: &mut DeclaredMethods,
) {
    for file in package_files {
        if file.as_path() == target || !request.build.matches_file_name(file) {
            continue;
        }
        match scan_file(ctx, file, request.policy) {
            Ok(scan) if is_package_member(file, &scan, request) => merge_methods(methods, &scan),
            Ok(_) => {}
            Err(e) => warn!("Skipping methods of {}: {}", file.display(), e),
        }
    }
}

fn is_package_member(file: &Path, scan: &FileScan, request: &ResolveRequest) -> bool {
    if let Some(expr) = scan.build_constraint.as_deref() {
        match request.build.eval(expr) {
            Some(true) => {}
            Some(false) => {
                debug!("{} is excluded by //go:build {}", file.display(), expr);
                return false;
            }
            None => warn!("{}: cannot parse //go:build {}", file.display(), expr),
        }
    }

    if let (Some(expected), Some(actual)) = (request.package_name, scan.package_name.as_deref()) {
        if expected != actual {
            warn!(
                "{} declares package {} but {} was configured, skipping it",
                file.display(),
                actual,
                expected
            );
            return false;
        }
    }
    true
}

fn check_target_package(target: &Path, scan: &FileScan, request: &ResolveRequest) {
    if let (Some(expected), Some(actual)) = (request.package_name, scan.package_name.as_deref()) {
        if expected != actual {
            warn!(
                "{} declares package {} but {} was configured",
                target.display(),
                actual,
                expected
            );
        }
    }
}

fn merge_methods(methods: &mut DeclaredMethods, scan: &FileScan) {
    for (receiver, names) in &scan.methods {
        methods
            .entry(receiver.clone())
            .or_default()
            .extend(names.iter().cloned());
    }
}
