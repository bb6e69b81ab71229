//! End-to-end generation: resolve structs, render every file, then save.

use crate::config::Config;
use crate::error::Result;
use crate::extractors::ScanContext;
use crate::generator::{render_all, AccessorKind};
use crate::resolver::{resolve, ResolveRequest};
use crate::utils::build::BuildContext;
use crate::writer::CodeWriter;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// One file written by [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub struct_name: String,
    pub kind: AccessorKind,
    /// Rendered filename template, as the user configured it
    pub file_name: String,
    pub path: PathBuf,
}

/// Generate accessors of every kind in `kinds` for the configured structs.
///
/// Rendering happens in memory first; if any struct fails to render nothing
/// is written. Saving stops at the first failure, leaving files saved before
/// it in place. `on_saved` runs right after each file is written.
pub fn generate<W, F>(
    config: &Config,
    kinds: &[AccessorKind],
    writer: &W,
    mut on_saved: F,
) -> Result<Vec<SavedFile>>
where
    W: CodeWriter,
    F: FnMut(&SavedFile),
{
    config.validate()?;

    if kinds.len() > 1 && !config.filename_template.uses("kind") {
        warn!(
            "filename template {:?} has no {{{{ kind }}}} placeholder, later kinds overwrite earlier ones",
            config.filename_template.as_str()
        );
    }

    let mut ctx = ScanContext::new();
    let request = ResolveRequest {
        package_dir: config.package_dir(),
        target_file: &config.target_file,
        explicit_names: &config.explicit_struct_names,
        package_name: Some(config.package_name.as_str()),
        policy: Config::policy_for(kinds),
        build: BuildContext::from_env(),
    };
    let structs = resolve(&mut ctx, &request)?;
    debug!("Scanned {} files", ctx.file_count());

    let mut rendered = Vec::new();
    for &kind in kinds {
        rendered.extend(render_all(&structs, kind, &config.package_name)?);
    }

    let mut saved = Vec::with_capacity(rendered.len());
    for file in rendered {
        let Some(s) = structs.get(&file.struct_name) else {
            continue;
        };
        let file_name = config.filename_template.render(s, file.kind);
        let path = config.output_path(&file_name);

        writer.save(&path, file.code.as_bytes())?;
        info!("Saved {} for {} to {}", file.kind, s.name, path.display());

        let record = SavedFile {
            struct_name: file.struct_name,
            kind: file.kind,
            file_name,
            path,
        };
        on_saved(&record);
        saved.push(record);
    }

    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GodError;
    use crate::writer::GoFileWriter;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingWriter {
        saved: RefCell<Vec<(PathBuf, String)>>,
        /// Fail once this many files were saved
        fail_after: Option<usize>,
    }

    impl CodeWriter for RecordingWriter {
        fn save(&self, path: &Path, code: &[u8]) -> Result<()> {
            if self.fail_after == Some(self.saved.borrow().len()) {
                return Err(GodError::Save {
                    path: path.to_path_buf(),
                    reason: "disk full".to_string(),
                });
            }
            self.saved
                .borrow_mut()
                .push((path.to_path_buf(), String::from_utf8_lossy(code).into_owned()));
            Ok(())
        }
    }

    fn package(dir: &Path) -> Config {
        fs::write(
            dir.join("user.go"),
            "package demo\n\nimport (\n\t\"sync\"\n\t\"time\"\n)\n\n\
type User struct {\n\tID int64\n\tname string\n\tcreatedAt time.Time\n}\n",
        )
        .unwrap();
        fs::write(
            dir.join("point.go"),
            "package demo\n\ntype Point struct {\n\tx, y int\n}\n",
        )
        .unwrap();

        Config {
            package_name: "demo".to_string(),
            target_file: PathBuf::from("user.go"),
            workdir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_generate_getters_for_target_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = package(temp_dir.path());

        let saved = generate(&config, &[AccessorKind::Getter], &GoFileWriter, |_| {}).unwrap();

        assert_eq!(saved.len(), 1, "only structs of the target file: {:?}", saved);
        assert_eq!(saved[0].file_name, "user_getter.go");

        let code = fs::read_to_string(temp_dir.path().join("user_getter.go")).unwrap();
        assert!(code.starts_with("// Code generated by god getter, DO NOT EDIT.\n"));
        assert!(code.contains("import \"time\"\n"), "sync import is pruned:\n{}", code);
        assert!(code.contains("func (u *User) CreatedAt() time.Time {"));
        assert!(!code.contains("sync"));
    }

    #[test]
    fn test_generate_data_writes_both_kinds() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = package(temp_dir.path());
        config.explicit_struct_names = vec!["Point".to_string()];

        let writer = RecordingWriter::default();
        let saved = generate(&config, &[AccessorKind::Getter, AccessorKind::Setter], &writer, |_| {}).unwrap();

        let names: Vec<&str> = saved.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["point_getter.go", "point_setter.go"]);

        let written = writer.saved.borrow();
        assert!(written[1].1.contains("func (p *Point) SetX(value int) {"));
        assert_eq!(written[0].0, temp_dir.path().join("point_getter.go"));
    }

    #[test]
    fn test_missing_struct_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = package(temp_dir.path());
        config.explicit_struct_names = vec!["Point".to_string(), "Missing".to_string()];

        let writer = RecordingWriter::default();
        let err = generate(&config, &[AccessorKind::Getter], &writer, |_| {}).unwrap_err();

        assert!(
            matches!(err.root(), GodError::MissingStruct(name) if name == "Missing"),
            "got {:?}",
            err
        );
        assert!(writer.saved.borrow().is_empty(), "no file may be written");
    }

    #[test]
    fn test_invalid_config_is_rejected_before_scanning() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = package(temp_dir.path());
        config.package_name.clear();

        let err = generate(&config, &[AccessorKind::Setter], &RecordingWriter::default(), |_| {}).unwrap_err();
        assert!(matches!(err, GodError::Config(_)), "got {:?}", err);
    }

    #[test]
    fn test_each_save_is_reported_before_a_later_failure() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = package(temp_dir.path());
        config.explicit_struct_names = vec!["Point".to_string()];

        let writer = RecordingWriter {
            fail_after: Some(1),
            ..Default::default()
        };
        let mut reported = Vec::new();
        let err = generate(
            &config,
            &[AccessorKind::Getter, AccessorKind::Setter],
            &writer,
            |file| reported.push(file.file_name.clone()),
        )
        .unwrap_err();

        assert!(matches!(err, GodError::Save { .. }), "got {:?}", err);
        assert_eq!(reported, vec!["point_getter.go"], "the saved getter file is reported");
    }
}
