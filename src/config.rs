//! Invocation configuration
//!
//! Built by the CLI from flags and the `go generate` environment, validated
//! once before any file is read.

use crate::error::{GodError, Result};
use crate::extractors::ClassifyPolicy;
use crate::generator::{AccessorKind, FilenameTemplate};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Variables `go generate` exports to the command it runs.
pub const GO_GENERATE_ENV: &[(&str, &str)] = &[
    ("GOARCH", "The execution architecture (arm, amd64, etc.)"),
    ("GOOS", "The execution operating system (linux, windows, etc.)"),
    ("GOFILE", "The base name of the file."),
    ("GOLINE", "The line number of the directive in the source file."),
    ("GOPACKAGE", "The name of the package of the file containing the directive."),
];

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Expected package clause of the generated files
    pub package_name: String,
    /// File holding the `go:generate` directive, relative to `workdir`
    pub target_file: PathBuf,
    pub explicit_struct_names: Vec<String>,
    pub debug: bool,
    /// Package directory; generated files land here
    pub workdir: PathBuf,
    #[serde(serialize_with = "serialize_template")]
    pub filename_template: FilenameTemplate,
}

fn serialize_template<S: serde::Serializer>(
    template: &FilenameTemplate,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(template.as_str())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package_name: String::new(),
            target_file: PathBuf::new(),
            explicit_struct_names: Vec::new(),
            debug: false,
            workdir: PathBuf::from("."),
            filename_template: FilenameTemplate::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.package_name.trim().is_empty() {
            return Err(GodError::Config(
                "missing package name, set --gopackage or $GOPACKAGE".to_string(),
            ));
        }
        if self.target_file.as_os_str().is_empty() {
            return Err(GodError::Config(
                "missing target file, set --gofile or $GOFILE".to_string(),
            ));
        }
        if !self.workdir.is_dir() {
            return Err(GodError::Config(format!(
                "working directory {} does not exist",
                self.workdir.display()
            )));
        }
        if let Some(empty) = self.explicit_struct_names.iter().find(|n| n.trim().is_empty()) {
            return Err(GodError::Config(format!("empty struct name in {:?}", empty)));
        }
        Ok(())
    }

    pub fn package_dir(&self) -> &Path {
        &self.workdir
    }

    /// Classification policy for the kinds generated in this run.
    pub fn policy_for(kinds: &[AccessorKind]) -> ClassifyPolicy {
        ClassifyPolicy {
            getters: kinds.contains(&AccessorKind::Getter),
            setters: kinds.contains(&AccessorKind::Setter),
        }
    }

    /// Rendered filenames are relative to the package directory.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.workdir.join(file_name)
    }

    /// Human-readable dump of the `go generate` environment, working
    /// directory, arguments and effective config.
    pub fn debug_report<I, S>(&self, args: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = String::from("Environments:\n");
        for (name, description) in GO_GENERATE_ENV {
            let value = std::env::var(name).unwrap_or_default();
            let _ = writeln!(out, "    ${}:  {}\n        {}", name, value, description);
        }

        let cwd = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|e| format!("<unknown: {}>", e));
        let _ = writeln!(out, "\nWorking Directory:\n    {}", cwd);

        out.push_str("\nCommand Args:\n");
        for (i, arg) in args.into_iter().enumerate() {
            let _ = writeln!(out, "    [{}] {}", i, arg.as_ref());
        }

        let config = serde_json::to_string_pretty(self)
            .unwrap_or_else(|e| format!("<cannot serialize config: {}>", e));
        let _ = writeln!(out, "\nConfig:\n{}", config);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn valid(dir: &Path) -> Config {
        Config {
            package_name: "demo".to_string(),
            target_file: PathBuf::from("user.go"),
            workdir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        let temp_dir = TempDir::new().unwrap();
        assert!(valid(temp_dir.path()).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_values() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = valid(temp_dir.path());
        config.package_name = " ".to_string();
        assert!(matches!(config.validate(), Err(GodError::Config(_))));

        let mut config = valid(temp_dir.path());
        config.target_file = PathBuf::new();
        assert!(matches!(config.validate(), Err(GodError::Config(_))));

        let mut config = valid(temp_dir.path());
        config.workdir = temp_dir.path().join("missing");
        assert!(matches!(config.validate(), Err(GodError::Config(_))));

        let mut config = valid(temp_dir.path());
        config.explicit_struct_names = vec!["User".to_string(), "".to_string()];
        assert!(matches!(config.validate(), Err(GodError::Config(_))));
    }

    #[test]
    fn test_policy_for_kinds() {
        let policy = Config::policy_for(&[AccessorKind::Getter]);
        assert!(policy.getters && !policy.setters);

        let policy = Config::policy_for(&[AccessorKind::Getter, AccessorKind::Setter]);
        assert!(policy.getters && policy.setters);
    }

    #[test]
    fn test_debug_report_sections() {
        let temp_dir = TempDir::new().unwrap();
        let report = valid(temp_dir.path()).debug_report(["god", "getter", "-t", "User"]);

        for section in ["Environments:", "$GOPACKAGE:", "Working Directory:", "Command Args:", "Config:"] {
            assert!(report.contains(section), "missing {} in report:\n{}", section, report);
        }
        assert!(report.contains("    [3] User\n"));
        assert!(report.contains("\"filename_template\": \"{{ lower_name }}_{{ kind }}.go\""));
    }
}
