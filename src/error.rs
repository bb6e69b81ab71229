//! Error taxonomy for struct extraction, classification and code generation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GodError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot find provided filename {} in package {}", file.display(), package_dir.display())]
    FileNotFound { file: PathBuf, package_dir: PathBuf },

    #[error("cannot parse file {}: syntax error at {line}:{column}", file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        column: usize,
    },

    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("cannot get struct {0} from package")]
    MissingStruct(String),

    #[error("cannot read file {}: {error}", path.display())]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("cannot read source range [{start}, {end}) of {}: {reason}", path.display())]
    Range {
        path: PathBuf,
        start: usize,
        end: usize,
        reason: String,
    },

    #[error("invalid filename template {template:?}: {reason}")]
    Template { template: String, reason: String },

    #[error("cannot save to file {}: {reason}", path.display())]
    Save { path: PathBuf, reason: String },

    #[error("in {context}: {inner}")]
    Context { context: String, inner: Box<GodError> },
}

pub type Result<T> = std::result::Result<T, GodError>;

impl GodError {
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        GodError::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Wrap this error with the file or struct it happened in.
    pub fn within(self, context: impl Into<String>) -> Self {
        GodError::Context {
            context: context.into(),
            inner: Box::new(self),
        }
    }

    /// The innermost error, skipping any context layers.
    pub fn root(&self) -> &GodError {
        match self {
            GodError::Context { inner, .. } => inner.root(),
            other => other,
        }
    }
}
