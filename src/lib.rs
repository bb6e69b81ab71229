// god - getter/setter generator for Go structs
//
// Parses Go sources with tree-sitter, classifies struct fields, and writes
// accessor files next to the package. Meant to run under `go generate`.

pub mod config;
pub mod error;
pub mod extractors;
pub mod generator;
pub mod language;
pub mod model;
pub mod pipeline;
pub mod resolver;
pub mod utils;
pub mod writer;

pub use config::Config;
pub use error::{GodError, Result};
pub use generator::{AccessorKind, FilenameTemplate};
pub use model::{Field, Struct, Structs};
pub use pipeline::{generate, SavedFile};
pub use writer::{CodeWriter, GoFileWriter};
