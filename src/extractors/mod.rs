//! Struct extraction for Go sources
//!
//! # Architecture
//!
//! - `source.rs` - scan context and verbatim source text lookup
//! - `manager.rs` - reading and parsing package files
//! - `go/` - walking a parsed file: structs, fields, imports, methods

pub mod go;
pub mod manager;
pub mod source;

pub use go::fields::{classify_field, ClassifyPolicy, FieldBucket};
pub use go::{FileScan, GoExtractor};
pub use manager::{parse_file, scan_file, ParsedFile};
pub use source::{FileId, Position, ScanContext};

