// Utilities Module
//
// Name rules and package file discovery shared by the extractors, the
// resolver and the generators.

/// Build constraints (`//go:build`, `_GOOS`/`_GOARCH` file names)
pub mod build;

/// Go identifier rules (visibility, accessor and receiver names)
pub mod names;

/// Package file discovery (`*.go` minus tests)
pub mod paths;
