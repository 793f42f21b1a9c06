//! Cartfile manifest parsing and formatting
//!
//! This crate parses and canonically re-renders the three manifest formats
//! of a dependency manager: declaration files (`Cartfile`), lock files
//! (`Cartfile.resolved`) and scheme allow-lists (`Cartfile.schemes`).

pub mod comments;
pub mod config;
pub mod cursor;
pub mod error;
pub mod file_types;
pub mod parsers;
pub mod project;
pub mod reports;
pub mod tokens;

pub use comments::ManifestSyntax;
pub use error::{DuplicateDependency, ManifestError, ScanError};
pub use parsers::{DeclarationFile, LockFile, ManifestFormat, SchemeAllowList};
