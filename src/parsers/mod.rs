//! Parsers and serializers for the manifest files (Cartfile,
//! Cartfile.resolved, Cartfile.schemes)
//!
//! Every format implements [`ManifestFormat`], which gives it the shared
//! file-loading helpers in this module.

use std::path::Path;

use crate::comments::ManifestSyntax;
use crate::error::{ManifestError, Result};

pub mod declaration;
pub mod lockfile;
pub mod schemes;

pub use declaration::DeclarationFile;
pub use lockfile::LockFile;
pub use schemes::SchemeAllowList;

/// Relative path of the declaration file in a project directory
pub const DECLARATION_PATH: &str = "Cartfile";
/// Relative path of the private declaration file (same grammar)
pub const PRIVATE_DECLARATION_PATH: &str = "Cartfile.private";
/// Relative path of the lock file
pub const LOCK_PATH: &str = "Cartfile.resolved";
/// Relative path of the scheme allow-list
pub const SCHEMES_PATH: &str = "Cartfile.schemes";

/// A manifest format that can be parsed from and rendered to text
pub trait ManifestFormat: Sized {
    /// Where the file lives relative to the project directory
    const RELATIVE_PATH: &'static str;
    /// Human-readable name used in logs and reports
    const DESCRIPTION: &'static str;

    /// Parse the full text of a manifest
    fn parse(text: &str, syntax: &ManifestSyntax) -> Result<Self>;

    /// Render canonical text: sorted, one entry per line, trailing newline
    fn render(&self) -> String;

    /// Number of entries, for logging and reports
    fn entry_count(&self) -> usize;
}

/// Parse `text` read from `path`.
///
/// Duplicate-dependency errors are annotated with `path` as their location.
pub fn from_file_contents<F: ManifestFormat>(
    text: &str,
    path: &Path,
    syntax: &ManifestSyntax,
) -> Result<F> {
    let manifest = F::parse(text, syntax).map_err(|e| e.at_location(&path.display().to_string()))?;
    tracing::debug!(
        "Parsed {} {} with {} entries",
        F::DESCRIPTION,
        path.display(),
        manifest.entry_count()
    );
    Ok(manifest)
}

/// Read and parse the manifest at `path`.
pub fn from_file<F: ManifestFormat>(path: &Path, syntax: &ManifestSyntax) -> Result<F> {
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_file_contents(&text, path, syntax)
}

/// Read and parse the manifest at `path` without blocking the runtime.
pub async fn from_file_async<F: ManifestFormat>(path: &Path, syntax: &ManifestSyntax) -> Result<F> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    from_file_contents(&text, path, syntax)
}

/// Load the format's file from its canonical location in `project_dir`.
pub fn load<F: ManifestFormat>(project_dir: &Path, syntax: &ManifestSyntax) -> Result<F> {
    from_file(&project_dir.join(F::RELATIVE_PATH), syntax)
}
