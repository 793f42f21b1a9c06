//! Loading the manifests of a project directory together
//!
//! A project may split its declarations between `Cartfile` and
//! `Cartfile.private`. Both are parsed on their own, then checked against
//! each other before being merged.

use std::path::{Path, PathBuf};

use crate::comments::ManifestSyntax;
use crate::error::{ManifestError, Result};
use crate::parsers::{
    DeclarationFile, LockFile, ManifestFormat, PRIVATE_DECLARATION_PATH, SchemeAllowList,
    from_file,
};

/// Load `Cartfile` and, if present, `Cartfile.private` from `project_dir`.
///
/// A dependency declared in both files is reported with both paths as its
/// locations. Otherwise the private declarations are appended.
pub fn load_declarations(project_dir: &Path, syntax: &ManifestSyntax) -> Result<DeclarationFile> {
    let public_path = project_dir.join(DeclarationFile::RELATIVE_PATH);
    let private_path = project_dir.join(PRIVATE_DECLARATION_PATH);

    let mut declarations: DeclarationFile = from_file(&public_path, syntax)?;
    if !private_path.is_file() {
        return Ok(declarations);
    }

    let private: DeclarationFile = from_file(&private_path, syntax)?;
    let duplicates = declarations.duplicates_with(
        &private,
        &public_path.display().to_string(),
        &private_path.display().to_string(),
    );
    if !duplicates.is_empty() {
        tracing::warn!(
            "{} dependencies declared in both {} and {}",
            duplicates.len(),
            public_path.display(),
            private_path.display()
        );
        return Err(ManifestError::DuplicateDependencies(duplicates));
    }

    declarations.append(private);
    Ok(declarations)
}

/// Every manifest path in `project_dir` that exists on disk.
pub fn present_manifests(project_dir: &Path) -> Vec<PathBuf> {
    [
        DeclarationFile::RELATIVE_PATH,
        PRIVATE_DECLARATION_PATH,
        LockFile::RELATIVE_PATH,
        SchemeAllowList::RELATIVE_PATH,
    ]
    .iter()
    .map(|relative| project_dir.join(relative))
    .filter(|path| path.is_file())
    .collect()
}
