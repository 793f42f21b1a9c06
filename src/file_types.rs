//! Manifest kind detection
//!
//! Maps a file path to the manifest format it holds, so callers can parse
//! and render a file without knowing its format up front.

use std::path::Path;

use crate::comments::ManifestSyntax;
use crate::error::Result;
use crate::parsers::{
    DeclarationFile, LockFile, ManifestFormat, PRIVATE_DECLARATION_PATH, SchemeAllowList,
    from_file_async, from_file_contents,
};
use crate::reports::ManifestReport;

/// Supported manifest kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// Dependency declarations (Cartfile, Cartfile.private)
    Declaration,
    /// Resolved versions (Cartfile.resolved)
    Lock,
    /// Scheme allow-list (Cartfile.schemes)
    Schemes,
}

/// A manifest parsed from a file whose kind was detected at runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedManifest {
    Declaration(DeclarationFile),
    Lock(LockFile),
    Schemes(SchemeAllowList),
}

impl ManifestKind {
    /// Detect the manifest kind from a file name.
    ///
    /// Returns `None` if the file name is not a known manifest.
    pub fn detect(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        if file_name == DeclarationFile::RELATIVE_PATH || file_name == PRIVATE_DECLARATION_PATH {
            Some(ManifestKind::Declaration)
        } else if file_name == LockFile::RELATIVE_PATH {
            Some(ManifestKind::Lock)
        } else if file_name == SchemeAllowList::RELATIVE_PATH {
            Some(ManifestKind::Schemes)
        } else {
            None
        }
    }

    /// Parse `text` read from `path` as this kind of manifest
    pub fn parse(self, text: &str, path: &Path, syntax: &ManifestSyntax) -> Result<ParsedManifest> {
        Ok(match self {
            ManifestKind::Declaration => {
                ParsedManifest::Declaration(from_file_contents(text, path, syntax)?)
            }
            ManifestKind::Lock => ParsedManifest::Lock(from_file_contents(text, path, syntax)?),
            ManifestKind::Schemes => {
                ParsedManifest::Schemes(from_file_contents(text, path, syntax)?)
            }
        })
    }

    /// Read and parse the manifest at `path`
    pub async fn load(self, path: &Path, syntax: &ManifestSyntax) -> Result<ParsedManifest> {
        Ok(match self {
            ManifestKind::Declaration => {
                ParsedManifest::Declaration(from_file_async(path, syntax).await?)
            }
            ManifestKind::Lock => ParsedManifest::Lock(from_file_async(path, syntax).await?),
            ManifestKind::Schemes => ParsedManifest::Schemes(from_file_async(path, syntax).await?),
        })
    }
}

impl ParsedManifest {
    pub fn render(&self) -> String {
        match self {
            ParsedManifest::Declaration(file) => file.render(),
            ParsedManifest::Lock(file) => file.render(),
            ParsedManifest::Schemes(file) => file.render(),
        }
    }

    pub fn entry_count(&self) -> usize {
        match self {
            ParsedManifest::Declaration(file) => file.entry_count(),
            ParsedManifest::Lock(file) => file.entry_count(),
            ParsedManifest::Schemes(file) => file.entry_count(),
        }
    }

    pub fn report(&self, file: &str) -> ManifestReport {
        match self {
            ParsedManifest::Declaration(declarations) => {
                ManifestReport::from_declarations(file, declarations)
            }
            ParsedManifest::Lock(lock) => ManifestReport::from_lock(file, lock),
            ParsedManifest::Schemes(schemes) => ManifestReport::from_schemes(file, schemes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_declaration() {
        assert_eq!(
            ManifestKind::detect(Path::new("/project/Cartfile")),
            Some(ManifestKind::Declaration)
        );
        assert_eq!(
            ManifestKind::detect(Path::new("Cartfile.private")),
            Some(ManifestKind::Declaration)
        );
    }

    #[test]
    fn test_detect_lock_and_schemes() {
        assert_eq!(
            ManifestKind::detect(Path::new("/project/Cartfile.resolved")),
            Some(ManifestKind::Lock)
        );
        assert_eq!(
            ManifestKind::detect(Path::new("/project/Cartfile.schemes")),
            Some(ManifestKind::Schemes)
        );
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(ManifestKind::detect(Path::new("/project/Cartfile.bak")), None);
        assert_eq!(ManifestKind::detect(Path::new("/project/Cartfile/notes.txt")), None);
        assert_eq!(ManifestKind::detect(Path::new("/")), None);
    }

    #[test]
    fn test_parse_by_kind() {
        let syntax = ManifestSyntax::default();
        let parsed = ManifestKind::Lock
            .parse("github \"a/b\" \"1.0\"", Path::new("Cartfile.resolved"), &syntax)
            .unwrap();
        assert_eq!(parsed.entry_count(), 1);
        assert_eq!(parsed.render(), "github \"a/b\" \"1.0\"\n");
        assert_eq!(parsed.report("Cartfile.resolved").manifest, "lock file");
    }

    #[tokio::test]
    async fn test_load_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cartfile.schemes");
        tokio::fs::write(&path, "B\nA\n").await.unwrap();

        let parsed = ManifestKind::Schemes
            .load(&path, &ManifestSyntax::default())
            .await
            .unwrap();
        assert_eq!(parsed.render(), "A\nB\n");
    }
}
