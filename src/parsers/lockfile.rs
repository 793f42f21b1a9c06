//! Parser for lock files (Cartfile.resolved)
//!
//! The whole buffer is scanned with one cursor as a sequence of
//! `<identifier> "<pinned version>"` pairs; line breaks carry no meaning.

use hashbrown::HashMap;

use super::{LOCK_PATH, ManifestFormat};
use crate::comments::{ManifestSyntax, QUOTE};
use crate::cursor::Cursor;
use crate::error::Result;
use crate::tokens::{DependencyId, PinnedVersion, Scannable};

/// The exact version resolved for each dependency
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockFile {
    pins: HashMap<DependencyId, PinnedVersion>,
}

impl LockFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dependency: &DependencyId) -> Option<&PinnedVersion> {
        self.pins.get(dependency)
    }

    pub fn contains(&self, dependency: &DependencyId) -> bool {
        self.pins.contains_key(dependency)
    }

    /// Pin a dependency, returning the version it replaced.
    pub fn insert(
        &mut self,
        dependency: DependencyId,
        version: PinnedVersion,
    ) -> Option<PinnedVersion> {
        self.pins.insert(dependency, version)
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Entries sorted by identifier
    pub fn iter(&self) -> impl Iterator<Item = (&DependencyId, &PinnedVersion)> {
        let mut entries: Vec<_> = self.pins.iter().collect();
        entries.sort_by_cached_key(|(dependency, _)| dependency.to_string());
        entries.into_iter()
    }
}

impl ManifestFormat for LockFile {
    const RELATIVE_PATH: &'static str = LOCK_PATH;
    const DESCRIPTION: &'static str = "lock file";

    /// Comments are not part of the lock file grammar, so `_syntax` is unused.
    fn parse(text: &str, _syntax: &ManifestSyntax) -> Result<Self> {
        let mut file = LockFile::new();
        let mut cursor = Cursor::new(text);

        loop {
            cursor.skip_whitespace();
            if cursor.is_at_end() {
                break;
            }

            let dependency = DependencyId::scan(&mut cursor)?;
            let version = PinnedVersion::scan(&mut cursor)?;
            if let Some(previous) = file.insert(dependency, version) {
                tracing::debug!("Lock file entry pinned at {} was overwritten", previous);
            }
        }

        Ok(file)
    }

    fn render(&self) -> String {
        let lines: Vec<String> = self
            .iter()
            .map(|(dependency, version)| format!("{dependency} {QUOTE}{version}{QUOTE}"))
            .collect();
        format!("{}\n", lines.join("\n"))
    }

    fn entry_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ManifestError;
    use crate::tokens::GitHubRepository;

    fn parse(text: &str) -> Result<LockFile> {
        LockFile::parse(text, &ManifestSyntax::default())
    }

    fn github(owner: &str, name: &str) -> DependencyId {
        DependencyId::GitHub(GitHubRepository::dot_com(owner, name))
    }

    const RESOLVED: &str = r#"binary "https://my.domain.com/release/MyFramework.json" "2.3.4"
git "https://enterprise.local/desktop/git-error-translations2.git" "8ff4393ede2ca86d5a78edaf62b3a14d90bffab9"
github "Mantle/Mantle" "1.5.8"
github "ReactiveCocoa/ReactiveCocoa" "v2.5"
"#;

    #[test]
    fn test_parse_resolved() {
        let file = parse(RESOLVED).unwrap();
        assert_eq!(file.len(), 4);
        assert_eq!(
            file.get(&github("Mantle", "Mantle")).map(PinnedVersion::as_str),
            Some("1.5.8")
        );
        assert_eq!(
            file.get(&github("ReactiveCocoa", "ReactiveCocoa")).map(PinnedVersion::as_str),
            Some("v2.5")
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  \n\n ").unwrap().is_empty());
    }

    #[test]
    fn test_line_breaks_are_not_significant() {
        let file = parse("github \"a/b\"\n  \"1.0.0\" github \"c/d\" \"2.0.0\"").unwrap();
        assert_eq!(file.len(), 2);
    }

    #[test]
    fn test_later_entry_overwrites() {
        let file = parse("github \"a/b\" \"1.0.0\"\ngithub \"a/b\" \"2.0.0\"\n").unwrap();
        assert_eq!(file.len(), 1);
        assert_eq!(
            file.get(&github("a", "b")).map(PinnedVersion::as_str),
            Some("2.0.0")
        );
    }

    #[test]
    fn test_missing_pinned_version_fails() {
        let err = parse("github \"a/b\"\ngithub \"c/d\" \"1.0\"\n").unwrap_err();
        match err {
            ManifestError::Scan(scan) => {
                assert_eq!(scan.description, "expected quoted pinned version");
                assert_eq!(scan.text.as_deref(), Some("github \"c/d\" \"1.0\""));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_binary_with_commit_is_accepted() {
        let file = parse("binary \"https://x.com/A.json\" \"deadbeef\"\n").unwrap();
        assert_eq!(file.len(), 1);
    }

    #[test]
    fn test_render_sorted_and_quoted() {
        let file = parse(
            "github \"z/z\" \"1.0\"\ngithub \"a/a\" \"v2\"\ngit \"https://x.com/r.git\" \"abc\"",
        )
        .unwrap();
        assert_eq!(
            file.render(),
            "git \"https://x.com/r.git\" \"abc\"\ngithub \"a/a\" \"v2\"\ngithub \"z/z\" \"1.0\"\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let file = parse(RESOLVED).unwrap();
        assert_eq!(parse(&file.render()).unwrap(), file);
        assert_eq!(file.render(), RESOLVED);
    }

    #[test]
    fn test_repeated_git_suffix_is_rejected() {
        let err = parse("github \"o/x.git.git\" \"1.0\"\n").unwrap_err();
        assert!(matches!(err, ManifestError::Scan(_)), "{err}");
    }
}
