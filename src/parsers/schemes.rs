//! Parser for the scheme allow-list (Cartfile.schemes)
//!
//! One scheme name per line. Lines starting with the comment indicator and
//! blank lines are ignored.

use hashbrown::HashSet;

use super::{ManifestFormat, SCHEMES_PATH};
use crate::comments::{ManifestSyntax, split_lines};
use crate::error::Result;

/// The build schemes eligible for building
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemeAllowList {
    schemes: HashSet<String>,
}

impl SchemeAllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-sensitive membership test
    pub fn contains(&self, scheme: &str) -> bool {
        self.schemes.contains(scheme)
    }

    pub fn insert(&mut self, scheme: impl Into<String>) -> bool {
        self.schemes.insert(scheme.into())
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Scheme names in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let mut schemes: Vec<&str> = self.schemes.iter().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes.into_iter()
    }
}

impl ManifestFormat for SchemeAllowList {
    const RELATIVE_PATH: &'static str = SCHEMES_PATH;
    const DESCRIPTION: &'static str = "scheme allow-list";

    fn parse(text: &str, syntax: &ManifestSyntax) -> Result<Self> {
        let indicator = syntax.comment_indicator.as_str();
        let mut list = SchemeAllowList::new();

        for line in split_lines(text) {
            if !indicator.is_empty() && line.starts_with(indicator) {
                tracing::trace!("Skipping comment: {}", line);
                continue;
            }
            let scheme = line.trim();
            if !scheme.is_empty() {
                list.insert(scheme);
            }
        }

        Ok(list)
    }

    fn render(&self) -> String {
        let lines: Vec<&str> = self.iter().collect();
        format!("{}\n", lines.join("\n"))
    }

    fn entry_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> SchemeAllowList {
        SchemeAllowList::parse(text, &ManifestSyntax::default()).unwrap()
    }

    #[test]
    fn test_parse_and_render() {
        let list = parse("# note\nfoo\n\nbar\nfoo\n");
        assert_eq!(list.len(), 2);
        assert!(list.contains("foo"));
        assert!(list.contains("bar"));
        assert_eq!(list.render(), "bar\nfoo\n");
    }

    #[test]
    fn test_case_sensitive() {
        let list = parse("Framework\nframework\n");
        assert_eq!(list.len(), 2);
        assert!(!list.contains("FRAMEWORK"));
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let list = parse("  MyScheme-iOS \t\r\n\tMyScheme-macOS\n");
        assert_eq!(
            list.iter().collect::<Vec<_>>(),
            vec!["MyScheme-iOS", "MyScheme-macOS"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("# only comments\n\n").is_empty());
    }

    #[test]
    fn test_custom_comment_indicator() {
        let syntax = ManifestSyntax::with_comment_indicator("--");
        let list = SchemeAllowList::parse("-- skip\n#kept\n", &syntax).unwrap();
        assert!(list.contains("#kept"));
        assert_eq!(list.len(), 1);
    }
}
