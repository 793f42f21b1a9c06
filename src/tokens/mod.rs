//! Token parsers for dependency identifiers, version constraints and
//! pinned versions
//!
//! Each token type implements [`Scannable`]: it takes a shared [`Cursor`],
//! skips leading whitespace, and advances past exactly one token.

use crate::comments::QUOTE;
use crate::cursor::Cursor;
use crate::error::ScanError;

pub mod dependency;
pub mod version;

pub use dependency::{
    BinaryUrl, DependencyId, DependencyKind, GitHubRepository, GitHubServer, GitUrl,
};
pub use version::{ConstraintKind, PinnedVersion, VersionConstraint};

/// A value that can be read from a [`Cursor`].
pub trait Scannable: Sized {
    /// Scan one token, advancing the cursor past it on success.
    fn scan(cursor: &mut Cursor<'_>) -> Result<Self, ScanError>;
}

/// Scan a non-empty double-quoted string, returning its contents.
///
/// `what` names the expected string in error messages.
pub(crate) fn scan_quoted<'a>(cursor: &mut Cursor<'a>, what: &str) -> Result<&'a str, ScanError> {
    cursor.skip_whitespace();
    let quote = QUOTE.to_string();
    if !cursor.consume_literal(&quote) {
        return Err(ScanError::new(cursor, format!("expected quoted {what}")));
    }

    let contents = cursor.scan_until(|c| c == QUOTE);
    if !cursor.consume_literal(&quote) {
        return Err(ScanError::new(cursor, format!("unterminated {what}")));
    }
    if contents.is_empty() {
        return Err(ScanError::new(cursor, format!("empty {what}")));
    }

    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_quoted() {
        let mut cursor = Cursor::new("  \"hello world\" rest");
        assert_eq!(scan_quoted(&mut cursor, "test").unwrap(), "hello world");
        assert_eq!(cursor.remaining(), " rest");
    }

    #[test]
    fn test_scan_quoted_missing_quote() {
        let mut cursor = Cursor::new("hello");
        let err = scan_quoted(&mut cursor, "URL after git").unwrap_err();
        assert_eq!(err.description, "expected quoted URL after git");
    }

    #[test]
    fn test_scan_quoted_unterminated() {
        let mut cursor = Cursor::new("\"hello");
        let err = scan_quoted(&mut cursor, "URL after git").unwrap_err();
        assert_eq!(err.description, "unterminated URL after git");
        assert_eq!(err.text.as_deref(), Some("\"hello"));
    }

    #[test]
    fn test_scan_quoted_empty() {
        let mut cursor = Cursor::new("\"\"");
        let err = scan_quoted(&mut cursor, "URL after git").unwrap_err();
        assert_eq!(err.description, "empty URL after git");
    }
}
