//! Comment handling shared by the line-oriented manifest parsers
//!
//! A comment runs from the first *unquoted* comment indicator to the end of
//! the line. Indicators inside a quoted span are literal text, so
//! `github "org/repo" "1.0#beta"` has no comment at all.

use serde::{Deserialize, Serialize};

/// Default comment indicator for every manifest format
pub const DEFAULT_COMMENT_INDICATOR: &str = "#";

/// Quote character delimiting identifiers, references and pinned versions
pub const QUOTE: char = '"';

/// Lexical settings used to classify and strip manifest lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSyntax {
    /// Sequence that starts a comment (may be longer than one character)
    pub comment_indicator: String,
}

impl Default for ManifestSyntax {
    fn default() -> Self {
        Self {
            comment_indicator: DEFAULT_COMMENT_INDICATOR.to_string(),
        }
    }
}

impl ManifestSyntax {
    pub fn with_comment_indicator(indicator: impl Into<String>) -> Self {
        Self {
            comment_indicator: indicator.into(),
        }
    }

    /// True if the line, ignoring leading whitespace, is itself a comment.
    pub fn is_comment_line(&self, line: &str) -> bool {
        !self.comment_indicator.is_empty()
            && line.trim_start().starts_with(self.comment_indicator.as_str())
    }

    /// Remove an unquoted trailing comment from `line`.
    ///
    /// The line is split on the quote character; even-indexed chunks are
    /// outside quotes. The first even chunk containing the indicator is cut
    /// there and everything after it is dropped. An odd number of quotes is
    /// accepted as-is.
    pub fn strip_comment<'a>(&self, line: &'a str) -> &'a str {
        let indicator = self.comment_indicator.as_str();
        if indicator.is_empty() {
            return line;
        }

        let quote_len = QUOTE.len_utf8();
        let mut offset = 0;
        for (index, chunk) in line.split(QUOTE).enumerate() {
            if index % 2 == 0
                && let Some(found) = chunk.find(indicator)
            {
                return &line[..offset + found];
            }
            offset += chunk.len() + quote_len;
        }

        line
    }
}

/// Split text into logical lines on `\r\n`, `\n` or a lone `\r`.
///
/// A trailing line break does not produce an extra empty line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest.filter(|r| !r.is_empty())?;
        match current.find(['\r', '\n']) {
            Some(idx) => {
                let width = if current[idx..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[idx + width..]);
                Some(&current[..idx])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}
