//! Position-tracking view over manifest text
//!
//! Token parsers take a `&mut Cursor` and advance it past exactly one token.
//! The cursor never moves backwards and always sits on a UTF-8 boundary.

/// A byte-offset cursor over a borrowed string.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    /// Byte offset of the cursor within the source.
    pub fn position(&self) -> usize {
        self.position
    }

    /// True when every byte has been consumed. Whitespace is not skipped.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// The text from the current position to the end of the source.
    pub fn remaining(&self) -> &'a str {
        &self.source[self.position..]
    }

    pub fn peek_literal(&self, literal: &str) -> bool {
        self.remaining().starts_with(literal)
    }

    /// Consume `literal` if the remaining text starts with it.
    pub fn consume_literal(&mut self, literal: &str) -> bool {
        if self.peek_literal(literal) {
            self.position += literal.len();
            true
        } else {
            false
        }
    }

    /// Skip spaces, tabs and line breaks.
    pub fn skip_whitespace(&mut self) {
        let rest = self.remaining();
        let trimmed = rest.trim_start();
        self.position += rest.len() - trimmed.len();
    }

    /// Consume characters up to (not including) the first one matching `stop`.
    ///
    /// Consumes the rest of the source when nothing matches.
    pub fn scan_until(&mut self, stop: impl Fn(char) -> bool) -> &'a str {
        let rest = self.remaining();
        let len = rest.find(stop).unwrap_or(rest.len());
        self.position += len;
        &rest[..len]
    }

    /// The logical line containing the cursor, for diagnostics.
    ///
    /// Returns `None` if the position does not fall on a character boundary
    /// of the source.
    pub fn current_line(&self) -> Option<&'a str> {
        let before = self.source.get(..self.position)?;
        let after = self.source.get(self.position..)?;
        let start = before.rfind(['\n', '\r']).map_or(0, |idx| idx + 1);
        let end = self.position + after.find(['\n', '\r']).unwrap_or(after.len());
        self.source.get(start..end)
    }
}
