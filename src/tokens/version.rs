//! Version constraints (`>= 1.0`, `~> 2.3`, `== 4.0.1`, `"branch"`) and
//! pinned versions (`"v1.2.3"`)

use std::fmt;

use semver::Version;

use super::{Scannable, scan_quoted};
use crate::comments::QUOTE;
use crate::cursor::Cursor;
use crate::error::ScanError;

const AT_LEAST: &str = ">=";
const COMPATIBLE_WITH: &str = "~>";
const EXACTLY: &str = "==";

/// Parse a semantic version, padding missing minor and patch components.
///
/// `2` and `2.0` both parse as `2.0.0`. A leading `v` is ignored.
pub fn parse_semantic_version(text: &str) -> Option<Version> {
    let text = text.strip_prefix('v').unwrap_or(text);
    let (core, suffix) = text.split_at(text.find(['-', '+']).unwrap_or(text.len()));
    if core.is_empty() {
        return None;
    }

    let padded = match core.split('.').count() {
        1 => format!("{core}.0.0{suffix}"),
        2 => format!("{core}.0{suffix}"),
        _ => text.to_string(),
    };
    Version::parse(&padded).ok()
}

/// The kind of a [`VersionConstraint`], without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Any,
    AtLeast,
    CompatibleWith,
    Exactly,
    GitReference,
}

impl ConstraintKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConstraintKind::Any => "any",
            ConstraintKind::AtLeast => "at-least",
            ConstraintKind::CompatibleWith => "compatible-with",
            ConstraintKind::Exactly => "exactly",
            ConstraintKind::GitReference => "git-reference",
        }
    }
}

/// A rule limiting which versions of a dependency are acceptable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum VersionConstraint {
    /// No constraint was written
    #[default]
    Any,
    /// `>= version`
    AtLeast(Version),
    /// `~> version`
    CompatibleWith(Version),
    /// `== version`
    Exactly(Version),
    /// A quoted branch, tag or commit
    GitReference(String),
}

impl VersionConstraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            VersionConstraint::Any => ConstraintKind::Any,
            VersionConstraint::AtLeast(_) => ConstraintKind::AtLeast,
            VersionConstraint::CompatibleWith(_) => ConstraintKind::CompatibleWith,
            VersionConstraint::Exactly(_) => ConstraintKind::Exactly,
            VersionConstraint::GitReference(_) => ConstraintKind::GitReference,
        }
    }
}

impl fmt::Display for VersionConstraint {
    /// Canonical text; [`VersionConstraint::Any`] renders as nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Any => Ok(()),
            VersionConstraint::AtLeast(version) => write!(f, "{AT_LEAST} {version}"),
            VersionConstraint::CompatibleWith(version) => write!(f, "{COMPATIBLE_WITH} {version}"),
            VersionConstraint::Exactly(version) => write!(f, "{EXACTLY} {version}"),
            VersionConstraint::GitReference(reference) => write!(f, "{QUOTE}{reference}{QUOTE}"),
        }
    }
}

/// Scan the version that follows `operator`.
fn scan_version(cursor: &mut Cursor<'_>, operator: &str) -> Result<Version, ScanError> {
    cursor.skip_whitespace();
    let token = cursor.scan_until(char::is_whitespace);
    if token.is_empty() {
        return Err(ScanError::new(
            cursor,
            format!("expected version after {operator}"),
        ));
    }

    parse_semantic_version(token).ok_or_else(|| {
        ScanError::new(
            cursor,
            format!("invalid semantic version \"{token}\" after {operator}"),
        )
    })
}

impl Scannable for VersionConstraint {
    /// Anything that is not an operator or a quote yields
    /// [`VersionConstraint::Any`] without consuming input.
    fn scan(cursor: &mut Cursor<'_>) -> Result<Self, ScanError> {
        cursor.skip_whitespace();

        if cursor.consume_literal(EXACTLY) {
            scan_version(cursor, EXACTLY).map(VersionConstraint::Exactly)
        } else if cursor.consume_literal(AT_LEAST) {
            scan_version(cursor, AT_LEAST).map(VersionConstraint::AtLeast)
        } else if cursor.consume_literal(COMPATIBLE_WITH) {
            scan_version(cursor, COMPATIBLE_WITH).map(VersionConstraint::CompatibleWith)
        } else if cursor.peek_literal(&QUOTE.to_string()) {
            let reference = scan_quoted(cursor, "git reference")?;
            Ok(VersionConstraint::GitReference(reference.to_string()))
        } else {
            Ok(VersionConstraint::Any)
        }
    }
}

/// An exact, already-resolved version token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PinnedVersion(String);

impl PinnedVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The pinned token as a semantic version, if it is one
    pub fn semantic_version(&self) -> Option<Version> {
        parse_semantic_version(&self.0)
    }
}

impl fmt::Display for PinnedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Scannable for PinnedVersion {
    fn scan(cursor: &mut Cursor<'_>) -> Result<Self, ScanError> {
        scan_quoted(cursor, "pinned version").map(PinnedVersion::new)
    }
}
