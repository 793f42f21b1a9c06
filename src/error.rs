//! Error types for manifest parsing and loading

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::cursor::Cursor;
use crate::tokens::DependencyId;

/// A malformed or incomplete token reported by a token parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{description}{}", .text.as_deref().map(|t| format!(" in line: {t}")).unwrap_or_default())]
pub struct ScanError {
    /// What the scanner expected or found
    pub description: String,
    /// The line being scanned, when it could be located
    pub text: Option<String>,
    /// Byte offset of the cursor when the error was raised
    pub position: usize,
}

impl ScanError {
    /// Build an error at the cursor's current position.
    pub fn new(cursor: &Cursor<'_>, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            text: cursor.current_line().map(str::to_string),
            position: cursor.position(),
        }
    }

    /// Report `text` as the offending line instead of the scanned text.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..self
        }
    }
}

/// A dependency declared more than once, with the files it was seen in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateDependency {
    pub dependency: DependencyId,
    pub locations: Vec<String>,
}

impl DuplicateDependency {
    pub fn new(dependency: DependencyId) -> Self {
        Self {
            dependency,
            locations: Vec::new(),
        }
    }
}

impl fmt::Display for DuplicateDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dependency)?;
        if !self.locations.is_empty() {
            write!(f, " (found in {})", self.locations.join(", "))?;
        }
        Ok(())
    }
}

fn format_duplicates(duplicates: &[DuplicateDependency]) -> String {
    let mut message = String::from("the following dependencies are duplicates:");
    for duplicate in duplicates {
        message.push_str("\n\t");
        message.push_str(&duplicate.to_string());
    }
    message
}

/// Errors raised while loading or parsing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The file could not be read; raised before any parsing happens
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A token could not be scanned
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The line is well-formed but violates a manifest rule
    #[error("{message} in line: {line}")]
    Semantic { message: String, line: String },

    /// A condition that should not be reachable
    #[error("internal error: {0}")]
    Internal(String),

    /// Every dependency declared more than once
    #[error("{}", format_duplicates(.0))]
    DuplicateDependencies(Vec<DuplicateDependency>),
}

impl ManifestError {
    /// Record `location` as the only place each duplicate was found.
    ///
    /// Other variants are returned unchanged.
    pub fn at_location(self, location: &str) -> Self {
        match self {
            ManifestError::DuplicateDependencies(duplicates) => {
                ManifestError::DuplicateDependencies(
                    duplicates
                        .into_iter()
                        .map(|duplicate| DuplicateDependency {
                            locations: vec![location.to_string()],
                            ..duplicate
                        })
                        .collect(),
                )
            }
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ManifestError>;
