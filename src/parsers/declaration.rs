//! Parser for declaration files (Cartfile, Cartfile.private)
//!
//! One dependency per line: an identifier followed by an optional version
//! constraint. Syntax errors stop the parse at the offending line; duplicate
//! identifiers are collected and reported together once the whole file has
//! been read.

use hashbrown::HashMap;

use super::{DECLARATION_PATH, ManifestFormat};
use crate::comments::{ManifestSyntax, split_lines};
use crate::cursor::Cursor;
use crate::error::{DuplicateDependency, ManifestError, Result};
use crate::tokens::{ConstraintKind, DependencyId, DependencyKind, Scannable, VersionConstraint};

/// Dependencies and the version constraints declared for them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationFile {
    dependencies: HashMap<DependencyId, VersionConstraint>,
}

impl DeclarationFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dependency: &DependencyId) -> Option<&VersionConstraint> {
        self.dependencies.get(dependency)
    }

    pub fn contains(&self, dependency: &DependencyId) -> bool {
        self.dependencies.contains_key(dependency)
    }

    /// Insert or replace a dependency, returning the previous constraint.
    pub fn insert(
        &mut self,
        dependency: DependencyId,
        constraint: VersionConstraint,
    ) -> Option<VersionConstraint> {
        self.dependencies.insert(dependency, constraint)
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Entries sorted by identifier
    pub fn iter(&self) -> impl Iterator<Item = (&DependencyId, &VersionConstraint)> {
        let mut entries: Vec<_> = self.dependencies.iter().collect();
        entries.sort_by_cached_key(|(dependency, _)| dependency.to_string());
        entries.into_iter()
    }

    /// Add every entry of `other`, replacing existing constraints.
    ///
    /// Unlike parsing, merging never reports duplicates: the appended file
    /// wins.
    pub fn append(&mut self, other: DeclarationFile) {
        self.dependencies.extend(other.dependencies);
    }

    /// Identifiers declared both here and in `other`.
    ///
    /// Each duplicate records both locations, this file's first.
    pub fn duplicates_with(
        &self,
        other: &DeclarationFile,
        location: &str,
        other_location: &str,
    ) -> Vec<DuplicateDependency> {
        let mut shared: Vec<&DependencyId> = self
            .dependencies
            .keys()
            .filter(|dependency| other.contains(dependency))
            .collect();
        shared.sort_by_cached_key(|dependency| dependency.to_string());

        shared
            .into_iter()
            .map(|dependency| DuplicateDependency {
                dependency: dependency.clone(),
                locations: vec![location.to_string(), other_location.to_string()],
            })
            .collect()
    }
}

/// Parse one non-blank, non-comment line into an entry.
fn parse_line(line: &str, syntax: &ManifestSyntax) -> Result<(DependencyId, VersionConstraint)> {
    let content = syntax.strip_comment(line).trim();
    let mut cursor = Cursor::new(content);

    // Scan errors see the stripped text; report the line as written
    let dependency = DependencyId::scan(&mut cursor).map_err(|e| e.with_text(line))?;
    let constraint = VersionConstraint::scan(&mut cursor).map_err(|e| e.with_text(line))?;

    if dependency.kind() == DependencyKind::Binary
        && constraint.kind() == ConstraintKind::GitReference
    {
        return Err(ManifestError::Semantic {
            message: "binary dependencies cannot have a git reference for the version specifier"
                .to_string(),
            line: line.to_string(),
        });
    }

    cursor.skip_whitespace();
    if !cursor.is_at_end() {
        let rest = content.get(cursor.position()..).ok_or_else(|| {
            ManifestError::Internal(format!("could not locate the remainder of line: {line}"))
        })?;
        return Err(ManifestError::Semantic {
            message: format!("unexpected trailing characters \"{rest}\""),
            line: line.to_string(),
        });
    }

    Ok((dependency, constraint))
}

impl ManifestFormat for DeclarationFile {
    const RELATIVE_PATH: &'static str = DECLARATION_PATH;
    const DESCRIPTION: &'static str = "declaration file";

    fn parse(text: &str, syntax: &ManifestSyntax) -> Result<Self> {
        let mut file = DeclarationFile::new();
        let mut duplicates: Vec<DependencyId> = Vec::new();

        for line in split_lines(text) {
            // Whole-line comments are skipped before any stripping
            if syntax.is_comment_line(line) || line.trim().is_empty() {
                tracing::trace!("Skipping line: {:?}", line);
                continue;
            }

            let (dependency, constraint) = parse_line(line, syntax)?;
            if !file.contains(&dependency) {
                file.insert(dependency, constraint);
            } else if !duplicates.contains(&dependency) {
                duplicates.push(dependency);
            }
        }

        if !duplicates.is_empty() {
            tracing::warn!("Found {} duplicate dependencies", duplicates.len());
            return Err(ManifestError::DuplicateDependencies(
                duplicates.into_iter().map(DuplicateDependency::new).collect(),
            ));
        }

        Ok(file)
    }

    fn render(&self) -> String {
        let lines: Vec<String> = self
            .iter()
            .map(|(dependency, constraint)| match constraint {
                VersionConstraint::Any => dependency.to_string(),
                _ => format!("{dependency} {constraint}"),
            })
            .collect();
        format!("{}\n", lines.join("\n"))
    }

    fn entry_count(&self) -> usize {
        self.len()
    }
}
