//! Manifest report generation
//!
//! Renders a parsed manifest as JSON, Markdown or a plain-text summary,
//! optionally with a declaration/lock consistency section.

use serde::Serialize;

use crate::parsers::{DeclarationFile, LockFile, ManifestFormat, SchemeAllowList};
use crate::tokens::VersionConstraint;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Summary,
}

impl OutputFormat {
    /// Parse a format name, defaulting to [`OutputFormat::Summary`]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Summary,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub kind: String,
    pub identifier: String,
    pub requirement: String,
}

/// Name-level comparison between declared and locked dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencySummary {
    /// Declared but missing from the lock file
    pub unlocked: Vec<String>,
    /// Locked but not declared
    pub undeclared: Vec<String>,
}

impl ConsistencySummary {
    pub fn is_consistent(&self) -> bool {
        self.unlocked.is_empty() && self.undeclared.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestReport {
    pub file: String,
    pub manifest: &'static str,
    pub entries: Vec<ReportEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency: Option<ConsistencySummary>,
}

impl ManifestReport {
    pub fn from_declarations(file: &str, declarations: &DeclarationFile) -> Self {
        let entries = declarations
            .iter()
            .map(|(dependency, constraint)| ReportEntry {
                name: dependency.name().to_string(),
                kind: dependency.kind().as_str().to_string(),
                identifier: dependency.to_string(),
                requirement: match constraint {
                    VersionConstraint::Any => "*".to_string(),
                    _ => constraint.to_string(),
                },
            })
            .collect();

        Self {
            file: file.to_string(),
            manifest: DeclarationFile::DESCRIPTION,
            entries,
            consistency: None,
        }
    }

    pub fn from_lock(file: &str, lock: &LockFile) -> Self {
        let entries = lock
            .iter()
            .map(|(dependency, version)| ReportEntry {
                name: dependency.name().to_string(),
                kind: dependency.kind().as_str().to_string(),
                identifier: dependency.to_string(),
                requirement: version.to_string(),
            })
            .collect();

        Self {
            file: file.to_string(),
            manifest: LockFile::DESCRIPTION,
            entries,
            consistency: None,
        }
    }

    pub fn from_schemes(file: &str, schemes: &SchemeAllowList) -> Self {
        let entries = schemes
            .iter()
            .map(|scheme| ReportEntry {
                name: scheme.to_string(),
                kind: "scheme".to_string(),
                identifier: scheme.to_string(),
                requirement: String::new(),
            })
            .collect();

        Self {
            file: file.to_string(),
            manifest: SchemeAllowList::DESCRIPTION,
            entries,
            consistency: None,
        }
    }

    pub fn with_consistency(mut self, summary: ConsistencySummary) -> Self {
        self.consistency = Some(summary);
        self
    }
}

/// Compare declared identifiers with locked ones.
///
/// Versions are not checked against constraints.
pub fn check_consistency(declarations: &DeclarationFile, lock: &LockFile) -> ConsistencySummary {
    ConsistencySummary {
        unlocked: declarations
            .iter()
            .filter(|(dependency, _)| !lock.contains(dependency))
            .map(|(dependency, _)| dependency.to_string())
            .collect(),
        undeclared: lock
            .iter()
            .filter(|(dependency, _)| !declarations.contains(dependency))
            .map(|(dependency, _)| dependency.to_string())
            .collect(),
    }
}

pub fn generate_json_report(report: &ManifestReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn generate_markdown_report(report: &ManifestReport) -> String {
    let mut lines = vec![
        "# Manifest Report".to_string(),
        String::new(),
        format!("**File**: {}", report.file),
        format!("**Manifest**: {}", report.manifest),
        format!("**Entries**: {}", report.entries.len()),
        String::new(),
    ];

    if report.entries.is_empty() {
        lines.push("No entries found.".to_string());
    } else {
        lines.push("| Name | Kind | Identifier | Requirement |".to_string());
        lines.push("|------|------|------------|-------------|".to_string());
        for entry in &report.entries {
            lines.push(format!(
                "| {} | {} | `{}` | {} |",
                entry.name, entry.kind, entry.identifier, entry.requirement
            ));
        }
    }

    if let Some(consistency) = &report.consistency {
        lines.push(String::new());
        lines.push("## Lock File Consistency".to_string());
        lines.push(String::new());
        if consistency.is_consistent() {
            lines.push("All declared dependencies are locked.".to_string());
        }
        for dependency in &consistency.unlocked {
            lines.push(format!("- Not locked: `{dependency}`"));
        }
        for dependency in &consistency.undeclared {
            lines.push(format!("- Not declared: `{dependency}`"));
        }
    }

    lines.join("\n")
}

pub fn generate_summary(report: &ManifestReport) -> String {
    let mut lines = vec![
        format!("{} ({})", report.file, report.manifest),
        format!("  Entries: {}", report.entries.len()),
    ];

    for entry in &report.entries {
        if entry.requirement.is_empty() {
            lines.push(format!("  {}", entry.identifier));
        } else {
            lines.push(format!("  {} {}", entry.identifier, entry.requirement));
        }
    }

    if let Some(consistency) = &report.consistency {
        if consistency.is_consistent() {
            lines.push("[OK] Lock file matches declarations".to_string());
        } else {
            lines.push(format!(
                "[!] {} not locked, {} not declared",
                consistency.unlocked.len(),
                consistency.undeclared.len()
            ));
        }
    }

    lines.join("\n")
}

/// Render `report` in the requested format
pub fn render_report(report: &ManifestReport, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => generate_json_report(report),
        OutputFormat::Markdown => Ok(generate_markdown_report(report)),
        OutputFormat::Summary => Ok(generate_summary(report)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::ManifestSyntax;

    fn declarations() -> DeclarationFile {
        DeclarationFile::parse(
            "github \"Mantle/Mantle\" ~> 1.0\ngithub \"a/unlocked\"\n",
            &ManifestSyntax::default(),
        )
        .unwrap()
    }

    fn lock() -> LockFile {
        LockFile::parse(
            "github \"Mantle/Mantle\" \"1.5.8\"\ngithub \"x/stale\" \"0.1\"\n",
            &ManifestSyntax::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_output_format_from_str_loose() {
        assert_eq!(OutputFormat::from_str_loose("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_loose("md"), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from_str_loose("other"), OutputFormat::Summary);
    }

    #[test]
    fn test_check_consistency() {
        let summary = check_consistency(&declarations(), &lock());
        assert_eq!(summary.unlocked, vec!["github \"a/unlocked\""]);
        assert_eq!(summary.undeclared, vec!["github \"x/stale\""]);
        assert!(!summary.is_consistent());
    }

    #[test]
    fn test_json_report() {
        let report = ManifestReport::from_declarations("Cartfile", &declarations());
        let json: serde_json::Value =
            serde_json::from_str(&generate_json_report(&report).unwrap()).unwrap();

        assert_eq!(json["file"], "Cartfile");
        assert_eq!(json["manifest"], "declaration file");
        assert_eq!(json["entries"][0]["name"], "Mantle");
        assert_eq!(json["entries"][0]["requirement"], "~> 1.0.0");
        assert_eq!(json["entries"][1]["requirement"], "*");
        assert!(json.get("consistency").is_none());
    }

    #[test]
    fn test_markdown_report_with_consistency() {
        let report = ManifestReport::from_declarations("Cartfile", &declarations())
            .with_consistency(check_consistency(&declarations(), &lock()));
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Manifest Report"));
        assert!(markdown.contains("**Entries**: 2"));
        assert!(markdown.contains("| Mantle | github | `github \"Mantle/Mantle\"` | ~> 1.0.0 |"));
        assert!(markdown.contains("- Not locked: `github \"a/unlocked\"`"));
        assert!(markdown.contains("- Not declared: `github \"x/stale\"`"));
    }

    #[test]
    fn test_summary_for_schemes() {
        let schemes =
            SchemeAllowList::parse("Beta\nAlpha\n", &ManifestSyntax::default()).unwrap();
        let summary = generate_summary(&ManifestReport::from_schemes("Cartfile.schemes", &schemes));
        assert_eq!(
            summary,
            "Cartfile.schemes (scheme allow-list)\n  Entries: 2\n  Alpha\n  Beta"
        );
    }

    #[test]
    fn test_summary_for_lock() {
        let summary = generate_summary(&ManifestReport::from_lock("Cartfile.resolved", &lock()));
        assert!(summary.contains("  github \"Mantle/Mantle\" 1.5.8"));
    }

    #[test]
    fn test_markdown_empty_report() {
        let report = ManifestReport::from_schemes("Cartfile.schemes", &SchemeAllowList::new());
        assert!(generate_markdown_report(&report).contains("No entries found."));
    }
}
