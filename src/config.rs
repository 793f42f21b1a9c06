//! Configuration management for the cartfile tool
//!
//! Settings are read from `.cartfile.toml` in the project directory, falling
//! back to `cartfile/config.toml` in the user's configuration directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::comments::{DEFAULT_COMMENT_INDICATOR, ManifestSyntax};
use crate::reports::OutputFormat;

/// Name of the per-project configuration file
pub const PROJECT_CONFIG_FILE: &str = ".cartfile.toml";

/// Tool configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Manifest syntax configuration
    pub syntax: SyntaxConfig,
    /// Report output configuration
    pub output: OutputConfig,
    /// Log filter used when `RUST_LOG` is not set (e.g. "debug")
    pub log_level: Option<String>,
}

/// Manifest syntax configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyntaxConfig {
    /// Sequence that starts a comment
    pub comment_indicator: String,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            comment_indicator: DEFAULT_COMMENT_INDICATOR.to_string(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default report format ("json", "markdown" or "summary")
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "summary".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn format(&self) -> OutputFormat {
        OutputFormat::from_str_loose(&self.format)
    }
}

impl Config {
    /// Parse configuration from TOML text, falling back to defaults
    pub fn from_toml_str(text: &str) -> Self {
        match toml::from_str(text) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Invalid configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load the configuration that applies to `project_dir`
    pub fn load(project_dir: &Path) -> Self {
        let candidates = [Some(project_dir.join(PROJECT_CONFIG_FILE)), Self::user_config_path()];
        Self::load_first(candidates.into_iter().flatten())
    }

    /// Parse the first readable file among `candidates`.
    ///
    /// Missing files are skipped quietly; other read errors are logged.
    fn load_first(candidates: impl IntoIterator<Item = PathBuf>) -> Self {
        for path in candidates {
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    tracing::debug!("Using configuration from {}", path.display());
                    return Self::from_toml_str(&text);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!("Failed to read configuration {}: {}", path.display(), e);
                }
            }
        }
        Self::default()
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cartfile").join("config.toml"))
    }

    /// Manifest syntax described by this configuration.
    ///
    /// An empty comment indicator is replaced by the default one.
    pub fn syntax(&self) -> ManifestSyntax {
        let indicator = self.syntax.comment_indicator.trim();
        if indicator.is_empty() {
            tracing::warn!(
                "Empty comment indicator configured, using \"{}\"",
                DEFAULT_COMMENT_INDICATOR
            );
            return ManifestSyntax::default();
        }
        ManifestSyntax::with_comment_indicator(indicator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.syntax.comment_indicator, "#");
        assert_eq!(config.output.format(), OutputFormat::Summary);
        assert!(config.log_level.is_none());
        assert_eq!(config.syntax(), ManifestSyntax::default());
    }

    #[test]
    fn test_parse_from_toml() {
        let config = Config::from_toml_str(
            r#"
log_level = "debug"

[syntax]
comment_indicator = "//"

[output]
format = "json"
"#,
        );
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.syntax().comment_indicator, "//");
        assert_eq!(config.output.format(), OutputFormat::Json);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml_str("[output]\nformat = \"markdown\"\n");
        assert_eq!(config.output.format(), OutputFormat::Markdown);
        // Other fields should use defaults
        assert_eq!(config.syntax.comment_indicator, "#");
    }

    #[test]
    fn test_invalid_toml_uses_defaults() {
        let config = Config::from_toml_str("this is = = not toml");
        assert_eq!(config.syntax.comment_indicator, "#");
    }

    #[test]
    fn test_empty_indicator_falls_back() {
        let config = Config::from_toml_str("[syntax]\ncomment_indicator = \"  \"\n");
        assert_eq!(config.syntax(), ManifestSyntax::default());
    }

    #[test]
    fn test_load_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "[syntax]\ncomment_indicator = \";\"\n",
        )
        .unwrap();

        let config = Config::load(dir.path());
        assert_eq!(config.syntax().comment_indicator, ";");
    }

    #[test]
    fn test_unreadable_config_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        // A directory exists but cannot be read as a file
        let unreadable = dir.path().join(PROJECT_CONFIG_FILE);
        std::fs::create_dir(&unreadable).unwrap();
        let fallback = dir.path().join("config.toml");
        std::fs::write(&fallback, "[output]\nformat = \"json\"\n").unwrap();

        let config = Config::load_first([dir.path().join("missing.toml"), unreadable, fallback]);
        assert_eq!(config.output.format(), OutputFormat::Json);
    }

    #[test]
    fn test_no_config_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_first([dir.path().join("missing.toml")]);
        assert_eq!(config.syntax(), ManifestSyntax::default());
    }
}
