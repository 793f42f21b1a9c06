//! Dependency identifiers: `github "owner/name"`, `git "<url>"` and
//! `binary "<url-or-path>"`

use std::cmp::Ordering;
use std::fmt;

use url::Url;

use super::{Scannable, scan_quoted};
use crate::cursor::Cursor;
use crate::error::ScanError;

const GITHUB_KEYWORD: &str = "github";
const GIT_KEYWORD: &str = "git";
const BINARY_KEYWORD: &str = "binary";

/// Strip a trailing `.git` from a repository name.
fn strip_git_suffix(name: &str) -> &str {
    name.strip_suffix(".git").unwrap_or(name)
}

/// A GitHub repository name with one trailing `.git` removed.
///
/// Names that are empty or still end in `.git` afterwards are rejected, so
/// the rendered name always parses back to itself.
fn github_repository_name(name: &str) -> Option<&str> {
    let name = strip_git_suffix(name);
    (!name.is_empty() && !name.ends_with(".git")).then_some(name)
}

/// Last non-empty `/`-separated component of a path or URL.
fn last_component(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(path)
}

/// The source kind of a dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    GitHub,
    Git,
    Binary,
}

impl DependencyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DependencyKind::GitHub => GITHUB_KEYWORD,
            DependencyKind::Git => GIT_KEYWORD,
            DependencyKind::Binary => BINARY_KEYWORD,
        }
    }
}

/// Where a GitHub repository is hosted
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GitHubServer {
    /// github.com
    DotCom,
    /// A GitHub Enterprise instance, stored as `scheme://host[:port]`
    Enterprise(String),
}

/// A repository on GitHub or a GitHub Enterprise server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitHubRepository {
    pub server: GitHubServer,
    pub owner: String,
    pub name: String,
}

impl GitHubRepository {
    pub fn dot_com(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            server: GitHubServer::DotCom,
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name` or an absolute repository URL.
    pub fn from_identifier(identifier: &str) -> Result<Self, String> {
        if identifier.contains("://") {
            return Self::from_url(identifier);
        }

        let mut parts = identifier.split('/');
        match (parts.next(), parts.next().and_then(github_repository_name), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() => {
                Ok(Self::dot_com(owner, name))
            }
            _ => Err(format!(
                "invalid GitHub repository identifier \"{identifier}\""
            )),
        }
    }

    fn from_url(identifier: &str) -> Result<Self, String> {
        let invalid = || format!("invalid GitHub repository URL \"{identifier}\"");

        let url = Url::parse(identifier).map_err(|_| invalid())?;
        let host = url.host_str().ok_or_else(invalid)?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let [owner, name] = segments.as_slice() else {
            return Err(invalid());
        };
        let name = github_repository_name(name).ok_or_else(invalid)?;

        let server = if host.eq_ignore_ascii_case("github.com") {
            GitHubServer::DotCom
        } else {
            let base = match url.port() {
                Some(port) => format!("{}://{host}:{port}", url.scheme()),
                None => format!("{}://{host}", url.scheme()),
            };
            GitHubServer::Enterprise(base)
        };

        Ok(Self {
            server,
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for GitHubRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.server {
            GitHubServer::DotCom => write!(f, "{}/{}", self.owner, self.name),
            GitHubServer::Enterprise(base) => write!(f, "{base}/{}/{}", self.owner, self.name),
        }
    }
}

/// The URL or path of an arbitrary git repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitUrl(String);

impl GitUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Repository name derived from the last path component
    pub fn name(&self) -> &str {
        strip_git_suffix(last_component(&self.0))
    }
}

/// Location of a binary-only framework specification.
///
/// Only `https://` and `file://` URLs are accepted; a string without a URL
/// scheme is treated as a local path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinaryUrl {
    raw: String,
    local: bool,
}

impl BinaryUrl {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match Url::parse(raw) {
            Ok(url) => match url.scheme() {
                "https" => Ok(Self {
                    raw: raw.to_string(),
                    local: false,
                }),
                "file" => Ok(Self {
                    raw: raw.to_string(),
                    local: true,
                }),
                _ => Err(format!(
                    "non-HTTPS URL found for binary dependency \"{raw}\""
                )),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self {
                raw: raw.to_string(),
                local: true,
            }),
            Err(e) => Err(format!("invalid URL for binary dependency \"{raw}\": {e}")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True for `file://` URLs and plain paths
    pub fn is_local(&self) -> bool {
        self.local
    }

    /// Framework name: the last path component without its extension
    pub fn name(&self) -> &str {
        let file = last_component(&self.raw);
        file.rsplit_once('.').map_or(file, |(stem, _)| stem)
    }
}

/// A parsed dependency identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencyId {
    GitHub(GitHubRepository),
    Git(GitUrl),
    Binary(BinaryUrl),
}

impl DependencyId {
    pub fn kind(&self) -> DependencyKind {
        match self {
            DependencyId::GitHub(_) => DependencyKind::GitHub,
            DependencyId::Git(_) => DependencyKind::Git,
            DependencyId::Binary(_) => DependencyKind::Binary,
        }
    }

    /// Short project name, used for display in reports
    pub fn name(&self) -> &str {
        match self {
            DependencyId::GitHub(repo) => &repo.name,
            DependencyId::Git(url) => url.name(),
            DependencyId::Binary(url) => url.name(),
        }
    }

    /// The quoted location, without the kind keyword
    pub fn location(&self) -> String {
        match self {
            DependencyId::GitHub(repo) => repo.to_string(),
            DependencyId::Git(url) => url.as_str().to_string(),
            DependencyId::Binary(url) => url.as_str().to_string(),
        }
    }
}

impl fmt::Display for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.kind().as_str(), self.location())
    }
}

impl Ord for DependencyId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl PartialOrd for DependencyId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Scannable for DependencyId {
    fn scan(cursor: &mut Cursor<'_>) -> Result<Self, ScanError> {
        cursor.skip_whitespace();

        // "github" has to be tried before its prefix "git"
        if cursor.consume_literal(GITHUB_KEYWORD) {
            let identifier = scan_quoted(cursor, "repository after github")?;
            GitHubRepository::from_identifier(identifier)
                .map(DependencyId::GitHub)
                .map_err(|message| ScanError::new(cursor, message))
        } else if cursor.consume_literal(GIT_KEYWORD) {
            let url = scan_quoted(cursor, "URL after git")?;
            Ok(DependencyId::Git(GitUrl::new(url)))
        } else if cursor.consume_literal(BINARY_KEYWORD) {
            let url = scan_quoted(cursor, "URL after binary")?;
            BinaryUrl::parse(url)
                .map(DependencyId::Binary)
                .map_err(|message| ScanError::new(cursor, message))
        } else {
            Err(ScanError::new(cursor, "unexpected dependency type"))
        }
    }
}
