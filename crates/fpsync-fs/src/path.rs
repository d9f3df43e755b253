//! Remote-aware path handling
//!
//! Either side of a sync may live on another machine. Remote paths use the
//! `host:path` notation understood by the mirroring tool; everything else
//! is a local path.

use std::path::{Path, PathBuf};

/// A sync endpoint: a local path, or a path on a remote host.
///
/// Paths are stored with forward slashes. A path is remote when a `:`
/// appears before the first `/`, so `box:/srv` and `box:notes` are remote
/// while `/tmp/a:b` stays local. On Windows a single-letter prefix such as
/// `C:/data` is a drive letter, not a host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyncPath {
    host: Option<String>,
    path: String,
}

fn is_drive_letter(prefix: &str) -> bool {
    cfg!(windows) && prefix.len() == 1 && prefix.as_bytes()[0].is_ascii_alphabetic()
}

impl SyncPath {
    /// Parse a user-supplied path, detecting the remote-host marker.
    pub fn parse(input: &str) -> Self {
        let normalized = input.replace('\\', "/");
        let slash = normalized.find('/').unwrap_or(normalized.len());

        match normalized[..slash].find(':') {
            Some(idx) if idx > 0 && !is_drive_letter(&normalized[..idx]) => Self {
                host: Some(normalized[..idx].to_string()),
                path: normalized[idx + 1..].to_string(),
            },
            _ => Self {
                host: None,
                path: normalized,
            },
        }
    }

    /// Parse a list of sources, where `:path` after a remote entry refers
    /// to the same host as that entry.
    pub fn parse_list<I, S>(inputs: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed: Vec<Self> = Vec::new();
        for input in inputs {
            let input = input.as_ref();
            let shared_host = input
                .strip_prefix(':')
                .and_then(|rest| parsed.last()?.host().map(|h| (h.to_string(), rest)));
            parsed.push(match shared_host {
                Some((host, rest)) => Self::remote(host, rest),
                None => Self::parse(input),
            });
        }
        parsed
    }

    /// Build a local path.
    pub fn local(path: impl AsRef<Path>) -> Self {
        Self {
            host: None,
            path: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    /// Build a path on `host`.
    pub fn remote(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            path: path.into().replace('\\', "/"),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.host.is_some()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// The path component, without any host prefix.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Join a relative segment onto this path, keeping the host.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let segment = segment.trim_start_matches('/');
        let path = if self.path.is_empty() {
            segment.to_string()
        } else if self.path.ends_with('/') {
            format!("{}{}", self.path, segment)
        } else {
            format!("{}/{}", self.path, segment)
        };
        Self {
            host: self.host.clone(),
            path,
        }
    }

    pub fn has_trailing_slash(&self) -> bool {
        self.path.ends_with('/')
    }

    /// Return this path with exactly one trailing separator.
    ///
    /// The mirroring tool copies directory *contents* when the source ends
    /// with a separator and the directory itself otherwise. An empty remote
    /// path (`host:`, the remote home) becomes `host:./` rather than the
    /// remote root.
    pub fn with_trailing_slash(&self) -> Self {
        let path = if self.path.is_empty() {
            "./".to_string()
        } else if self.path.ends_with('/') {
            self.path.clone()
        } else {
            format!("{}/", self.path)
        };
        Self {
            host: self.host.clone(),
            path,
        }
    }

    /// Native path for local filesystem access.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    /// The argument form passed to the mirroring tool (`host:path` or `path`).
    pub fn to_arg(&self) -> String {
        match &self.host {
            Some(host) => format!("{}:{}", host, self.path),
            None => self.path.clone(),
        }
    }

    /// The argument form for a follow-up source on the same host (`:path`).
    ///
    /// The mirroring tool accepts several remote sources as `host:a :b :c`,
    /// sharing a single connection.
    pub fn to_shared_host_arg(&self) -> String {
        match &self.host {
            Some(_) => format!(":{}", self.path),
            None => self.path.clone(),
        }
    }
}

impl std::fmt::Display for SyncPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_arg())
    }
}

impl From<&str> for SyncPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for SyncPath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&Path> for SyncPath {
    fn from(p: &Path) -> Self {
        Self::local(p)
    }
}

impl From<PathBuf> for SyncPath {
    fn from(p: PathBuf) -> Self {
        Self::local(p)
    }
}
