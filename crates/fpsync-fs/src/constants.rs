//! Well-known file names and tool defaults.

use std::path::{Path, PathBuf};

/// Mirroring tool invoked when none is configured.
pub const DEFAULT_MIRROR_TOOL: &str = "rsync";

/// Remote shell used for `host:path` endpoints.
pub const REMOTE_SHELL: &str = "ssh";

/// Metadata files macOS scatters through directories; never worth syncing.
pub const MACOS_METADATA_EXCLUDES: &[&str] = &[".DS_Store", "._*"];

/// Files fpsync looks for or creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownPath {
    /// `~/.fpsyncrc.toml`
    HomeManifest,
    /// `~/usr/etc/fpsyncrc.toml`
    UsrEtcManifest,
    /// `<config dir>/fpsync/config.toml`
    ConfigDirManifest,
    /// Log written next to the synchronized data
    MirrorLog,
}

impl KnownPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HomeManifest => ".fpsyncrc.toml",
            Self::UsrEtcManifest => "usr/etc/fpsyncrc.toml",
            Self::ConfigDirManifest => "fpsync/config.toml",
            Self::MirrorLog => "fpmirror.log",
        }
    }

    /// Manifest locations in lookup order, for the current user.
    pub fn manifest_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(Self::HomeManifest.as_str()));
            candidates.push(home.join(Self::UsrEtcManifest.as_str()));
        }
        if let Some(config) = dirs::config_dir() {
            candidates.push(config.join(Self::ConfigDirManifest.as_str()));
        }
        candidates
    }
}

impl AsRef<Path> for KnownPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for KnownPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
