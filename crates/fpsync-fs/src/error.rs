//! Error types for fpsync-fs

use std::path::PathBuf;

/// Result type for fpsync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fpsync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Destination {path} exists but is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("Undefined variable ${{{name}}} in \"{input}\"")]
    UndefinedVariable { name: String, input: String },

    #[error("Cannot expand '~': home directory is unknown")]
    NoHomeDirectory,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
