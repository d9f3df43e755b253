//! Error types for fpsync-core

use std::path::PathBuf;

/// Result type for fpsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fpsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No manifest at the given or default locations
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// A path the manifest declares as required is absent
    #[error("Required path does not exist: {path}")]
    MissingRequiredPath { path: PathBuf },

    /// The manifest parsed but failed validation
    #[error("Invalid manifest: {message}")]
    InvalidManifest { message: String },

    /// The caller asked for something the driver cannot do
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// A lifecycle hook exited non-zero or could not start
    #[error("Hook '{command}' failed on {event}: {message}")]
    HookFailed {
        event: String,
        command: String,
        message: String,
    },

    /// The external tool is not on the search path
    #[error("Cannot find '{program}' on PATH")]
    ToolNotFound { program: String },

    /// A transfer exited non-zero and the run was configured to stop
    #[error("Transfer '{name}' failed (exit code: {code:?})")]
    TransferFailed { name: String, code: Option<i32> },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from fpsync-fs
    #[error(transparent)]
    Fs(#[from] fpsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_manifest(message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}
