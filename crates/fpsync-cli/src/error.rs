//! Errors reported by the fpsync and fpmirror binaries

use colored::Colorize;

pub type Result<T> = std::result::Result<T, CliError>;

/// Why a run stopped before or during its transfers.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Manifest, request validation, hook, tool lookup or failed transfer
    #[error(transparent)]
    Core(#[from] fpsync_core::Error),

    /// Unreadable manifest, bad destination, undefined variable
    #[error(transparent)]
    Fs(#[from] fpsync_fs::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// fpmirror needs at least one source before the destination
    #[error("expected one or more sources followed by a destination, got {given} path(s)")]
    MissingEndpoints { given: usize },
}

impl CliError {
    /// One line for the terminal, prefixed like every fatal failure.
    pub fn render(&self) -> String {
        format!("{}: {}", "error".red().bold(), self)
    }
}

/// Print an error the way both binaries report fatal failures.
pub fn report(err: &CliError) {
    eprintln!("{}", err.render());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_endpoints_message() {
        colored::control::set_override(false);
        let err = CliError::MissingEndpoints { given: 1 };
        assert_eq!(
            err.render(),
            "error: expected one or more sources followed by a destination, got 1 path(s)"
        );
    }

    #[test]
    fn test_transfer_failure_passes_through() {
        let err: CliError = fpsync_core::Error::TransferFailed {
            name: "home".into(),
            code: Some(23),
        }
        .into();
        assert!(matches!(err, CliError::Core(_)));
        assert!(err.to_string().contains("home"));
    }
}
