//! # Errors
//!
//! Error kinds surfaced by the store and the command layer. Malformed store
//! lines are not errors; they are counted in [`crate::usage::LoadReport`].

use std::io;
use std::path::PathBuf;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, PcmdError>;

/// Errors that abort an invocation.
#[derive(Debug, thiserror::Error)]
pub enum PcmdError {
    /// An open, read, write or rename on the store file (or stdin/stdout) failed.
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Wrong number of arguments, or any other command-line usage error.
    #[error("{0}")]
    Argument(String),
}

impl PcmdError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_message_names_action_and_path() {
        let err = PcmdError::io(
            "read",
            "/tmp/store.txt",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "failed to read /tmp/store.txt: gone");
    }

    #[test]
    fn test_argument_error_message() {
        let err = PcmdError::Argument("missing argument".to_string());
        assert_eq!(err.to_string(), "missing argument");
    }
}
