//! Error types for provisioning operations.
//!
//! Errors are not recovered from: the first failing step aborts the run and
//! the error decides the process exit status through [`SetupError::exit_code`].

use std::path::PathBuf;

use thiserror::Error;

/// Where operators are sent when `gcloud` is not installed.
pub const GCLOUD_INSTALL_URL: &str = "https://cloud.google.com/sdk/docs/install";

/// An error that aborted provisioning.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The prerequisite command-line tool is not on the PATH.
    #[error("`{tool}` was not found; install the Google Cloud SDK from {}", GCLOUD_INSTALL_URL)]
    ToolMissing {
        /// Name or path of the tool that was looked up.
        tool: String,
    },

    /// An external command exited unsuccessfully.
    #[error("`{command}` failed ({}): {stderr}", display_status(.status))]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// Exit status, `None` when killed by a signal.
        status: Option<i32>,
        /// Trimmed standard error of the command.
        stderr: String,
    },

    /// An external command could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// The command line that was attempted.
        command: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The service account key file is unreadable or malformed.
    #[error("invalid key file {}: {message}", .path.display())]
    KeyFile {
        /// Path of the key file.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// Provisioning settings failed validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl SetupError {
    /// Creates a key file error.
    pub fn key_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::KeyFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns the process exit status this error maps to.
    ///
    /// A failed external command propagates its own non-zero status, like a
    /// shell script running with `set -e`. Everything else exits with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::CommandFailed {
                status: Some(code), ..
            } if (1..=255).contains(code) => *code as u8,
            _ => 1,
        }
    }

    /// Returns true if the prerequisite tool is missing.
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, Self::ToolMissing { .. })
    }
}

/// A specialized Result type for provisioning operations.
pub type SetupResult<T> = Result<T, SetupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_missing_mentions_install_url() {
        let err = SetupError::ToolMissing {
            tool: "gcloud".into(),
        };
        let display = err.to_string();
        assert!(display.contains("`gcloud` was not found"));
        assert!(display.contains(GCLOUD_INSTALL_URL));
        assert_eq!(err.exit_code(), 1);
        assert!(err.is_tool_missing());
    }

    #[test]
    fn command_failed_propagates_status() {
        let err = SetupError::CommandFailed {
            command: "gcloud projects create demo".into(),
            status: Some(2),
            stderr: "permission denied".into(),
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "`gcloud projects create demo` failed (exit 2): permission denied"
        );
    }

    #[test]
    fn command_failed_without_usable_status_exits_one() {
        let signalled = SetupError::CommandFailed {
            command: "gcloud auth login".into(),
            status: None,
            stderr: String::new(),
        };
        assert_eq!(signalled.exit_code(), 1);
        assert!(signalled.to_string().contains("terminated by signal"));

        let out_of_range = SetupError::CommandFailed {
            command: "gcloud".into(),
            status: Some(300),
            stderr: String::new(),
        };
        assert_eq!(out_of_range.exit_code(), 1);
    }

    #[test]
    fn key_file_error_display() {
        let err = SetupError::key_file("/tmp/key.json", "missing client_id");
        assert_eq!(
            err.to_string(),
            "invalid key file /tmp/key.json: missing client_id"
        );
    }

    #[test]
    fn io_error_has_source() {
        use std::error::Error;
        let err = SetupError::from(std::io::Error::other("disk full"));
        assert!(err.source().is_some());
        assert_eq!(err.exit_code(), 1);
    }
}
