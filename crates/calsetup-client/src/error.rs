//! Client error types.

use std::fmt;

use calsetup_core::SetupError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Provisioning error.
    Setup(SetupError),
    /// IO error.
    Io(std::io::Error),
    /// Action failed (open, copy).
    Action(String),
}

impl ClientError {
    /// Returns the process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Setup(err) => err.exit_code(),
            _ => 1,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Setup(err) => write!(f, "{}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Action(msg) => write!(f, "action failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Setup(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<SetupError> for ClientError {
    fn from(err: SetupError) -> Self {
        Self::Setup(err)
    }
}
