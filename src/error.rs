//! Error types for configuration and process creation.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code when the target executable cannot be found.
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit code when the target exists but cannot be executed.
pub const EXIT_PERMISSION_DENIED: i32 = 126;

/// Exit code for configuration errors and any other spawn failure.
pub const EXIT_DISPATCH_FAILURE: i32 = 125;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{}: command not found", program.display())]
    NotFound { program: PathBuf },

    #[error("{}: permission denied", program.display())]
    PermissionDenied {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn process: {}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for process: {}", program.display())]
    Wait {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DispatchError {
    /// Classify an `io::Error` raised while creating `program`.
    #[must_use]
    pub fn from_spawn(program: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { program },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { program, source },
            _ => Self::Spawn { program, source },
        }
    }

    /// The exit status the dispatcher reports for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => EXIT_NOT_FOUND,
            Self::PermissionDenied { .. } => EXIT_PERMISSION_DENIED,
            Self::Config(_) | Self::Spawn { .. } | Self::Wait { .. } => EXIT_DISPATCH_FAILURE,
        }
    }
}
