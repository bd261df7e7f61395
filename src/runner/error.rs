//! Runner error types

use thiserror::Error;

/// Errors that can occur while invoking the build tool or the harness
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl RunnerError {
    /// Name of the program that failed
    pub fn program(&self) -> &str {
        match self {
            RunnerError::Launch { program, .. } | RunnerError::Wait { program, .. } => program,
        }
    }

    /// Check if the program could not be found at all
    pub fn is_not_found(&self) -> bool {
        match self {
            RunnerError::Launch { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            RunnerError::Wait { .. } => false,
        }
    }
}
