//! Git error types

use thiserror::Error;

/// Errors raised by version-control operations
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed (exit code {code:?}): {output}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("Ref not found: {0}")]
    RefNotFound(String),
}

impl GitError {
    /// Captured command output, if the command ran at all
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { output, .. } => Some(output),
            Self::Spawn { .. } | Self::RefNotFound(_) => None,
        }
    }
}
