//! Linter error types.

use thiserror::Error;

/// Errors that can occur around a lint pass.
///
/// The extraction engine itself never fails on compiler output; these
/// errors all originate at the configuration or process boundary.
#[derive(Debug, Error)]
pub enum LintError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The compiler executable could not be started.
    #[error("failed to run `{executable}`: {source}")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    /// The compiler did not finish within the configured timeout.
    #[error("compiler timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The compiler's stderr was not valid UTF-8.
    #[error("compiler output was not valid UTF-8")]
    Encoding,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LintError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
