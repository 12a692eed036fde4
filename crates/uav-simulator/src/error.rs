//! Simulator error types.

use thiserror::Error;

/// Setup and I/O errors. The per-tick motion math is infallible;
/// everything that can fail happens before the first tick or at the
/// trajectory sink boundary.
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// Parameter or command source unreadable
    #[error("failed to read {path}: {source}")]
    Setup {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration value missing or out of range
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Trajectory sink I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for simulator operations.
pub type Result<T> = std::result::Result<T, SimulatorError>;
