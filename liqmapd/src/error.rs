//! Daemon error types.

use thiserror::Error;

/// Daemon-level errors.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API server failed to bind or serve
    #[error("API server error: {0}")]
    Server(String),

    /// Background task panicked or was aborted
    #[error("Task error: {0}")]
    Task(String),
}

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;

/// Pipeline-level outcome that is not a heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// No exchange contributed a trade above the size threshold
    #[error("No data")]
    NoData,
}

/// Result type for one pipeline cycle.
pub type PipelineResult<T> = Result<T, PipelineError>;
