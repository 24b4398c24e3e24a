//! Error types for the tracking session.

use thiserror::Error;

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Errors that can occur while processing session commands.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Invalid arguments for a command.
    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    /// Unknown command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// State snapshot could not be serialized.
    #[error("snapshot failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Mechanics error.
    #[error("{0}")]
    Mech(#[from] zs_mechanics::MechError),
}
