//! Error types for scour.
//!
//! Uses `thiserror` for ergonomic error definitions. Probes themselves
//! are infallible by contract; errors here belong to the surface around
//! the scan (argument validation, resolution, output).

use crate::types::{PortError, TargetError};
use thiserror::Error;

/// Top-level error for the command-line application.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
