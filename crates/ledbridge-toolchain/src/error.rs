//! Error types for the toolchain service.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while orchestrating the external toolchain.
#[derive(Error, Debug)]
pub enum Error {
    /// Sketch directory does not exist; nothing was spawned.
    #[error("Sketch not found at {0}")]
    SketchNotFound(PathBuf),

    /// The toolchain exited non-zero. Carries the exit code and the
    /// accumulated standard-error text verbatim.
    #[error("arduino-cli failed with exit code {exit_code}:\n{stderr}")]
    ExecutionFailed { exit_code: i32, stderr: String },

    /// Filesystem or subprocess I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
