//! Error types for the protocol encoder.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding device commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Color is neither a known name nor a valid `r,g,b` triple.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// No operation was selected for dispatch.
    #[error("No operation selected")]
    InvalidOperation,
}
