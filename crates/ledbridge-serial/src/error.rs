//! Error types for the serial controller.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the LED strip.
#[derive(Error, Debug)]
pub enum Error {
    /// A verb was called before `connect()`.
    #[error("Not connected to the device")]
    NotConnected,

    /// Serial port not found at the configured path.
    #[error("Serial device not found at {0}")]
    PortNotFound(String),

    /// Serial port open/configuration error.
    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Write to the transport failed.
    #[error("Transport write failed: {0}")]
    WriteFailed(#[from] std::io::Error),

    /// Command encoding error.
    #[error(transparent)]
    Protocol(#[from] ledbridge_proto::Error),
}
