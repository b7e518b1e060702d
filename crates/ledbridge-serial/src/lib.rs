//! Serial controller for LED strips.
//!
//! Owns the connect/send/disconnect lifecycle over a serial transport and
//! exposes the high-level verbs (on, off, color, blink, rainbow). Encoding
//! is delegated to `ledbridge-proto`; the transport is a trait so tests run
//! without hardware.

pub mod controller;
pub mod error;
pub mod request;
pub mod transport;

pub use controller::{ConnectionState, Controller};
pub use error::{Error, Result};
pub use request::{select_operation, LedRequest};
pub use transport::{SerialTransport, Transport, DEFAULT_BAUD_RATE};
