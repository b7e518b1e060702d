//! LED strip wire protocol encoder.
//!
//! Translates logical LED operations (on, off, color, blink, rainbow) into
//! the single-line text commands understood by the strip firmware. Two
//! firmware variants exist: NeoPixel-driven strips accept the full command
//! set, while single-pin digital strips only understand on/off and a blink
//! primitive; richer requests degrade to those with an advisory.

pub mod board;
pub mod color;
pub mod command;
pub mod error;
pub mod response;

pub use board::{Board, ProtocolVariant};
pub use color::{parse_color, Rgb};
pub use command::{
    encode, Advisory, Command, Encoded, Operation, DEFAULT_BLINK_INTERVAL_MS,
    DEFAULT_RAINBOW_INTERVAL_MS,
};
pub use error::{Error, Result};
pub use response::ResponseKind;
