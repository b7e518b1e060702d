//! Color name lookup and RGB triple parsing.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A validated RGB triple. Each channel is 0-255 by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_color(s)
    }
}

/// Symbolic color names accepted in place of an explicit triple.
const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 255, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("white", Rgb::new(255, 255, 255)),
    ("orange", Rgb::new(255, 165, 0)),
    ("purple", Rgb::new(128, 0, 128)),
    ("pink", Rgb::new(255, 192, 203)),
    ("black", Rgb::new(0, 0, 0)),
    ("off", Rgb::new(0, 0, 0)),
];

/// Parses a color from a symbolic name or an `r,g,b` triple.
///
/// Names are matched case-insensitively. Triples must be exactly three
/// comma-separated decimal integers in 0-255, with no whitespace and no
/// sign. Out-of-range or malformed input is rejected, never clamped.
///
/// Triples are normalized on round-trip: leading zeros are dropped when the
/// parsed [`Rgb`] is rendered back (`"007,0,0"` becomes `"7,0,0"`). The
/// firmware parses channel values numerically, so both spellings mean the
/// same color on the wire.
pub fn parse_color(input: &str) -> Result<Rgb> {
    for (name, rgb) in NAMED_COLORS {
        if input.eq_ignore_ascii_case(name) {
            return Ok(*rgb);
        }
    }
    parse_triple(input).ok_or_else(|| Error::InvalidColor(input.to_string()))
}

fn parse_triple(input: &str) -> Option<Rgb> {
    let mut channels = [0u8; 3];
    let mut parts = input.split(',');
    for channel in channels.iter_mut() {
        *channel = parse_channel(parts.next()?)?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Rgb::new(channels[0], channels[1], channels[2]))
}

fn parse_channel(text: &str) -> Option<u8> {
    if text.is_empty() || text.len() > 3 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // All-digit and at most three characters, so this fits in u16.
    let value: u16 = text.parse().ok()?;
    u8::try_from(value).ok()
}
