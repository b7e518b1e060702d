//! Command encoding for the two firmware protocol variants.
//!
//! Wire commands are single ASCII lines:
//! - `ON` / `OFF`
//! - `COLOR,r,g,b`
//! - `BLINK1,r,g,b,interval` / `BLINK2,r1,g1,b1,r2,g2,b2,interval`
//! - `RAINBOW,interval`
//! - `BLINK` (digital on/off firmware only)

use crate::board::ProtocolVariant;
use crate::color::Rgb;
use std::fmt;

/// Default blink interval in milliseconds.
pub const DEFAULT_BLINK_INTERVAL_MS: i64 = 500;

/// Default rainbow cycle interval in milliseconds.
pub const DEFAULT_RAINBOW_INTERVAL_MS: i64 = 50;

/// A logical LED operation, before protocol-variant dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    On,
    Off,
    /// Solid color.
    Color(Rgb),
    /// Single-color blink with interval in milliseconds.
    Blink(Rgb, i64),
    /// Alternating two-color blink with interval in milliseconds.
    Blink2(Rgb, Rgb, i64),
    /// Rainbow cycle with interval in milliseconds.
    Rainbow(i64),
}

/// One wire command: a verb plus its ordered parameters.
///
/// A logical operation always yields exactly one command; blink and rainbow
/// are stateful on the device side, not host-side timer loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    verb: &'static str,
    params: Vec<String>,
}

impl Command {
    fn new(verb: &'static str, params: Vec<String>) -> Self {
        Self { verb, params }
    }

    fn bare(verb: &'static str) -> Self {
        Self::new(verb, Vec::new())
    }

    /// Renders the command line without the terminator.
    pub fn to_line(&self) -> String {
        if self.params.is_empty() {
            self.verb.to_string()
        } else {
            format!("{},{}", self.verb, self.params.join(","))
        }
    }

    /// Renders the newline-terminated line as written to the device.
    pub fn wire_line(&self) -> String {
        let mut line = self.to_line();
        line.push('\n');
        line
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Notice emitted when a request degrades to a simpler device capability.
///
/// Degradation is defined behavior on digital on/off firmware, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// A solid-color request degraded to plain ON.
    ColorIgnored,
    /// A colored blink degraded to the single blink primitive.
    BlinkColorIgnored,
    /// A two-color blink degraded to the single blink primitive.
    TwoColorDegraded,
    /// A rainbow request degraded to the single blink primitive.
    RainbowDegraded,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Advisory::ColorIgnored => "digital strip has no color control, turning on instead",
            Advisory::BlinkColorIgnored => "digital strip has no color control, blinking without color",
            Advisory::TwoColorDegraded => "digital strip supports a single blink, colors ignored",
            Advisory::RainbowDegraded => "digital strip cannot rainbow, blinking instead",
        };
        f.write_str(msg)
    }
}

/// An encoded operation: the wire command plus at most one advisory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub command: Command,
    pub advisory: Option<Advisory>,
}

impl Encoded {
    fn plain(command: Command) -> Self {
        Self {
            command,
            advisory: None,
        }
    }

    fn degraded(command: Command, advisory: Advisory) -> Self {
        Self {
            command,
            advisory: Some(advisory),
        }
    }
}

/// Encodes one logical operation for the given protocol variant.
pub fn encode(op: Operation, variant: ProtocolVariant) -> Encoded {
    match variant {
        ProtocolVariant::RichColor => Encoded::plain(encode_rich(op)),
        ProtocolVariant::DigitalOnOff => encode_digital(op),
    }
}

fn encode_rich(op: Operation) -> Command {
    match op {
        Operation::On => Command::bare("ON"),
        Operation::Off => Command::bare("OFF"),
        Operation::Color(c) => Command::new("COLOR", rgb_params(c)),
        Operation::Blink(c, interval) => {
            let mut params = rgb_params(c);
            params.push(interval.to_string());
            Command::new("BLINK1", params)
        }
        Operation::Blink2(c1, c2, interval) => {
            let mut params = rgb_params(c1);
            params.extend(rgb_params(c2));
            params.push(interval.to_string());
            Command::new("BLINK2", params)
        }
        Operation::Rainbow(interval) => Command::new("RAINBOW", vec![interval.to_string()]),
    }
}

fn encode_digital(op: Operation) -> Encoded {
    match op {
        Operation::On => Encoded::plain(Command::bare("ON")),
        Operation::Off => Encoded::plain(Command::bare("OFF")),
        Operation::Color(_) => Encoded::degraded(Command::bare("ON"), Advisory::ColorIgnored),
        Operation::Blink(_, _) => {
            Encoded::degraded(Command::bare("BLINK"), Advisory::BlinkColorIgnored)
        }
        Operation::Blink2(_, _, _) => {
            Encoded::degraded(Command::bare("BLINK"), Advisory::TwoColorDegraded)
        }
        Operation::Rainbow(_) => {
            Encoded::degraded(Command::bare("BLINK"), Advisory::RainbowDegraded)
        }
    }
}

fn rgb_params(c: Rgb) -> Vec<String> {
    vec![c.r.to_string(), c.g.to_string(), c.b.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::parse_color;

    #[test]
    fn test_on_off_both_variants() {
        for variant in [ProtocolVariant::RichColor, ProtocolVariant::DigitalOnOff] {
            let on = encode(Operation::On, variant);
            assert_eq!(on.command.to_line(), "ON");
            assert!(on.advisory.is_none());

            let off = encode(Operation::Off, variant);
            assert_eq!(off.command.to_line(), "OFF");
            assert!(off.advisory.is_none());
        }
    }

    #[test]
    fn test_color_rich() {
        let red = parse_color("red").unwrap();
        let encoded = encode(Operation::Color(red), ProtocolVariant::RichColor);
        assert_eq!(encoded.command.to_line(), "COLOR,255,0,0");
        assert!(encoded.advisory.is_none());
    }

    #[test]
    fn test_color_degrades_to_on() {
        let red = parse_color("red").unwrap();
        let encoded = encode(Operation::Color(red), ProtocolVariant::DigitalOnOff);
        assert_eq!(encoded.command.to_line(), "ON");
        assert_eq!(encoded.advisory, Some(Advisory::ColorIgnored));
    }

    #[test]
    fn test_blink_rich() {
        let red = parse_color("red").unwrap();
        let encoded = encode(Operation::Blink(red, 1000), ProtocolVariant::RichColor);
        assert_eq!(encoded.command.to_line(), "BLINK1,255,0,0,1000");
        assert!(encoded.advisory.is_none());
    }

    #[test]
    fn test_blink2_rich() {
        let red = parse_color("red").unwrap();
        let blue = parse_color("blue").unwrap();
        let encoded = encode(Operation::Blink2(red, blue, 750), ProtocolVariant::RichColor);
        assert_eq!(encoded.command.to_line(), "BLINK2,255,0,0,0,0,255,750");
    }

    #[test]
    fn test_blink_degrades() {
        let red = parse_color("red").unwrap();
        let blue = parse_color("blue").unwrap();

        let one = encode(Operation::Blink(red, 500), ProtocolVariant::DigitalOnOff);
        assert_eq!(one.command.to_line(), "BLINK");
        assert_eq!(one.advisory, Some(Advisory::BlinkColorIgnored));

        let two = encode(Operation::Blink2(red, blue, 500), ProtocolVariant::DigitalOnOff);
        assert_eq!(two.command.to_line(), "BLINK");
        assert_eq!(two.advisory, Some(Advisory::TwoColorDegraded));
    }

    #[test]
    fn test_rainbow() {
        let rich = encode(Operation::Rainbow(50), ProtocolVariant::RichColor);
        assert_eq!(rich.command.to_line(), "RAINBOW,50");

        let digital = encode(Operation::Rainbow(50), ProtocolVariant::DigitalOnOff);
        assert_eq!(digital.command.to_line(), "BLINK");
        assert_eq!(digital.advisory, Some(Advisory::RainbowDegraded));
    }

    #[test]
    fn test_wire_line_terminated() {
        let encoded = encode(Operation::On, ProtocolVariant::RichColor);
        assert_eq!(encoded.command.wire_line(), "ON\n");
    }

    #[test]
    fn test_interval_passes_through() {
        // Intervals are not range-validated host-side; the firmware rejects
        // non-positive values itself.
        let encoded = encode(Operation::Rainbow(-5), ProtocolVariant::RichColor);
        assert_eq!(encoded.command.to_line(), "RAINBOW,-5");
    }
}
