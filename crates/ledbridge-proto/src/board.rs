//! Board descriptors for the supported firmware targets.

use serde::{Deserialize, Serialize};

/// Which wire command set the board's firmware understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolVariant {
    /// NeoPixel firmware: arbitrary RGB and timed effects.
    RichColor,
    /// Single-pin digital firmware: on, off and one blink primitive.
    DigitalOnOff,
}

/// A board supported by the bridge: protocol variant plus the identifiers
/// the external toolchain needs to compile and upload for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Short name used on the command line and in the sketch layout.
    pub name: String,
    /// Fully qualified board name passed to `--fqbn`.
    pub fqbn: String,
    /// Wire protocol variant the board's firmware speaks.
    pub protocol: ProtocolVariant,
    /// Platform package installed via `core install`.
    pub platform: String,
    /// Libraries installed via `lib install`.
    #[serde(default)]
    pub libraries: Vec<String>,
}

impl Board {
    /// Returns the built-in board descriptors.
    pub fn builtin() -> Vec<Board> {
        vec![
            Board {
                name: "arduino-uno-r4".to_string(),
                fqbn: "arduino:renesas_uno:unor4wifi".to_string(),
                protocol: ProtocolVariant::RichColor,
                platform: "arduino:renesas_uno".to_string(),
                libraries: vec!["Adafruit NeoPixel".to_string()],
            },
            Board {
                name: "raspberry-pi-pico".to_string(),
                fqbn: "arduino:mbed_rp2040:pico".to_string(),
                protocol: ProtocolVariant::RichColor,
                platform: "arduino:mbed_rp2040".to_string(),
                libraries: vec!["Adafruit NeoPixel".to_string()],
            },
            Board {
                name: "xiao-rp2040".to_string(),
                fqbn: "rp2040:rp2040:seeed_xiao_rp2040".to_string(),
                protocol: ProtocolVariant::DigitalOnOff,
                platform: "rp2040:rp2040".to_string(),
                libraries: Vec::new(),
            },
        ]
    }

    /// Looks up a built-in board by name, case-insensitively.
    pub fn find(name: &str) -> Option<Board> {
        Self::builtin()
            .into_iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }
}
