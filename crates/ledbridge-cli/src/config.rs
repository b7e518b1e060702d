//! Configuration file and settings precedence.
//!
//! Device settings come from four places, in strict precedence order:
//! command-line flag > `LEDBRIDGE_*` environment variable > config file >
//! built-in default. The config file is optional TOML next to the working
//! directory (`ledbridge.toml`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "ledbridge.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Serial port path
    #[serde(default = "default_port")]
    pub port: String,

    /// Serial baud rate
    #[serde(default = "default_baud")]
    pub baud: u32,

    /// Default board name
    #[serde(default = "default_board")]
    pub board: String,
}

fn default_port() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud() -> u32 {
    ledbridge_serial::DEFAULT_BAUD_RATE
}

fn default_board() -> String {
    "arduino-uno-r4".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud: default_baud(),
            board: default_board(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Loads the explicit file when given, the working-directory file when
    /// present, and the built-in defaults otherwise.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.exists() {
                    Self::load(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Applies the flag > environment > file precedence for one setting.
pub fn resolve<T>(flag: Option<T>, env: Option<T>, file: T) -> T {
    flag.or(env).unwrap_or(file)
}

/// Reads and parses an environment variable, ignoring unset or malformed
/// values.
pub fn env_setting<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baud, 9600);
        assert_eq!(config.board, "arduino-uno-r4");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("port = \"/dev/ttyACM1\"\n").unwrap();
        assert_eq!(config.port, "/dev/ttyACM1");
        assert_eq!(config.baud, 9600);
    }

    #[test]
    fn test_resolve_precedence() {
        // flag beats env beats file
        assert_eq!(
            resolve(Some("flag"), Some("env"), "file"),
            "flag"
        );
        assert_eq!(resolve(None, Some("env"), "file"), "env");
        assert_eq!(resolve::<&str>(None, None, "file"), "file");
    }
}
