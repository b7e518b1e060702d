//! Simultaneous intent flags and their dispatch order.

use crate::{Error, Result};
use ledbridge_proto::{
    Operation, Rgb, DEFAULT_BLINK_INTERVAL_MS, DEFAULT_RAINBOW_INTERVAL_MS,
};

/// One LED request, as it arrives from the command line. Several intents may
/// be set at once; `select_operation` picks exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedRequest {
    pub on: bool,
    pub off: bool,
    pub blink: bool,
    pub color: Option<Rgb>,
    pub color2: Option<Rgb>,
    pub rainbow: bool,
    /// Blink or rainbow interval in milliseconds.
    pub interval: Option<i64>,
}

/// Selects the single operation to dispatch.
///
/// Fixed priority when several intents are requested at once:
/// on > off > blink > color > rainbow. The first match wins and the rest
/// are ignored. Blink with two colors becomes the alternating blink.
pub fn select_operation(req: &LedRequest) -> Result<Operation> {
    if req.on {
        return Ok(Operation::On);
    }
    if req.off {
        return Ok(Operation::Off);
    }
    if req.blink {
        let interval = req.interval.unwrap_or(DEFAULT_BLINK_INTERVAL_MS);
        return match (req.color, req.color2) {
            (Some(c1), Some(c2)) => Ok(Operation::Blink2(c1, c2, interval)),
            (Some(c), None) => Ok(Operation::Blink(c, interval)),
            (None, _) => Err(Error::Protocol(ledbridge_proto::Error::InvalidOperation)),
        };
    }
    if let Some(c) = req.color {
        return Ok(Operation::Color(c));
    }
    if req.rainbow {
        return Ok(Operation::Rainbow(
            req.interval.unwrap_or(DEFAULT_RAINBOW_INTERVAL_MS),
        ));
    }
    Err(Error::Protocol(ledbridge_proto::Error::InvalidOperation))
}
