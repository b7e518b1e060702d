//! Classification of device response lines.
//!
//! The firmware answers every command line with `ACCEPTED,...` or
//! `REJECT,<command>,<reason>`. Response validation and retry policy live
//! outside this crate; only the classification of a raw line lives here.

/// Kind of a single device response line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Accepted,
    Rejected,
    /// Anything else, e.g. firmware boot chatter.
    Other,
}

impl ResponseKind {
    /// Classifies one response line (terminator already stripped).
    pub fn classify(line: &str) -> Self {
        if line.starts_with("ACCEPTED,") {
            ResponseKind::Accepted
        } else if line.starts_with("REJECT,") {
            ResponseKind::Rejected
        } else {
            ResponseKind::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(ResponseKind::classify("ACCEPTED,ON"), ResponseKind::Accepted);
        assert_eq!(
            ResponseKind::classify("ACCEPTED,BLINK1,255,0,0,interval=500"),
            ResponseKind::Accepted
        );
        assert_eq!(
            ResponseKind::classify("REJECT,XYZ,unknown command"),
            ResponseKind::Rejected
        );
        assert_eq!(ResponseKind::classify("booting v2"), ResponseKind::Other);
        assert_eq!(ResponseKind::classify(""), ResponseKind::Other);
    }
}
