//! Inactivity sleep timeout.
//!
//! The timeout is sent as a count of ten-second units in two reports: the
//! first writes the value, the second confirms it. Both must be sent, in
//! order.

use crate::error::{Error, Result};
use crate::report::{self, Report};

/// Supported inactivity timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum SleepTimeout {
    Sec30,
    Min1,
    Min2,
    Min3,
    Min5,
    Min20,
    Min25,
    Min30,
}

impl SleepTimeout {
    pub const ALL: &'static [SleepTimeout] = &[
        Self::Sec30,
        Self::Min1,
        Self::Min2,
        Self::Min3,
        Self::Min5,
        Self::Min20,
        Self::Min25,
        Self::Min30,
    ];

    /// Value as it appears on the wire.
    pub fn tens_of_seconds(&self) -> u8 {
        match self {
            Self::Sec30 => 3,
            Self::Min1 => 6,
            Self::Min2 => 12,
            Self::Min3 => 18,
            Self::Min5 => 30,
            Self::Min20 => 120,
            Self::Min25 => 150,
            Self::Min30 => 180,
        }
    }

    /// CLI label, e.g. `30s` or `5m`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sec30 => "30s",
            Self::Min1 => "1m",
            Self::Min2 => "2m",
            Self::Min3 => "3m",
            Self::Min5 => "5m",
            Self::Min20 => "20m",
            Self::Min25 => "25m",
            Self::Min30 => "30m",
        }
    }

    pub fn as_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.tens_of_seconds() as u64 * 10)
    }
}

impl std::fmt::Display for SleepTimeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for SleepTimeout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.label() == s.trim())
            .ok_or_else(|| Error::OutOfRange {
                field: "sleep_timeout",
                value: s.to_string(),
                allowed: "30s, 1m, 2m, 3m, 5m, 20m, 25m, 30m",
            })
    }
}

/// Encode both sleep timeout reports (sent as feature reports, in order).
pub fn encode_sleep_timeout(timeout: SleepTimeout) -> [Report; 2] {
    let t = timeout.tens_of_seconds();
    let value = report::write_register(
        0xA9,
        0x0A,
        [
            0x04,
            0x51,
            0x01,
            0x54,
            t,
            report::checksum(t),
            0x00,
            0x55,
            0x00,
            0x55,
        ],
    );
    let confirm = report::write_register(
        0xB5,
        0x06,
        [
            0x01,
            0x54,
            t,
            report::checksum(t),
            0x00,
            0x55,
            0x00,
            0x00,
            0x00,
            0x00,
        ],
    );
    [value, confirm]
}
