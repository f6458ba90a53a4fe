//! Button debounce time report.

use crate::error::{Error, Result};
use crate::report::{self, Report};

const ADDRESS: u8 = 0xA9;
const LEN: u8 = 0x0A;

/// Switch debounce time in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Debounce {
    Ms0 = 0,
    Ms1 = 1,
    Ms2 = 2,
    Ms4 = 4,
    #[default]
    Ms8 = 8,
    Ms15 = 15,
    Ms20 = 20,
}

impl Debounce {
    pub const ALL: &'static [Debounce] = &[
        Self::Ms0,
        Self::Ms1,
        Self::Ms2,
        Self::Ms4,
        Self::Ms8,
        Self::Ms15,
        Self::Ms20,
    ];

    /// Convert from milliseconds.
    pub fn from_ms(ms: u8) -> Result<Self> {
        match ms {
            0 => Ok(Self::Ms0),
            1 => Ok(Self::Ms1),
            2 => Ok(Self::Ms2),
            4 => Ok(Self::Ms4),
            8 => Ok(Self::Ms8),
            15 => Ok(Self::Ms15),
            20 => Ok(Self::Ms20),
            other => Err(Error::OutOfRange {
                field: "debounce_ms",
                value: other.to_string(),
                allowed: "0, 1, 2, 4, 8, 15, 20",
            }),
        }
    }

    pub fn as_ms(&self) -> u8 {
        *self as u8
    }
}

impl std::fmt::Display for Debounce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ms", self.as_ms())
    }
}

impl std::str::FromStr for Debounce {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let ms: u8 = s.trim().parse().map_err(|_| Error::OutOfRange {
            field: "debounce_ms",
            value: s.to_string(),
            allowed: "0, 1, 2, 4, 8, 15, 20",
        })?;
        Self::from_ms(ms)
    }
}

/// Encode a debounce report (sent as a feature report).
pub fn encode_debounce(debounce: Debounce) -> Report {
    let ms = debounce.as_ms();
    report::write_register(
        ADDRESS,
        LEN,
        [
            ms,
            report::checksum(ms),
            0x01,
            0x54,
            0x06,
            0x4F,
            0x00,
            0x55,
            0x00,
            0x55,
        ],
    )
}
