//! Polling rate report.
//!
//! Layout (17 bytes):
//!   `08 07 00 00 00 06 | rate (55-rate) | 04 51 01 54 | 00 00 00 00 | 41`
//!
//! Same register as the DPI stage report, but the value pair sits at bytes
//! 6..7 and the fixed bytes at 8..11. The only report both encoders can
//! produce is `01 54 04 51 01 54`: 1000 Hz and DPI stage 1 are the same
//! bytes on the wire.

use crate::error::{Error, Result};
use crate::performance::{REGISTER, REGISTER_LEN};
use crate::report::{self, Report};

const MAGIC: [u8; 4] = [0x04, 0x51, 0x01, 0x54];

/// Polling rates supported by the MAD R protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u16)]
pub enum PollingRate {
    Hz125 = 125,
    Hz250 = 250,
    Hz500 = 500,
    Hz1000 = 1000,
    Hz2000 = 2000,
    Hz4000 = 4000,
    Hz8000 = 8000,
}

impl PollingRate {
    /// All supported rates.
    pub const ALL: &'static [PollingRate] = &[
        PollingRate::Hz125,
        PollingRate::Hz250,
        PollingRate::Hz500,
        PollingRate::Hz1000,
        PollingRate::Hz2000,
        PollingRate::Hz4000,
        PollingRate::Hz8000,
    ];

    /// Convert from a raw Hz value.
    pub fn from_hz(hz: i64) -> Result<Self> {
        match hz {
            125 => Ok(Self::Hz125),
            250 => Ok(Self::Hz250),
            500 => Ok(Self::Hz500),
            1000 => Ok(Self::Hz1000),
            2000 => Ok(Self::Hz2000),
            4000 => Ok(Self::Hz4000),
            8000 => Ok(Self::Hz8000),
            other => Err(Error::InvalidPollingRate(other)),
        }
    }

    /// Get the Hz value.
    pub fn as_hz(&self) -> u16 {
        *self as u16
    }

    /// Device encoding of this rate.
    pub fn rate_byte(&self) -> u8 {
        match self {
            Self::Hz125 => 0x08,
            Self::Hz250 => 0x04,
            Self::Hz500 => 0x02,
            Self::Hz1000 => 0x01,
            Self::Hz2000 => 0x10,
            Self::Hz4000 => 0x20,
            Self::Hz8000 => 0x40,
        }
    }

    /// Inverse of [`rate_byte`](Self::rate_byte).
    pub fn from_rate_byte(byte: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.rate_byte() == byte)
    }
}

impl std::fmt::Display for PollingRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.as_hz())
    }
}

impl std::str::FromStr for PollingRate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hz: i64 = s
            .trim()
            .parse()
            .map_err(|_| Error::OutOfRange {
                field: "polling_rate",
                value: s.to_string(),
                allowed: "125, 250, 500, 1000, 2000, 4000, 8000",
            })?;
        Self::from_hz(hz)
    }
}

/// Encode a polling rate report.
pub fn encode_polling_rate(rate: PollingRate) -> Report {
    let rate_byte = rate.rate_byte();
    report::write_register(
        REGISTER,
        REGISTER_LEN,
        [
            rate_byte,
            report::checksum(rate_byte),
            MAGIC[0],
            MAGIC[1],
            MAGIC[2],
            MAGIC[3],
            0x00,
            0x00,
            0x00,
            0x00,
        ],
    )
}

/// Encode a polling rate report from a raw Hz value.
pub fn encode_polling_rate_hz(hz: i64) -> Result<Report> {
    PollingRate::from_hz(hz).map(encode_polling_rate)
}
