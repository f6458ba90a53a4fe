//! Sensor performance mode: write and read-back.
//!
//! Register `0xB5`, 6 bytes. The mode byte is at offset 10 in both the
//! write report and the read response.

use crate::error::{Error, Result};
use crate::report::{self, Report};
use crate::transport::{read_response, HidTransport, REGISTER_READ_TIMEOUT_MS};
use tracing::debug;

const ADDRESS: u8 = 0xB5;
const LEN: u8 = 0x06;

/// Sensor tuning preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SensorMode {
    #[default]
    Basic = 0,
    Competitive = 1,
    Max = 2,
}

impl SensorMode {
    pub const ALL: &'static [SensorMode] = &[Self::Basic, Self::Competitive, Self::Max];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Competitive => "competitive",
            Self::Max => "max",
        }
    }
}

impl std::fmt::Display for SensorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SensorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "competitive" => Ok(Self::Competitive),
            "max" => Ok(Self::Max),
            _ => Err(Error::OutOfRange {
                field: "sensor_mode",
                value: s.to_string(),
                allowed: "basic, competitive, max",
            }),
        }
    }
}

impl TryFrom<u8> for SensorMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Basic),
            1 => Ok(Self::Competitive),
            2 => Ok(Self::Max),
            other => Err(Error::InvalidReport(format!(
                "unknown sensor mode byte 0x{other:02X}"
            ))),
        }
    }
}

/// Encode a sensor mode report (sent as a feature report).
pub fn encode_sensor_mode(mode: SensorMode) -> Report {
    let setting = mode as u8;
    report::write_register(
        ADDRESS,
        LEN,
        [
            0x00,
            0x55,
            0x06,
            0x4F,
            setting,
            report::checksum(setting),
            0x00,
            0x00,
            0x00,
            0x00,
        ],
    )
}

/// Read the active sensor mode back from the device.
pub fn read_sensor_mode(transport: &dyn HidTransport) -> Result<SensorMode> {
    transport.write_report(&report::read_register(ADDRESS, LEN))?;
    let response = read_response(
        transport,
        report::ops::READ,
        REGISTER_READ_TIMEOUT_MS,
        "sensor",
    )?;
    let mode = SensorMode::try_from(response[10])?;
    debug!(mode = %mode, "Sensor mode");
    Ok(mode)
}
