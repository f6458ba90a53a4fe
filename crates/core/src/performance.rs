//! Performance register read-back.
//!
//! DPI stage selection and polling rate live in the same 6-byte register
//! at address `0x00`. A read returns the rate pair at bytes 6..7 and the
//! stage pair at bytes 10..11.

use crate::error::{Error, Result};
use crate::polling_rate::PollingRate;
use crate::report;
use crate::transport::{read_response, HidTransport, REGISTER_READ_TIMEOUT_MS};
use tracing::debug;

/// Register address shared by the DPI stage and polling rate reports.
pub const REGISTER: u8 = 0x00;
/// Length of the performance register.
pub const REGISTER_LEN: u8 = 0x06;

/// Current performance settings as reported by the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PerformanceSettings {
    /// Stage byte as stored, the same value `encode_dpi_stage` writes.
    pub dpi_stage: u8,
    pub polling_rate: PollingRate,
}

impl PerformanceSettings {
    /// Decode a performance register response.
    pub fn parse(data: &[u8]) -> Result<Self> {
        report::check_response(data, report::ops::READ)?;
        let polling_rate = PollingRate::from_rate_byte(data[6]).ok_or_else(|| {
            Error::InvalidReport(format!("unknown polling rate byte 0x{:02X}", data[6]))
        })?;
        Ok(Self {
            dpi_stage: data[10],
            polling_rate,
        })
    }
}

/// Read DPI stage and polling rate back from the device.
pub fn read_performance(transport: &dyn HidTransport) -> Result<PerformanceSettings> {
    transport.write_report(&report::read_register(REGISTER, REGISTER_LEN))?;
    let response = read_response(
        transport,
        report::ops::READ,
        REGISTER_READ_TIMEOUT_MS,
        "performance",
    )?;
    let settings = PerformanceSettings::parse(&response)?;
    debug!(
        dpi_stage = settings.dpi_stage,
        polling_rate = settings.polling_rate.as_hz(),
        "Performance settings"
    );
    Ok(settings)
}
