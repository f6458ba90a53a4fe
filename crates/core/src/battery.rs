//! Battery status query.
//!
//! Request: `08 04 00 .. 00 49`. Response layout:
//!   - `[0]=08 [1]=04`
//!   - `[6]` charge percentage
//!   - `[7]` 1 when charging
//!   - `[8..9]` battery voltage in mV, big-endian

use crate::error::Result;
use crate::report;
use crate::transport::{read_response, HidTransport};
use tracing::debug;

/// How long to wait for the battery response.
pub const READ_TIMEOUT_MS: i32 = 1000;

/// Decoded battery report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct BatteryStatus {
    pub percentage: u8,
    pub voltage_mv: u16,
    pub is_charging: bool,
}

impl BatteryStatus {
    /// Decode a battery response.
    pub fn parse(data: &[u8]) -> Result<Self> {
        report::check_response(data, report::ops::BATTERY)?;

        Ok(Self {
            percentage: data[6],
            is_charging: data[7] == 0x01,
            voltage_mv: u16::from_be_bytes([data[8], data[9]]),
        })
    }

    pub fn voltage(&self) -> f32 {
        self.voltage_mv as f32 / 1000.0
    }
}

/// Request and read the battery status.
pub fn read_battery(transport: &dyn HidTransport) -> Result<BatteryStatus> {
    let request = report::query_report(report::ops::BATTERY);
    transport.write_report(&request)?;

    let response = read_response(transport, report::ops::BATTERY, READ_TIMEOUT_MS, "battery")?;
    let status = BatteryStatus::parse(&response)?;
    debug!(
        percentage = status.percentage,
        voltage_mv = status.voltage_mv,
        charging = status.is_charging,
        "Battery status"
    );
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transport::mock::{MockTransport, ReportKind};

    const SAMPLE: [u8; 17] = [
        0x08, 0x04, 0x00, 0x00, 0x00, 0x02, 0x5F, 0x01, 0x10, 0x44, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x93,
    ];

    #[test]
    fn parse_sample_response() {
        let status = BatteryStatus::parse(&SAMPLE).unwrap();
        assert_eq!(status.percentage, 95);
        assert!(status.is_charging);
        assert_eq!(status.voltage_mv, 4164);
    }

    #[test]
    fn parse_rejects_short() {
        assert!(BatteryStatus::parse(&SAMPLE[..10]).is_err());
    }

    #[test]
    fn parse_rejects_wrong_header() {
        let mut data = SAMPLE;
        data[1] = 0x07;
        assert!(matches!(
            BatteryStatus::parse(&data),
            Err(Error::InvalidReport(_))
        ));
    }

    #[test]
    fn read_battery_sends_query_and_decodes() {
        let mock = MockTransport::new();
        mock.push_response(SAMPLE.to_vec());

        let status = read_battery(&mock).unwrap();
        assert_eq!(status.percentage, 95);

        let written = mock.written();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, ReportKind::Output);
        assert_eq!(written[0].1[1], 0x04);
        assert_eq!(written[0].1[16], 0x49);
    }

    #[test]
    fn read_battery_times_out() {
        let mock = MockTransport::new();
        assert!(matches!(read_battery(&mock), Err(Error::Timeout(_))));
    }
}
