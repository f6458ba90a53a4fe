//! Vendor report envelope shared by every configuration command.
//!
//! All reports are 17 bytes:
//!
//! ```text
//! [0]     report ID (0x08)
//! [1]     operation: 0x07 write register, 0x08 read register, 0x04 battery
//! [4]     register address
//! [5]     payload length
//! [6..16] payload, every value byte followed by (0x55 - value)
//! [16]    0x55 - (sum of bytes 0..16)
//! ```
//!
//! All checksum arithmetic wraps at 8 bits.

use crate::error::{Error, Result};

/// Length of every vendor report, including the report ID.
pub const REPORT_LEN: usize = 17;

/// A complete vendor report ready to be written.
pub type Report = [u8; REPORT_LEN];

/// Report ID used for all vendor reports.
pub const REPORT_ID: u8 = 0x08;

/// Operation bytes (byte 1).
pub mod ops {
    /// Write a configuration register.
    pub const WRITE: u8 = 0x07;
    /// Read a configuration register.
    pub const READ: u8 = 0x08;
    /// Query battery status.
    pub const BATTERY: u8 = 0x04;
}

/// Base value all checksums are subtracted from.
pub const CHECKSUM_BASE: u8 = 0x55;

/// Checksum byte paired with `value`.
pub fn checksum(value: u8) -> u8 {
    CHECKSUM_BASE.wrapping_sub(value)
}

/// Checksum byte covering several value bytes.
pub fn checksum_of(values: &[u8]) -> u8 {
    CHECKSUM_BASE.wrapping_sub(values.iter().fold(0u8, |acc, b| acc.wrapping_add(*b)))
}

fn seal(mut report: Report) -> Report {
    report[REPORT_LEN - 1] = checksum_of(&report[..REPORT_LEN - 1]);
    report
}

/// Build a register write: `len` payload bytes at `address`.
pub fn write_register(address: u8, len: u8, payload: [u8; 10]) -> Report {
    let mut report = [0u8; REPORT_LEN];
    report[0] = REPORT_ID;
    report[1] = ops::WRITE;
    report[4] = address;
    report[5] = len;
    report[6..16].copy_from_slice(&payload);
    seal(report)
}

/// Build a register read request for `len` bytes at `address`.
pub fn read_register(address: u8, len: u8) -> Report {
    let mut report = [0u8; REPORT_LEN];
    report[0] = REPORT_ID;
    report[1] = ops::READ;
    report[4] = address;
    report[5] = len;
    seal(report)
}

/// Build a query whose only non-zero bytes are the ID, the operation and
/// the trailer.
pub fn query_report(op: u8) -> Report {
    let mut report = [0u8; REPORT_LEN];
    report[0] = REPORT_ID;
    report[1] = op;
    seal(report)
}

/// Check that `data` is a full response to operation `op`.
pub fn check_response(data: &[u8], op: u8) -> Result<()> {
    if data.len() < REPORT_LEN {
        return Err(Error::InvalidReport(format!(
            "response too short: {} bytes",
            data.len()
        )));
    }
    if data[0] != REPORT_ID || data[1] != op {
        return Err(Error::InvalidReport(format!(
            "unexpected response header {:02X?} (expected [{:02X}, {:02X}])",
            &data[..2],
            REPORT_ID,
            op
        )));
    }
    Ok(())
}
