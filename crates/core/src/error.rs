//! Error types for vxe-core.

use crate::device::DeviceVariant;
use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The HID subsystem could not be initialized or enumerated.
    #[error("failed to initialize HIDAPI: {0}")]
    SubsystemInit(String),

    /// No recognized control interface could be opened.
    #[error("no compatible device found on interface {}", crate::CONTROL_INTERFACE)]
    NoCompatibleDevice,

    /// Polling rate outside the supported set.
    #[error("invalid polling rate {0} Hz (valid: 125, 250, 500, 1000, 2000, 4000, 8000)")]
    InvalidPollingRate(i64),

    /// The connected variant cannot run at the requested rate.
    #[error("{variant} mouse only supports up to {max_hz} Hz polling rate (requested {requested_hz} Hz)")]
    CapabilityMismatch {
        variant: DeviceVariant,
        requested_hz: u16,
        max_hz: u16,
    },

    /// Opening a specific HID interface failed.
    #[error("failed to open HID interface: {0}")]
    Open(String),

    /// Writing a report to the device failed.
    #[error("HID write failed: {0}")]
    TransportWrite(String),

    /// Reading a report from the device failed.
    #[error("HID read failed: {0}")]
    TransportRead(String),

    /// Operation timed out.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Device answered with something that is not the expected report.
    #[error("invalid report: {0}")]
    InvalidReport(String),

    /// Command arguments that are individually valid but unusable together.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Setting value not in its allowed set.
    #[error("value out of range: {field} = {value} (allowed {allowed})")]
    OutOfRange {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
