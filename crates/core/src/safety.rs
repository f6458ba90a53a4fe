//! Safety layer: validates setting values before anything is written.
//!
//! ## Polling Rate
//! - **Protocol values**: 125, 250, 500, 1000, 2000, 4000, 8000 Hz
//! - **Wired cap**: the cable connection tops out at 1000 Hz; rates above
//!   that are wireless-only and are rejected for a wired device without
//!   touching the hardware
//!
//! ## DPI Stage
//! - Not validated. The stage index is truncated to one byte and forwarded
//!   as-is; see [`crate::dpi_stage::encode_dpi_stage`].
//!
//! ## Per-stage DPI
//! - **Range**: 100–30000, in steps of 50 (the wire value is `dpi / 50 - 1`)
//! - Values off the grid are rejected, not rounded
//! - **Stages**: 1–8
//!
//! ## Debounce
//! - **Supported values**: 0, 1, 2, 4, 8, 15, 20 ms
//! - Values below 4 ms are accepted but can cause double clicks

use crate::debounce::Debounce;
use crate::device::DeviceVariant;
use crate::error::{Error, Result};
use crate::polling_rate::PollingRate;

/// Smallest debounce time that does not risk double clicks.
pub const DEBOUNCE_RECOMMENDED_MIN_MS: u8 = 4;

/// Lowest configurable per-stage DPI.
pub const DPI_MIN: u16 = 100;
/// Highest configurable per-stage DPI.
pub const DPI_MAX: u16 = 30000;
/// Per-stage DPI resolution.
pub const DPI_STEP: u16 = 50;
/// Number of configurable DPI stages.
pub const DPI_STAGE_COUNT: u8 = 8;

/// Validate a per-stage DPI value for `axis`.
pub fn validate_dpi(axis: &'static str, dpi: u16) -> Result<u16> {
    if !(DPI_MIN..=DPI_MAX).contains(&dpi) || dpi % DPI_STEP != 0 {
        return Err(Error::OutOfRange {
            field: axis,
            value: dpi.to_string(),
            allowed: "100 to 30000 in steps of 50",
        });
    }
    Ok(dpi)
}

/// Validate a 1-based DPI stage number for per-stage configuration.
pub fn validate_stage_number(stage: u8) -> Result<u8> {
    if !(1..=DPI_STAGE_COUNT).contains(&stage) {
        return Err(Error::OutOfRange {
            field: "stage",
            value: stage.to_string(),
            allowed: "1 to 8",
        });
    }
    Ok(stage)
}

/// Check that `variant` can run at `rate`.
pub fn check_rate_capability(variant: DeviceVariant, rate: PollingRate) -> Result<()> {
    let max_hz = variant.max_polling_rate_hz();
    if rate.as_hz() > max_hz {
        return Err(Error::CapabilityMismatch {
            variant,
            requested_hz: rate.as_hz(),
            max_hz,
        });
    }
    Ok(())
}

/// Whether `debounce` is at or above the recommended minimum.
pub fn is_debounce_recommended(debounce: Debounce) -> bool {
    debounce.as_ms() >= DEBOUNCE_RECOMMENDED_MIN_MS
}
