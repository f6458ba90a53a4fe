//! vxe-core: device discovery, report encoding, and settings dispatch.
//!
//! This crate provides the core logic for configuring VXE MAD R mice by
//! writing 17-byte vendor reports to the mouse's HID control interface.

pub mod battery;
pub mod debounce;
pub mod device;
pub mod dispatch;
pub mod dpi;
pub mod dpi_stage;
pub mod error;
pub mod performance;
pub mod polling_rate;
pub mod report;
pub mod safety;
pub mod sensor;
pub mod sleep;
pub mod transport;

/// VXE USB Vendor ID.
pub const VXE_VID: u16 = 0x373B;

/// HID interface number that accepts configuration reports.
pub const CONTROL_INTERFACE: i32 = 1;

/// Known VXE MAD R product IDs.
pub mod pids {
    /// MAD R connected by USB cable.
    pub const MADR_WIRED: u16 = 0x103F;
    /// MAD R through the 2.4 GHz receiver.
    pub const MADR_WIRELESS: u16 = 0x1040;
}
