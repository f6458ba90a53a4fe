//! Device model: discovery, variant capabilities, and the open handle.

use crate::error::{Error, Result};
use crate::transport::HidTransport;
use crate::{pids, CONTROL_INTERFACE, VXE_VID};
use std::ffi::CString;
use tracing::{debug, info, warn};

/// Connection variant of a MAD R mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceVariant {
    Wired,
    Wireless,
}

impl DeviceVariant {
    /// Look up the variant from USB product ID.
    pub fn from_pid(pid: u16) -> Option<Self> {
        match pid {
            pids::MADR_WIRED => Some(Self::Wired),
            pids::MADR_WIRELESS => Some(Self::Wireless),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wired => "VXE MAD R (wired)",
            Self::Wireless => "VXE MAD R (2.4 GHz)",
        }
    }

    /// Highest polling rate this connection can sustain.
    pub fn max_polling_rate_hz(&self) -> u16 {
        match self {
            Self::Wired => 1000,
            Self::Wireless => 8000,
        }
    }
}

impl std::fmt::Display for DeviceVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wired => write!(f, "wired"),
            Self::Wireless => write!(f, "wireless"),
        }
    }
}

/// One enumerated HID interface.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct InterfaceInfo {
    pub vid: u16,
    pub pid: u16,
    pub interface_number: i32,
    pub path: String,
    pub serial: Option<String>,
    pub product: Option<String>,
}

impl InterfaceInfo {
    /// Variant of this interface if it is a recognized control interface.
    pub fn control_variant(&self) -> Option<DeviceVariant> {
        if self.vid != VXE_VID || self.interface_number != CONTROL_INTERFACE {
            return None;
        }
        DeviceVariant::from_pid(self.pid)
    }
}

impl From<&hidapi::DeviceInfo> for InterfaceInfo {
    fn from(info: &hidapi::DeviceInfo) -> Self {
        Self {
            vid: info.vendor_id(),
            pid: info.product_id(),
            interface_number: info.interface_number(),
            path: info.path().to_string_lossy().into_owned(),
            serial: info.serial_number().map(|s| s.to_string()),
            product: info.product_string().map(|s| s.to_string()),
        }
    }
}

/// Source of HID interfaces that can be opened by path.
pub trait HidHost {
    type Handle: HidTransport;

    /// Enumerated interfaces, in platform order.
    fn interfaces(&self) -> Vec<InterfaceInfo>;

    /// Open one interface.
    fn open(&self, info: &InterfaceInfo) -> Result<Self::Handle>;
}

/// `HidHost` backed by an initialized hidapi context.
pub struct HidApiHost<'a> {
    api: &'a hidapi::HidApi,
}

impl<'a> HidApiHost<'a> {
    pub fn new(api: &'a hidapi::HidApi) -> Self {
        Self { api }
    }
}

impl HidHost for HidApiHost<'_> {
    type Handle = hidapi::HidDevice;

    fn interfaces(&self) -> Vec<InterfaceInfo> {
        self.api.device_list().map(InterfaceInfo::from).collect()
    }

    fn open(&self, info: &InterfaceInfo) -> Result<hidapi::HidDevice> {
        let path = CString::new(info.path.as_str()).map_err(|e| Error::Open(e.to_string()))?;
        self.api
            .open_path(&path)
            .map_err(|e| Error::Open(e.to_string()))
    }
}

/// A successfully opened control interface.
pub struct Located<T> {
    pub info: InterfaceInfo,
    pub variant: DeviceVariant,
    pub handle: T,
}

/// Open the first recognized control interface that actually opens.
///
/// Interfaces that match but fail to open (permissions, busy) are skipped.
pub fn locate<H: HidHost>(host: &H) -> Result<Located<H::Handle>> {
    let interfaces = host.interfaces();
    debug!(count = interfaces.len(), "Scanning HID interfaces");

    for info in interfaces {
        let Some(variant) = info.control_variant() else {
            debug!(
                pid = format_args!("0x{:04X}", info.pid),
                interface = info.interface_number,
                "Skipping non-control interface"
            );
            continue;
        };

        match host.open(&info) {
            Ok(handle) => {
                info!(
                    model = variant.name(),
                    pid = format_args!("0x{:04X}", info.pid),
                    path = %info.path,
                    "Opened control interface"
                );
                return Ok(Located {
                    info,
                    variant,
                    handle,
                });
            }
            Err(e) => {
                warn!(path = %info.path, error = %e, "Control interface did not open, continuing");
            }
        }
    }

    Err(Error::NoCompatibleDevice)
}

fn init_api() -> Result<hidapi::HidApi> {
    let mut api =
        hidapi::HidApi::new_without_enumerate().map_err(|e| Error::SubsystemInit(e.to_string()))?;
    api.add_devices(VXE_VID, 0)
        .map_err(|e| Error::SubsystemInit(e.to_string()))?;
    Ok(api)
}

/// List recognized control interfaces without opening them.
pub fn list_devices() -> Result<Vec<InterfaceInfo>> {
    let api = init_api()?;
    let devices: Vec<InterfaceInfo> = HidApiHost::new(&api)
        .interfaces()
        .into_iter()
        .filter(|info| info.control_variant().is_some())
        .collect();
    debug!(count = devices.len(), "Device enumeration complete");
    Ok(devices)
}

/// Open handle to a MAD R control interface.
///
/// Owns the hidapi context for its whole lifetime. Fields drop in
/// declaration order, so the device handle is closed before the context.
pub struct Device {
    info: InterfaceInfo,
    variant: DeviceVariant,
    hid: hidapi::HidDevice,
    _api: hidapi::HidApi,
}

impl Device {
    /// Initialize HIDAPI and open the first compatible mouse.
    pub fn open() -> Result<Self> {
        let api = init_api()?;
        let located = locate(&HidApiHost::new(&api))?;
        Ok(Self {
            info: located.info,
            variant: located.variant,
            hid: located.handle,
            _api: api,
        })
    }

    pub fn variant(&self) -> DeviceVariant {
        self.variant
    }

    pub fn is_wired(&self) -> bool {
        self.variant == DeviceVariant::Wired
    }

    pub fn info(&self) -> &InterfaceInfo {
        &self.info
    }
}

impl HidTransport for Device {
    fn write_report(&self, data: &[u8]) -> Result<usize> {
        self.hid.write_report(data)
    }

    fn send_feature_report(&self, data: &[u8]) -> Result<()> {
        HidTransport::send_feature_report(&self.hid, data)
    }

    fn read_report(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize> {
        self.hid.read_report(buf, timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{interface, MockHost};

    #[test]
    fn variant_from_known_pid() {
        assert_eq!(DeviceVariant::from_pid(0x103F), Some(DeviceVariant::Wired));
        assert_eq!(
            DeviceVariant::from_pid(0x1040),
            Some(DeviceVariant::Wireless)
        );
    }

    #[test]
    fn variant_from_unknown_pid() {
        assert_eq!(DeviceVariant::from_pid(0x1234), None);
    }

    #[test]
    fn variant_rate_caps() {
        assert_eq!(DeviceVariant::Wired.max_polling_rate_hz(), 1000);
        assert_eq!(DeviceVariant::Wireless.max_polling_rate_hz(), 8000);
    }

    #[test]
    fn control_variant_requires_interface_one() {
        assert_eq!(interface(0x1040, 0, "a").control_variant(), None);
        assert_eq!(interface(0x1040, 2, "a").control_variant(), None);
        assert_eq!(
            interface(0x1040, 1, "a").control_variant(),
            Some(DeviceVariant::Wireless)
        );
    }

    #[test]
    fn control_variant_requires_vendor() {
        let mut info = interface(0x103F, 1, "a");
        info.vid = 0x046D;
        assert_eq!(info.control_variant(), None);
    }

    #[test]
    fn locate_skips_unopenable_and_continues() {
        let host = MockHost::new(vec![
            interface(0x1040, 1, "wireless-ctl"),
            interface(0x103F, 1, "wired-ctl"),
        ])
        .refuse("wireless-ctl");

        let located = locate(&host).unwrap();
        assert_eq!(located.variant, DeviceVariant::Wired);
        assert_eq!(located.info.path, "wired-ctl");
        assert_eq!(host.open_attempts(), vec!["wireless-ctl", "wired-ctl"]);
    }

    #[test]
    fn locate_first_opened_match_wins() {
        let host = MockHost::new(vec![
            interface(0x1040, 0, "wireless-input"),
            interface(0x1040, 1, "wireless-ctl"),
            interface(0x103F, 1, "wired-ctl"),
        ]);

        let located = locate(&host).unwrap();
        assert_eq!(located.variant, DeviceVariant::Wireless);
        assert_eq!(host.open_attempts(), vec!["wireless-ctl"]);
    }

    #[test]
    fn locate_without_control_interface_fails() {
        let host = MockHost::new(vec![
            interface(0x1040, 0, "wireless-input"),
            interface(0x103F, 2, "wired-other"),
        ]);

        let result = locate(&host);
        assert!(matches!(result, Err(Error::NoCompatibleDevice)));
        assert!(host.open_attempts().is_empty());
    }

    #[test]
    fn locate_ignores_unknown_products() {
        let host = MockHost::new(vec![interface(0x2000, 1, "other")]);
        assert!(matches!(locate(&host), Err(Error::NoCompatibleDevice)));
    }

    #[test]
    fn locate_all_unopenable_fails() {
        let host = MockHost::new(vec![interface(0x103F, 1, "wired-ctl")]).refuse("wired-ctl");
        assert!(matches!(locate(&host), Err(Error::NoCompatibleDevice)));
    }

    #[test]
    fn interface_info_serializes() {
        let json = serde_json::to_value(interface(0x103F, 1, "/dev/hidraw3")).unwrap();
        assert_eq!(json["pid"], 0x103F);
        assert_eq!(json["interface_number"], 1);
        assert_eq!(json["path"], "/dev/hidraw3");
    }
}
